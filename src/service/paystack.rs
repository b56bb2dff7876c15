use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{config::Config, service::error::ServiceError};

const PAYSTACK_BASE_URL: &str = "https://api.paystack.co";

// Gateway calls are plain network I/O; anything slower than this is treated
// as a retryable upstream failure, never as success.
const GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentInitResponse {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayStatus {
    Success,
    Failed,
    Pending,
}

#[derive(Debug)]
pub struct PaymentVerification {
    pub status: GatewayStatus,
    pub amount: i64,
    pub gateway_reference: String,
    pub metadata: Option<serde_json::Value>,
}

pub struct PaystackService {
    secret_key: String,
    client: reqwest::Client,
}

impl PaystackService {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(GATEWAY_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            secret_key: config.paystack_secret_key.clone(),
            client,
        }
    }

    /// Initializes a transaction and returns the gateway reference plus the
    /// redirect handle the caller is sent to.
    pub async fn initialize_payment(
        &self,
        email: &str,
        amount_minor_units: i64,
        reference: &str,
        callback_url: &str,
        metadata: serde_json::Value,
    ) -> Result<PaymentInitResponse, ServiceError> {
        let payload = serde_json::json!({
            "email": email,
            "amount": amount_minor_units,
            "reference": reference,
            "currency": "NGN",
            "callback_url": callback_url,
            "metadata": metadata,
        });

        let response = self
            .client
            .post(format!("{}/transaction/initialize", PAYSTACK_BASE_URL))
            .header("Authorization", format!("Bearer {}", self.secret_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let body: serde_json::Value = response.json().await?;

        if !body["status"].as_bool().unwrap_or(false) {
            return Err(ServiceError::GatewayDeclined(
                body["message"]
                    .as_str()
                    .unwrap_or("Payment initialization failed")
                    .to_string(),
            ));
        }

        let data = &body["data"];
        Ok(PaymentInitResponse {
            authorization_url: data["authorization_url"].as_str().unwrap_or("").to_string(),
            access_code: data["access_code"].as_str().unwrap_or("").to_string(),
            reference: data["reference"].as_str().unwrap_or(reference).to_string(),
        })
    }

    /// Queries Paystack for the authoritative status of a transaction.
    pub async fn verify_payment(
        &self,
        reference: &str,
    ) -> Result<PaymentVerification, ServiceError> {
        let response = self
            .client
            .get(format!(
                "{}/transaction/verify/{}",
                PAYSTACK_BASE_URL, reference
            ))
            .header("Authorization", format!("Bearer {}", self.secret_key))
            .send()
            .await?;

        let body: serde_json::Value = response.json().await?;

        if !body["status"].as_bool().unwrap_or(false) {
            return Err(ServiceError::GatewayDeclined(
                body["message"]
                    .as_str()
                    .unwrap_or("Verification failed")
                    .to_string(),
            ));
        }

        let data = &body["data"];
        let status = match data["status"].as_str() {
            Some("success") => GatewayStatus::Success,
            Some("failed") | Some("abandoned") | Some("reversed") => GatewayStatus::Failed,
            _ => GatewayStatus::Pending,
        };

        Ok(PaymentVerification {
            status,
            amount: data["amount"].as_i64().unwrap_or(0),
            gateway_reference: data["reference"].as_str().unwrap_or(reference).to_string(),
            metadata: data.get("metadata").cloned(),
        })
    }
}
