use thiserror::Error;
use uuid::Uuid;

use crate::error::{ErrorMessage, HttpError};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Payment {0} not found")]
    PaymentNotFound(Uuid),

    #[error("Payment not completed")]
    PaymentNotCompleted,

    #[error("Payment already confirmed")]
    PaymentAlreadyConfirmed,

    #[error("User {0} not found")]
    UserNotFound(Uuid),

    #[error("{0}")]
    Validation(String),

    #[error("VIP access required")]
    VipRequired,

    #[error("Payment gateway request failed: {0}")]
    Gateway(#[from] reqwest::Error),

    #[error("Payment gateway declined the request: {0}")]
    GatewayDeclined(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::PaymentNotFound(_) | ServiceError::UserNotFound(_) => {
                HttpError::not_found(error.to_string())
            }

            ServiceError::PaymentNotCompleted
            | ServiceError::PaymentAlreadyConfirmed
            | ServiceError::Validation(_) => HttpError::bad_request(error.to_string()),

            ServiceError::VipRequired => HttpError::forbidden(ErrorMessage::VipRequired.to_string()),

            // Upstream failures surface as a generic gateway error; the
            // underlying transport detail goes to the logs only.
            ServiceError::Gateway(e) => {
                tracing::warn!("paystack request failed: {}", e);
                HttpError::bad_gateway("Payment gateway unavailable".to_string())
            }
            ServiceError::GatewayDeclined(message) => HttpError::bad_gateway(message),

            ServiceError::Database(_) => HttpError::server_error(error.to_string()),
        }
    }
}
