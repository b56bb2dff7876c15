use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::usermodel::VipTier;
use crate::service::paystack::PaymentInitResponse;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct InitializePaymentDto {
    #[validate(length(min = 1, message = "Plan is required"))]
    pub plan: String,

    #[validate(length(min = 1, message = "Tier is required"))]
    pub tier: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentDto {
    #[validate(length(min = 1, message = "Reference is required"))]
    pub reference: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InitializePaymentResponseDto {
    pub success: bool,
    pub data: PaymentInitResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyPaymentResponseDto {
    pub success: bool,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VipStatusDto {
    #[serde(rename = "vipTier")]
    pub vip_tier: VipTier,
    #[serde(rename = "vipExpiry")]
    pub vip_expiry: Option<DateTime<Utc>>,
    #[serde(rename = "isPublicProfile")]
    pub is_public_profile: bool,
    #[serde(rename = "isVIP")]
    pub is_vip: bool,
    #[serde(rename = "isVVIP")]
    pub is_vvip: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfirmPaymentResponseDto {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleVipResponseDto {
    pub success: bool,
    #[serde(rename = "isVIP")]
    pub is_vip: bool,
    #[serde(rename = "vipExpiry")]
    pub vip_expiry: Option<DateTime<Utc>>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct ConvertBookingCodeDto {
    #[serde(rename = "fromBookmaker")]
    #[validate(length(min = 1, message = "fromBookmaker is required"))]
    pub from_bookmaker: String,

    #[serde(rename = "toBookmaker")]
    #[validate(length(min = 1, message = "toBookmaker is required"))]
    pub to_bookmaker: String,

    #[serde(rename = "bookingCode")]
    #[validate(length(min = 1, message = "bookingCode is required"))]
    pub booking_code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConvertedCodeDto {
    #[serde(rename = "originalCode")]
    pub original_code: String,
    #[serde(rename = "fromBookmaker")]
    pub from_bookmaker: String,
    #[serde(rename = "toBookmaker")]
    pub to_bookmaker: String,
    #[serde(rename = "convertedCode")]
    pub converted_code: String,
    #[serde(rename = "convertedAt")]
    pub converted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversionResponseDto {
    pub success: bool,
    pub data: ConvertedCodeDto,
}
