use std::sync::Arc;

use axum::{
    extract::Path,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{Months, Utc};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{userdb::UserExt, vipdb::VipPaymentExt},
    dtos::vipdtos::*,
    error::HttpError,
    middleware::{auth, role_check, JWTAuthMiddleware},
    models::usermodel::{UserRole, VipTier},
    service::{
        bet_converter,
        error::ServiceError,
        paystack::GatewayStatus,
        tier,
        vip_service::{parse_selection, plan_amount},
    },
    utils::reference::generate_reference,
    AppState,
};

pub fn vip_handler() -> Router {
    let admin = Router::new()
        .route("/confirm-payment/:payment_id", put(confirm_payment))
        .route("/pending-payments", get(pending_payments))
        .route("/toggle-vip/:user_id", put(toggle_vip))
        .layer(middleware::from_fn(|req, next| {
            role_check(req, next, vec![UserRole::Admin])
        }));

    let protected = Router::new()
        .route("/initialize-payment", post(initialize_payment))
        .route("/status", get(vip_status))
        .route("/convert-booking-code", post(convert_booking_code))
        .route("/bookmakers", get(list_bookmakers))
        .merge(admin)
        .layer(middleware::from_fn(auth));

    // Verification is redirected to by the gateway, so it carries no session.
    Router::new()
        .route("/verify-payment", post(verify_payment))
        .merge(protected)
}

pub async fn initialize_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Json(body): Json<InitializePaymentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (tier, plan) = parse_selection(&body.tier, &body.plan)?;
    let amount = plan_amount(tier, plan)?;
    let reference = generate_reference(tier);

    let callback_url = format!("{}/vip/success", app_state.env.frontend_url);
    let metadata = json!({
        "user_id": user.user.id,
        "type": "vip_subscription",
        "tier": tier.to_str(),
        "plan": plan.to_str(),
    });

    let init = app_state
        .paystack
        .initialize_payment(&user.user.email, amount, &reference, &callback_url, metadata)
        .await?;

    // The record is created pending; only gateway verification can move it
    // forward.
    app_state
        .db_client
        .create_payment(user.user.id, tier, plan, amount, &reference, &init.reference)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    tracing::info!(
        "payment initialized: user {} -> {} {} ({})",
        user.user.id,
        tier.to_str(),
        plan.to_str(),
        reference
    );

    Ok(Json(InitializePaymentResponseDto {
        success: true,
        data: init,
    }))
}

pub async fn verify_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<VerifyPaymentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let verification = app_state.paystack.verify_payment(&body.reference).await?;
    let status = app_state.vip_service.apply_verification(&verification).await?;

    let status = match status {
        GatewayStatus::Success => "success",
        GatewayStatus::Failed => "failed",
        GatewayStatus::Pending => "pending",
    };

    Ok(Json(VerifyPaymentResponseDto {
        success: true,
        status: status.to_string(),
    }))
}

/// The caller's stored subscription state. The convenience flags reflect the
/// stored tier; expiry is enforced wherever content is actually served.
pub async fn vip_status(
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let user = &user.user;

    Ok(Json(VipStatusDto {
        vip_tier: user.vip_tier,
        vip_expiry: user.vip_expiry,
        is_public_profile: user.is_public_profile,
        is_vip: user.vip_tier != VipTier::None,
        is_vvip: user.vip_tier == VipTier::Vvip,
    }))
}

pub async fn confirm_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(admin): Extension<JWTAuthMiddleware>,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let confirmed = app_state
        .vip_service
        .confirm_payment(payment_id, admin.user.id)
        .await?;

    Ok(Json(ConfirmPaymentResponseDto {
        success: true,
        message: format!("{} status confirmed", confirmed.tier.to_str().to_uppercase()),
    }))
}

pub async fn pending_payments(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let pending = app_state
        .db_client
        .pending_confirmations()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(pending))
}

/// Manual admin override: grants a year of vip to a free user, or revokes
/// whatever tier the user currently holds.
pub async fn toggle_vip(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let target = app_state
        .db_client
        .get_user(Some(user_id), None, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or(ServiceError::UserNotFound(user_id))?;

    let updated = if target.vip_tier == VipTier::None {
        app_state
            .db_client
            .set_vip_status(
                user_id,
                VipTier::Vip,
                Some(Utc::now() + Months::new(12)),
                None,
            )
            .await
    } else {
        app_state
            .db_client
            .set_vip_status(user_id, VipTier::None, None, None)
            .await
    }
    .map_err(|e| HttpError::server_error(e.to_string()))?
    .ok_or_else(|| HttpError::not_found("User not found"))?;

    Ok(Json(ToggleVipResponseDto {
        success: true,
        is_vip: updated.vip_tier != VipTier::None,
        vip_expiry: updated.vip_expiry,
    }))
}

fn require_subscriber(user: &JWTAuthMiddleware) -> Result<(), HttpError> {
    let effective = tier::effective_tier(user.user.vip_tier, user.user.vip_expiry, Utc::now());
    if effective == VipTier::None {
        return Err(ServiceError::VipRequired.into());
    }
    Ok(())
}

pub async fn convert_booking_code(
    Extension(user): Extension<JWTAuthMiddleware>,
    Json(body): Json<ConvertBookingCodeDto>,
) -> Result<impl IntoResponse, HttpError> {
    require_subscriber(&user)?;

    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let converted =
        bet_converter::convert_booking_code(&body.from_bookmaker, &body.to_bookmaker, &body.booking_code);

    Ok(Json(ConversionResponseDto {
        success: true,
        data: ConvertedCodeDto {
            original_code: body.booking_code,
            from_bookmaker: body.from_bookmaker,
            to_bookmaker: body.to_bookmaker,
            converted_code: converted,
            converted_at: Utc::now(),
        },
    }))
}

pub async fn list_bookmakers(
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    require_subscriber(&user)?;

    Ok(Json(json!({
        "success": true,
        "data": bet_converter::bookmakers(),
    })))
}
