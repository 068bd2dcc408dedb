//! Inbound payment-gateway webhooks.
//!
//! Unauthenticated route; authenticity comes from the HMAC signature over
//! the raw body, so the handler takes `Bytes` and parses after verifying.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use clipcommerce_common::{AppError, AppResult};
use clipcommerce_core::TransferWebhookEvent;

use crate::middleware::AppState;

/// Receive a transfer status event from the payment gateway.
///
/// Returns 200 on success so the gateway stops retrying; verification and
/// parse failures return their own status through `AppError`.
async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<StatusCode> {
    let signature = headers
        .get("X-Webhook-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    state.settlement_service.verify_signature(&body, signature)?;

    let event: TransferWebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("malformed webhook payload: {e}")))?;

    state.settlement_service.handle_transfer_webhook(&event).await?;

    Ok(StatusCode::OK)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/payments", post(payment_webhook))
}
