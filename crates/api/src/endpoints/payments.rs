//! Payment settlement endpoints.

use axum::{extract::State, routing::post, Json, Router};
use clipcommerce_common::AppResult;
use clipcommerce_db::entities::transaction::{self, TransactionStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Transaction response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: String,
    pub submission_id: String,
    pub amount: Decimal,
    pub platform_fee: Decimal,
    pub clipper_net: Decimal,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    pub created_at: String,
}

impl From<transaction::Model> for TransactionResponse {
    fn from(t: transaction::Model) -> Self {
        Self {
            id: t.id,
            submission_id: t.submission_id,
            amount: t.amount,
            platform_fee: t.platform_fee,
            clipper_net: t.clipper_net,
            status: match t.status {
                TransactionStatus::Pending => "pending",
                TransactionStatus::Succeeded => "succeeded",
                TransactionStatus::Failed => "failed",
            },
            failure_reason: t.failure_reason,
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

/// Request to settle an approved submission.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleRequest {
    pub submission_id: String,
}

/// Pay out an approved submission.
async fn settle(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SettleRequest>,
) -> AppResult<ApiResponse<TransactionResponse>> {
    let record = state
        .settlement_service
        .settle(&user, &req.submission_id)
        .await?;
    Ok(ApiResponse::ok(record.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/settle", post(settle))
}
