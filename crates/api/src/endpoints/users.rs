//! User registration endpoints.

use axum::{extract::State, routing::post, Json, Router};
use clipcommerce_common::AppResult;
use clipcommerce_core::RegisterInput;
use clipcommerce_db::entities::UserRole;
use serde::Serialize;

use crate::{middleware::AppState, response::ApiResponse};

/// Registered user response, token included.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    /// Bearer token for subsequent requests.
    pub api_token: String,
}

/// Register a user, or rotate the token of an existing one.
async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<ApiResponse<RegisterResponse>> {
    let (user, token) = state.user_service.register(input).await?;
    Ok(ApiResponse::ok(RegisterResponse {
        id: user.id,
        email: user.email,
        display_name: user.display_name,
        role: user.role,
        api_token: token,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/register", post(register))
}
