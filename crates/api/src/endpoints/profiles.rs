//! Creator and clipper profile endpoints.

use axum::{extract::State, routing::post, Json, Router};
use clipcommerce_common::AppResult;
use clipcommerce_core::{SetupClipperInput, SetupCreatorInput};
use clipcommerce_db::entities::{clipper_profile, creator_profile};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Creator profile response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorResponse {
    pub id: String,
    pub rate_amount: Decimal,
    pub rate_views: i32,
}

impl From<creator_profile::Model> for CreatorResponse {
    fn from(p: creator_profile::Model) -> Self {
        Self {
            id: p.id,
            rate_amount: p.rate_amount,
            rate_views: p.rate_views,
        }
    }
}

/// Clipper profile response with aggregate statistics.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipperResponse {
    pub id: String,
    pub channel_id: Option<String>,
    pub has_payout_account: bool,
    pub total_earned: Decimal,
    pub total_submissions: i32,
    pub total_approved: i32,
    pub approval_rate: Decimal,
}

impl From<clipper_profile::Model> for ClipperResponse {
    fn from(p: clipper_profile::Model) -> Self {
        Self {
            id: p.id,
            channel_id: p.channel_id,
            has_payout_account: p.payout_account_id.is_some(),
            total_earned: p.total_earned,
            total_submissions: p.total_submissions,
            total_approved: p.total_approved,
            approval_rate: p.approval_rate,
        }
    }
}

/// Request to show a creator profile.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowCreatorRequest {
    pub creator_id: String,
}

/// Request to connect a payout account.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutAccountRequest {
    pub payout_account_id: String,
}

/// Set up the authenticated creator's profile.
async fn setup_creator(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SetupCreatorInput>,
) -> AppResult<ApiResponse<CreatorResponse>> {
    let profile = state.profile_service.setup_creator(&user, input).await?;
    Ok(ApiResponse::ok(profile.into()))
}

/// Change the authenticated creator's rate. Only affects future
/// submissions.
async fn update_rate(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SetupCreatorInput>,
) -> AppResult<ApiResponse<CreatorResponse>> {
    let profile = state.profile_service.update_rate(&user, input).await?;
    Ok(ApiResponse::ok(profile.into()))
}

/// Show a creator profile (public; clippers check rates here).
async fn show_creator(
    State(state): State<AppState>,
    Json(req): Json<ShowCreatorRequest>,
) -> AppResult<ApiResponse<CreatorResponse>> {
    let profile = state.profile_service.get_creator(&req.creator_id).await?;
    Ok(ApiResponse::ok(profile.into()))
}

/// Set up the authenticated clipper's profile.
async fn setup_clipper(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SetupClipperInput>,
) -> AppResult<ApiResponse<ClipperResponse>> {
    let profile = state.profile_service.setup_clipper(&user, input).await?;
    Ok(ApiResponse::ok(profile.into()))
}

/// Connect the authenticated clipper's payout account.
async fn payout_account(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<PayoutAccountRequest>,
) -> AppResult<ApiResponse<ClipperResponse>> {
    let profile = state
        .profile_service
        .set_payout_account(&user, &req.payout_account_id)
        .await?;
    Ok(ApiResponse::ok(profile.into()))
}

/// Show the authenticated clipper's profile and statistics.
async fn clipper_stats(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ClipperResponse>> {
    let profile = state.profile_service.get_clipper(&user).await?;
    Ok(ApiResponse::ok(profile.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/creator/setup", post(setup_creator))
        .route("/creator/update-rate", post(update_rate))
        .route("/creator/show", post(show_creator))
        .route("/clipper/setup", post(setup_clipper))
        .route("/clipper/payout-account", post(payout_account))
        .route("/clipper/stats", post(clipper_stats))
}
