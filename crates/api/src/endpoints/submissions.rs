//! Submission endpoints.

use axum::{extract::State, routing::post, Json, Router};
use clipcommerce_common::AppResult;
use clipcommerce_core::{status_name, CreateSubmissionInput};
use clipcommerce_db::entities::submission::{self, SubmissionStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Submission response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: String,
    pub creator_id: String,
    pub clipper_id: String,
    pub external_video_id: String,
    pub views_at_submit: i64,
    pub views_current: i64,
    pub payment_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_fee: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clipper_net: Option<Decimal>,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub submitted_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<String>,
}

impl From<submission::Model> for SubmissionResponse {
    fn from(s: submission::Model) -> Self {
        Self {
            id: s.id,
            creator_id: s.creator_id,
            clipper_id: s.clipper_id,
            external_video_id: s.external_video_id,
            views_at_submit: s.views_at_submit,
            views_current: s.views_current,
            payment_amount: s.payment_amount,
            platform_fee: s.platform_fee,
            clipper_net: s.clipper_net,
            status: status_name(s.status),
            rejection_reason: s.rejection_reason,
            submitted_at: s.submitted_at.to_rfc3339(),
            reviewed_at: s.reviewed_at.map(|t| t.to_rfc3339()),
            paid_at: s.paid_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// List submissions request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSubmissionsRequest {
    /// Maximum results (default: 10, max: 100)
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Cursor for pagination (before this ID)
    pub until_id: Option<String>,
    /// Only submissions in this status
    pub status: Option<SubmissionStatus>,
}

const fn default_limit() -> u64 {
    10
}

/// Request naming a submission.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionIdRequest {
    pub submission_id: String,
}

/// Request to reject a submission.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    pub submission_id: String,
    pub reason: String,
}

/// Submit a clip to a creator.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSubmissionInput>,
) -> AppResult<ApiResponse<SubmissionResponse>> {
    let submission = state
        .submission_service
        .create_submission(&user, input)
        .await?;
    Ok(ApiResponse::ok(submission.into()))
}

/// List submissions from the caller's side of the marketplace.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListSubmissionsRequest>,
) -> AppResult<ApiResponse<Vec<SubmissionResponse>>> {
    let limit = req.limit.min(100);
    let submissions = state
        .submission_service
        .list(&user, limit, req.until_id.as_deref(), req.status)
        .await?;
    Ok(ApiResponse::ok(
        submissions.into_iter().map(Into::into).collect(),
    ))
}

/// Show a single submission.
async fn show(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SubmissionIdRequest>,
) -> AppResult<ApiResponse<SubmissionResponse>> {
    let submission = state
        .submission_service
        .get(&user, &req.submission_id)
        .await?;
    Ok(ApiResponse::ok(submission.into()))
}

/// Approve a pending submission.
async fn approve(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SubmissionIdRequest>,
) -> AppResult<ApiResponse<SubmissionResponse>> {
    let submission = state
        .submission_service
        .approve(&user, &req.submission_id)
        .await?;
    Ok(ApiResponse::ok(submission.into()))
}

/// Reject a pending submission with a reason.
async fn reject(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<RejectRequest>,
) -> AppResult<ApiResponse<SubmissionResponse>> {
    let submission = state
        .submission_service
        .reject(&user, &req.submission_id, &req.reason)
        .await?;
    Ok(ApiResponse::ok(submission.into()))
}

/// Refresh the drifting view count from the video platform.
async fn refresh_views(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SubmissionIdRequest>,
) -> AppResult<ApiResponse<SubmissionResponse>> {
    let submission = state
        .submission_service
        .refresh_views(&user, &req.submission_id)
        .await?;
    Ok(ApiResponse::ok(submission.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/list", post(list))
        .route("/show", post(show))
        .route("/approve", post(approve))
        .route("/reject", post(reject))
        .route("/refresh-views", post(refresh_views))
}
