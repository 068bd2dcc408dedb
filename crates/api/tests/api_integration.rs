//! API integration tests.
//!
//! These tests drive the router against a mock database and fake external
//! providers, checking routing, authentication, and webhook verification.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use clipcommerce_api::{middleware::AppState, router as api_router};
use clipcommerce_common::{AppError, AppResult};
use clipcommerce_core::{
    CreateTransfer, NotificationService, PaymentGateway, ProfileService, SettlementConfig,
    SettlementService, StatsService, SubmissionService, TransferHandle, UserService,
    VideoMetadata, VideoProvider,
};
use clipcommerce_db::entities::transaction;
use clipcommerce_db::repositories::{
    ClipperProfileRepository, CreatorProfileRepository, NotificationRepository,
    SubmissionRepository, TransactionRepository, UserRepository,
};
use hmac::{Hmac, Mac};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use sha2::Sha256;
use tower::ServiceExt;

const WEBHOOK_SECRET: &str = "whsec_test";

struct NullVideoProvider;

#[async_trait]
impl VideoProvider for NullVideoProvider {
    async fn video_metadata(&self, _video_id: &str) -> AppResult<VideoMetadata> {
        Err(AppError::Dependency("not wired in this test".to_string()))
    }

    async fn verify_ownership(&self, _video_id: &str, _channel_id: &str) -> AppResult<bool> {
        Ok(false)
    }
}

struct NullGateway;

#[async_trait]
impl PaymentGateway for NullGateway {
    async fn create_transfer(&self, _request: CreateTransfer) -> AppResult<TransferHandle> {
        Err(AppError::Dependency("not wired in this test".to_string()))
    }
}

fn create_test_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let creator_repo = CreatorProfileRepository::new(Arc::clone(&db));
    let clipper_repo = ClipperProfileRepository::new(Arc::clone(&db));
    let submission_repo = SubmissionRepository::new(Arc::clone(&db));
    let transaction_repo = TransactionRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));

    let notification_service = NotificationService::new(notification_repo);
    let stats_service = StatsService::new(submission_repo.clone(), clipper_repo.clone());

    let submission_service = SubmissionService::new(
        Arc::clone(&db),
        submission_repo.clone(),
        creator_repo.clone(),
        clipper_repo.clone(),
        Arc::new(NullVideoProvider),
        stats_service,
        notification_service.clone(),
    );

    let settlement_service = SettlementService::new(
        Arc::clone(&db),
        submission_repo,
        transaction_repo,
        clipper_repo.clone(),
        submission_service.clone(),
        Arc::new(NullGateway),
        notification_service.clone(),
        SettlementConfig {
            fee_rate: rust_decimal::Decimal::new(5, 2),
            webhook_secret: WEBHOOK_SECRET.to_string(),
        },
    );

    AppState {
        user_service: UserService::new(user_repo),
        profile_service: ProfileService::new(creator_repo, clipper_repo),
        submission_service,
        settlement_service,
        notification_service,
    }
}

fn app(db: DatabaseConnection) -> Router {
    let state = create_test_state(db);
    Router::new()
        .nest("/api", api_router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            clipcommerce_api::middleware::auth_middleware,
        ))
        .with_state(state)
}

fn empty_mock_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn sign(payload: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
    mac.update(payload);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

#[tokio::test]
async fn test_submissions_require_auth() {
    let app = app(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/submissions/create")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"creatorId":"c1","externalVideoId":"v1"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_settle_requires_auth() {
    let app = app(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/payments/settle")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"submissionId":"s1"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_bearer_token_is_rejected() {
    // Token lookup returns no user
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<clipcommerce_db::entities::user::Model>::new()])
        .into_connection();
    let app = app(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/notifications/unread-count")
                .header("Authorization", "Bearer bogus")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_rejects_malformed_body() {
    let app = app(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users/register")
                .header("content-type", "application/json")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_webhook_without_signature_is_unauthorized() {
    let app = app(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/webhooks/payments")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"type":"transfer.succeeded","transferId":"tr_1"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_webhook_with_bad_signature_is_unauthorized() {
    let app = app(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/webhooks/payments")
                .header("content-type", "application/json")
                .header("X-Webhook-Signature", "sha256=deadbeef")
                .body(Body::from(
                    r#"{"type":"transfer.succeeded","transferId":"tr_1"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_webhook_unknown_transfer_is_not_found() {
    // The transfer lookup finds nothing
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<transaction::Model>::new()])
        .into_connection();
    let app = app(db);

    let payload = br#"{"type":"transfer.succeeded","transferId":"tr_unknown"}"#;
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/webhooks/payments")
                .header("content-type", "application/json")
                .header("X-Webhook-Signature", sign(payload))
                .body(Body::from(payload.as_slice()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_webhook_with_valid_signature_parses_body() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<transaction::Model>::new()])
        .into_connection();
    let app = app(db);

    // Valid signature over an unparseable body is a 400, not a 401
    let payload = b"not json";
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/webhooks/payments")
                .header("X-Webhook-Signature", sign(payload))
                .body(Body::from(payload.as_slice()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
