//! End-to-end workflow tests against a real database.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test workflow_integration -- --ignored`
//!
//! External providers are replaced with in-process fakes so the full
//! submission lifecycle (submit, review, settle, webhook) runs without
//! network access.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use clipcommerce_common::{AppError, AppResult};
use clipcommerce_core::{
    CreateSubmissionInput, CreateTransfer, NotificationService, PaymentGateway, ProfileService,
    RegisterInput, SettlementConfig, SettlementService, SetupClipperInput, SetupCreatorInput,
    StatsService, SubmissionService, TransferHandle, TransferWebhookEvent, UserService,
    VideoMetadata, VideoProvider,
};
use clipcommerce_db::entities::{submission::SubmissionStatus, user, UserRole};
use clipcommerce_db::repositories::{
    ClipperProfileRepository, CreatorProfileRepository, NotificationRepository,
    SubmissionRepository, TransactionRepository, UserRepository,
};
use clipcommerce_db::test_utils::TestDatabase;
use rust_decimal::Decimal;

/// Video provider fake returning a fixed view count and owning everything.
struct FakeVideoProvider {
    view_count: AtomicU64,
}

impl FakeVideoProvider {
    fn new(view_count: u64) -> Self {
        Self {
            view_count: AtomicU64::new(view_count),
        }
    }
}

#[async_trait]
impl VideoProvider for FakeVideoProvider {
    async fn video_metadata(&self, _video_id: &str) -> AppResult<VideoMetadata> {
        Ok(VideoMetadata {
            view_count: self.view_count.load(Ordering::SeqCst),
            title: "test clip".to_string(),
            thumbnail_url: None,
            published_at: None,
        })
    }

    async fn verify_ownership(&self, _video_id: &str, _channel_id: &str) -> AppResult<bool> {
        Ok(true)
    }
}

/// Gateway fake that hands out sequential transfer IDs and counts calls.
struct FakeGateway {
    calls: AtomicU64,
    fail: bool,
}

impl FakeGateway {
    fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            calls: AtomicU64::new(0),
            fail: true,
        }
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_transfer(&self, _request: CreateTransfer) -> AppResult<TransferHandle> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::Dependency("gateway unavailable".to_string()));
        }
        Ok(TransferHandle {
            transfer_id: format!("tr_{n}"),
        })
    }
}

struct Harness {
    db: TestDatabase,
    conn: Arc<sea_orm::DatabaseConnection>,
    users: UserService,
    profiles: ProfileService,
    submissions: SubmissionService,
    settlement: SettlementService,
    submission_repo: SubmissionRepository,
    transaction_repo: TransactionRepository,
}

impl Harness {
    async fn new(gateway: Arc<dyn PaymentGateway>, views: u64) -> Self {
        let db = TestDatabase::create_unique().await.unwrap();
        let conn = db.conn.clone();

        let user_repo = UserRepository::new(conn.clone());
        let creator_repo = CreatorProfileRepository::new(conn.clone());
        let clipper_repo = ClipperProfileRepository::new(conn.clone());
        let submission_repo = SubmissionRepository::new(conn.clone());
        let transaction_repo = TransactionRepository::new(conn.clone());
        let notification_repo = NotificationRepository::new(conn.clone());

        let notifications = NotificationService::new(notification_repo);
        let stats = StatsService::new(submission_repo.clone(), clipper_repo.clone());
        let video: Arc<dyn VideoProvider> = Arc::new(FakeVideoProvider::new(views));

        let submissions = SubmissionService::new(
            conn.clone(),
            submission_repo.clone(),
            creator_repo.clone(),
            clipper_repo.clone(),
            video,
            stats,
            notifications.clone(),
        );

        let settlement = SettlementService::new(
            conn.clone(),
            submission_repo.clone(),
            transaction_repo.clone(),
            clipper_repo.clone(),
            submissions.clone(),
            gateway,
            notifications,
            SettlementConfig {
                fee_rate: Decimal::new(5, 2),
                webhook_secret: "whsec_test".to_string(),
            },
        );

        Self {
            db,
            conn,
            users: UserService::new(user_repo),
            profiles: ProfileService::new(creator_repo, clipper_repo.clone()),
            submissions,
            settlement,
            submission_repo,
            transaction_repo,
        }
    }

    /// Register a creator ($20 per 1000 views) and a clipper with a linked
    /// channel and payout account.
    async fn seed_pair(&self) -> (user::Model, user::Model, String) {
        let (creator_user, _) = self
            .users
            .register(RegisterInput {
                external_auth_id: "auth|creator".to_string(),
                email: "creator@example.com".to_string(),
                display_name: "Creator".to_string(),
                role: UserRole::Creator,
            })
            .await
            .unwrap();
        let creator_profile = self
            .profiles
            .setup_creator(
                &creator_user,
                SetupCreatorInput {
                    rate_amount: Decimal::new(20, 0),
                    rate_views: 1000,
                },
            )
            .await
            .unwrap();

        let (clipper_user, _) = self
            .users
            .register(RegisterInput {
                external_auth_id: "auth|clipper".to_string(),
                email: "clipper@example.com".to_string(),
                display_name: "Clipper".to_string(),
                role: UserRole::Clipper,
            })
            .await
            .unwrap();
        self.profiles
            .setup_clipper(
                &clipper_user,
                SetupClipperInput {
                    channel_id: "chan1".to_string(),
                },
            )
            .await
            .unwrap();
        self.profiles
            .set_payout_account(&clipper_user, "acct_1")
            .await
            .unwrap();

        (creator_user, clipper_user, creator_profile.id)
    }

    async fn finish(self) {
        drop(self.conn);
        self.db.drop_database().await.unwrap();
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_rejection_updates_stats_and_is_terminal() {
    let harness = Harness::new(Arc::new(FakeGateway::new()), 500).await;
    let (creator, clipper, creator_id) = harness.seed_pair().await;

    let submission = harness
        .submissions
        .create_submission(
            &clipper,
            CreateSubmissionInput {
                creator_id,
                external_video_id: "vid1".to_string(),
            },
        )
        .await
        .unwrap();
    // 500 views at $20 per 1000
    assert_eq!(submission.payment_amount, Decimal::new(10, 0));

    let rejected = harness
        .submissions
        .reject(&creator, &submission.id, "off topic")
        .await
        .unwrap();
    assert_eq!(rejected.status, SubmissionStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("off topic"));

    let profile = harness.profiles.get_clipper(&clipper).await.unwrap();
    assert_eq!(profile.total_submissions, 1);
    assert_eq!(profile.total_approved, 0);
    assert_eq!(profile.approval_rate, Decimal::ZERO);

    // Terminal: a second review attempt is refused
    let err = harness
        .submissions
        .approve(&creator, &submission.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidStateTransition { .. }));

    harness.finish().await;
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_empty_rejection_reason_mutates_nothing() {
    let harness = Harness::new(Arc::new(FakeGateway::new()), 500).await;
    let (creator, clipper, creator_id) = harness.seed_pair().await;

    let submission = harness
        .submissions
        .create_submission(
            &clipper,
            CreateSubmissionInput {
                creator_id,
                external_video_id: "vid1".to_string(),
            },
        )
        .await
        .unwrap();

    let err = harness
        .submissions
        .reject(&creator, &submission.id, "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let unchanged = harness
        .submission_repo
        .find_by_id(&submission.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.status, SubmissionStatus::Pending);

    harness.finish().await;
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_approve_settle_webhook_success_flow() {
    let harness = Harness::new(Arc::new(FakeGateway::new()), 500).await;
    let (creator, clipper, creator_id) = harness.seed_pair().await;

    let submission = harness
        .submissions
        .create_submission(
            &clipper,
            CreateSubmissionInput {
                creator_id,
                external_video_id: "vid1".to_string(),
            },
        )
        .await
        .unwrap();

    let approved = harness
        .submissions
        .approve(&creator, &submission.id)
        .await
        .unwrap();
    assert_eq!(approved.status, SubmissionStatus::Approved);

    let profile = harness.profiles.get_clipper(&clipper).await.unwrap();
    assert_eq!(profile.total_approved, 1);
    assert_eq!(profile.approval_rate, Decimal::new(100, 0));

    let record = harness
        .settlement
        .settle(&creator, &submission.id)
        .await
        .unwrap();
    // $10 gross at a 5% fee
    assert_eq!(record.platform_fee, Decimal::new(50, 2));
    assert_eq!(record.clipper_net, Decimal::new(950, 2));
    assert_eq!(
        record.platform_fee + record.clipper_net,
        Decimal::new(10, 0)
    );

    let paid = harness
        .submission_repo
        .find_by_id(&submission.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(paid.status, SubmissionStatus::Paid);

    // Earnings are not credited until the gateway confirms
    let profile = harness.profiles.get_clipper(&clipper).await.unwrap();
    assert_eq!(profile.total_earned, Decimal::ZERO);

    let event = TransferWebhookEvent {
        event_type: "transfer.succeeded".to_string(),
        transfer_id: record.external_transfer_id.clone(),
        failure_reason: None,
    };
    harness.settlement.handle_transfer_webhook(&event).await.unwrap();

    let profile = harness.profiles.get_clipper(&clipper).await.unwrap();
    assert_eq!(profile.total_earned, Decimal::new(950, 2));

    // Duplicate delivery applies nothing
    harness.settlement.handle_transfer_webhook(&event).await.unwrap();
    let profile = harness.profiles.get_clipper(&clipper).await.unwrap();
    assert_eq!(profile.total_earned, Decimal::new(950, 2));

    harness.finish().await;
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_settle_pending_refused_without_side_effects() {
    let harness = Harness::new(Arc::new(FakeGateway::new()), 500).await;
    let (creator, clipper, creator_id) = harness.seed_pair().await;

    let submission = harness
        .submissions
        .create_submission(
            &clipper,
            CreateSubmissionInput {
                creator_id,
                external_video_id: "vid1".to_string(),
            },
        )
        .await
        .unwrap();

    let err = harness
        .settlement
        .settle(&creator, &submission.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidStateTransition { .. }));

    let live = harness
        .transaction_repo
        .find_live_by_submission(&submission.id)
        .await
        .unwrap();
    assert!(live.is_none(), "no transaction row may be created");

    harness.finish().await;
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_second_settlement_is_conflict() {
    let harness = Harness::new(Arc::new(FakeGateway::new()), 500).await;
    let (creator, clipper, creator_id) = harness.seed_pair().await;

    let submission = harness
        .submissions
        .create_submission(
            &clipper,
            CreateSubmissionInput {
                creator_id,
                external_video_id: "vid1".to_string(),
            },
        )
        .await
        .unwrap();
    harness
        .submissions
        .approve(&creator, &submission.id)
        .await
        .unwrap();
    harness
        .settlement
        .settle(&creator, &submission.id)
        .await
        .unwrap();

    let err = harness
        .settlement
        .settle(&creator, &submission.id)
        .await
        .unwrap_err();
    // The status guard trips first (the submission is already paid)
    assert!(matches!(
        err,
        AppError::InvalidStateTransition { .. } | AppError::Conflict(_)
    ));

    harness.finish().await;
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_duplicate_video_submission_is_conflict() {
    let harness = Harness::new(Arc::new(FakeGateway::new()), 500).await;
    let (_creator, clipper, creator_id) = harness.seed_pair().await;

    harness
        .submissions
        .create_submission(
            &clipper,
            CreateSubmissionInput {
                creator_id: creator_id.clone(),
                external_video_id: "vid1".to_string(),
            },
        )
        .await
        .unwrap();

    let err = harness
        .submissions
        .create_submission(
            &clipper,
            CreateSubmissionInput {
                creator_id,
                external_video_id: "vid1".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    harness.finish().await;
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_gateway_failure_leaves_submission_approved() {
    let harness = Harness::new(Arc::new(FakeGateway::failing()), 500).await;
    let (creator, clipper, creator_id) = harness.seed_pair().await;

    let submission = harness
        .submissions
        .create_submission(
            &clipper,
            CreateSubmissionInput {
                creator_id,
                external_video_id: "vid1".to_string(),
            },
        )
        .await
        .unwrap();
    harness
        .submissions
        .approve(&creator, &submission.id)
        .await
        .unwrap();

    let err = harness
        .settlement
        .settle(&creator, &submission.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Dependency(_)));

    let unchanged = harness
        .submission_repo
        .find_by_id(&submission.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.status, SubmissionStatus::Approved);
    assert!(harness
        .transaction_repo
        .find_live_by_submission(&submission.id)
        .await
        .unwrap()
        .is_none());

    harness.finish().await;
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_failed_transfer_reverses_paid_status() {
    let harness = Harness::new(Arc::new(FakeGateway::new()), 500).await;
    let (creator, clipper, creator_id) = harness.seed_pair().await;

    let submission = harness
        .submissions
        .create_submission(
            &clipper,
            CreateSubmissionInput {
                creator_id,
                external_video_id: "vid1".to_string(),
            },
        )
        .await
        .unwrap();
    harness
        .submissions
        .approve(&creator, &submission.id)
        .await
        .unwrap();
    let record = harness
        .settlement
        .settle(&creator, &submission.id)
        .await
        .unwrap();

    harness
        .settlement
        .handle_transfer_webhook(&TransferWebhookEvent {
            event_type: "transfer.failed".to_string(),
            transfer_id: record.external_transfer_id.clone(),
            failure_reason: Some("account_closed".to_string()),
        })
        .await
        .unwrap();

    let failed = harness
        .submission_repo
        .find_by_id(&submission.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(failed.status, SubmissionStatus::PaymentFailed);

    // No earnings were credited
    let profile = harness.profiles.get_clipper(&clipper).await.unwrap();
    assert_eq!(profile.total_earned, Decimal::ZERO);

    // The failed transaction no longer counts as live
    assert!(harness
        .transaction_repo
        .find_live_by_submission(&submission.id)
        .await
        .unwrap()
        .is_none());

    harness.finish().await;
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_refresh_views_never_touches_payment() {
    let harness = Harness::new(Arc::new(FakeGateway::new()), 500).await;
    let (_creator, clipper, creator_id) = harness.seed_pair().await;

    let submission = harness
        .submissions
        .create_submission(
            &clipper,
            CreateSubmissionInput {
                creator_id,
                external_video_id: "vid1".to_string(),
            },
        )
        .await
        .unwrap();

    let refreshed = harness
        .submissions
        .refresh_views(&clipper, &submission.id)
        .await
        .unwrap();
    assert_eq!(refreshed.views_at_submit, 500);
    assert_eq!(refreshed.payment_amount, submission.payment_amount);

    harness.finish().await;
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_unknown_transfer_webhook_is_not_found() {
    let harness = Harness::new(Arc::new(FakeGateway::new()), 500).await;

    let err = harness
        .settlement
        .handle_transfer_webhook(&TransferWebhookEvent {
            event_type: "transfer.succeeded".to_string(),
            transfer_id: "tr_unknown".to_string(),
            failure_reason: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    harness.finish().await;
}
