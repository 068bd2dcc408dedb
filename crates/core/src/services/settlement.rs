//! Payment settlement and gateway webhook handling.
//!
//! Settlement is optimistic: the submission is marked `Paid` in the same
//! database transaction that records the pending transfer, and the gateway's
//! webhook later confirms or reverses it. Two guards prevent a submission
//! from ever being paid twice: a pre-check for a live (non-failed)
//! transaction and a partial unique index that turns the losing side of a
//! race into a `Conflict`.

use std::sync::Arc;

use clipcommerce_common::{round_to_cents, split_fee, to_minor_units, AppError, AppResult, IdGenerator};
use clipcommerce_db::entities::{transaction, transaction::TransactionStatus, user};
use clipcommerce_db::repositories::{
    ClipperProfileRepository, SubmissionRepository, TransactionRepository,
};
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use serde::Deserialize;
use sha2::Sha256;

use super::{
    next_status, status_name, CreateTransfer, NotificationService, PaymentGateway,
    SubmissionAction, SubmissionService,
};

type HmacSha256 = Hmac<Sha256>;

/// Settlement knobs sourced from configuration.
#[derive(Debug, Clone)]
pub struct SettlementConfig {
    /// Platform fee rate as a fraction of the gross (e.g. `0.05`).
    pub fee_rate: Decimal,
    /// Shared secret for webhook signature verification.
    pub webhook_secret: String,
}

/// Transfer status event delivered by the payment gateway.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferWebhookEvent {
    /// `transfer.succeeded` or `transfer.failed`.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Gateway transfer ID, matched against `external_transfer_id`.
    pub transfer_id: String,
    /// Populated on failure events.
    #[serde(default)]
    pub failure_reason: Option<String>,
}

/// Payment settlement orchestrator.
#[derive(Clone)]
pub struct SettlementService {
    db: Arc<DatabaseConnection>,
    submission_repo: SubmissionRepository,
    transaction_repo: TransactionRepository,
    clipper_repo: ClipperProfileRepository,
    submissions: SubmissionService,
    gateway: Arc<dyn PaymentGateway>,
    notifications: NotificationService,
    config: SettlementConfig,
    id_gen: IdGenerator,
}

impl SettlementService {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        submission_repo: SubmissionRepository,
        transaction_repo: TransactionRepository,
        clipper_repo: ClipperProfileRepository,
        submissions: SubmissionService,
        gateway: Arc<dyn PaymentGateway>,
        notifications: NotificationService,
        config: SettlementConfig,
    ) -> Self {
        Self {
            db,
            submission_repo,
            transaction_repo,
            clipper_repo,
            submissions,
            gateway,
            notifications,
            config,
            id_gen: IdGenerator::new(),
        }
    }

    /// Settle an approved submission: split the fee, create a gateway
    /// transfer, record the transaction and optimistically mark the
    /// submission paid.
    ///
    /// A gateway failure (including a timeout with unknown outcome) leaves
    /// the submission `Approved` and records nothing, so the creator can
    /// retry once the gateway recovers.
    pub async fn settle(
        &self,
        actor: &user::Model,
        submission_id: &str,
    ) -> AppResult<transaction::Model> {
        let submission = self
            .submissions
            .find_owned_by_creator(actor, submission_id)
            .await?;

        // Fail before any transfer or row is created.
        next_status(submission.status, SubmissionAction::Settle)?;

        let clipper = self
            .clipper_repo
            .find_by_id(&submission.clipper_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("clipper {} not found", submission.clipper_id))
            })?;
        let payout_account_id = clipper
            .payout_account_id
            .as_deref()
            .ok_or(AppError::MissingPayoutAccount)?;

        if self
            .transaction_repo
            .find_live_by_submission(submission_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "a payment for this submission is already pending or completed".to_string(),
            ));
        }

        let gross = round_to_cents(submission.payment_amount);
        let split = split_fee(gross, self.config.fee_rate);

        let handle = self
            .gateway
            .create_transfer(CreateTransfer {
                amount_minor: to_minor_units(split.clipper_net),
                currency: "usd".to_string(),
                destination_account_id: payout_account_id.to_string(),
                transfer_group: format!("submission_{submission_id}"),
                metadata: serde_json::json!({
                    "submissionId": submission_id,
                    "clipperId": submission.clipper_id,
                }),
            })
            .await?;

        let model = transaction::ActiveModel {
            id: Set(self.id_gen.generate()),
            submission_id: Set(submission_id.to_string()),
            amount: Set(gross),
            platform_fee: Set(split.platform_fee),
            clipper_net: Set(split.clipper_net),
            external_transfer_id: Set(handle.transfer_id),
            status: Set(TransactionStatus::Pending),
            failure_reason: Set(None),
            created_at: Set(chrono::Utc::now().into()),
            completed_at: Set(None),
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let created = self.transaction_repo.create(&txn, model).await?;

        let rows = self
            .submission_repo
            .mark_paid(&txn, submission_id, split.platform_fee, split.clipper_net)
            .await?;
        if rows == 0 {
            txn.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Err(AppError::InvalidStateTransition {
                from: status_name(submission.status).to_string(),
                action: SubmissionAction::Settle.verb().to_string(),
            });
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.notifications
            .notify_payment_sent(&clipper.user_id, submission_id, split.clipper_net)
            .await;

        Ok(created)
    }

    /// Verify a webhook payload signature (`sha256=<hex>` over the raw body).
    pub fn verify_signature(&self, payload: &[u8], signature: &str) -> AppResult<()> {
        verify_webhook_signature(&self.config.webhook_secret, payload, signature)
    }

    /// Apply a transfer status event from the payment gateway.
    ///
    /// Idempotent: the transaction-row status change is a compare-and-swap
    /// on `pending`, so a duplicate delivery matches zero rows and applies
    /// no side effects (no double-counted earnings, no repeat
    /// notification). Unknown transfer IDs are a `NotFound` so the gateway
    /// retries later; unknown event types are acknowledged and dropped.
    pub async fn handle_transfer_webhook(&self, event: &TransferWebhookEvent) -> AppResult<()> {
        match event.event_type.as_str() {
            "transfer.succeeded" => self.apply_success(&event.transfer_id).await,
            "transfer.failed" => {
                let reason = event
                    .failure_reason
                    .as_deref()
                    .unwrap_or("transfer failed");
                self.apply_failure(&event.transfer_id, reason).await
            }
            other => {
                tracing::debug!(event_type = other, "Ignoring unhandled webhook event type");
                Ok(())
            }
        }
    }

    async fn apply_success(&self, transfer_id: &str) -> AppResult<()> {
        let record = self
            .transaction_repo
            .find_by_external_transfer_id(transfer_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("unknown transfer {transfer_id}")))?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let rows = self.transaction_repo.mark_succeeded(&txn, &record.id).await?;
        let mut clipper_user_id = None;
        if rows == 1 {
            let submission = self
                .submission_repo
                .find_by_id(&record.submission_id)
                .await?
                .ok_or_else(|| AppError::SubmissionNotFound(record.submission_id.clone()))?;

            self.clipper_repo
                .add_earned(&txn, &submission.clipper_id, record.clipper_net)
                .await?;

            clipper_user_id = self
                .clipper_repo
                .find_by_id(&submission.clipper_id)
                .await?
                .map(|clipper| clipper.user_id);
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if let Some(user_id) = clipper_user_id {
            self.notifications
                .notify_payment_sent(&user_id, &record.submission_id, record.clipper_net)
                .await;
        }

        Ok(())
    }

    async fn apply_failure(&self, transfer_id: &str, reason: &str) -> AppResult<()> {
        let record = self
            .transaction_repo
            .find_by_external_transfer_id(transfer_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("unknown transfer {transfer_id}")))?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let rows = self
            .transaction_repo
            .mark_failed(&txn, &record.id, reason)
            .await?;
        let mut clipper_user_id = None;
        if rows == 1 {
            self.submission_repo
                .mark_payment_failed(&txn, &record.submission_id)
                .await?;

            if let Some(submission) = self.submission_repo.find_by_id(&record.submission_id).await?
                && let Some(clipper) = self.clipper_repo.find_by_id(&submission.clipper_id).await?
            {
                clipper_user_id = Some(clipper.user_id);
            }
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if let Some(user_id) = clipper_user_id {
            self.notifications
                .notify_payment_failed(&user_id, &record.submission_id, reason)
                .await;
        }

        Ok(())
    }
}

/// Verify an HMAC-SHA256 webhook signature in `sha256=<hex>` format,
/// computed over the raw request body.
pub fn verify_webhook_signature(secret: &str, payload: &[u8], signature: &str) -> AppResult<()> {
    let hex_sig = signature
        .strip_prefix("sha256=")
        .ok_or(AppError::Unauthorized)?;
    let expected = hex::decode(hex_sig).map_err(|_| AppError::Unauthorized)?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Internal(format!("webhook secret rejected: {e}")))?;
    mac.update(payload);
    mac.verify_slice(&expected)
        .map_err(|_| AppError::Unauthorized)
}
