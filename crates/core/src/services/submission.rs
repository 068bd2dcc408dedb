//! Submission lifecycle: creation, review, view refresh.
//!
//! Status changes go through [`next_status`], an explicit transition table,
//! and are applied with compare-and-swap updates so a concurrent competing
//! action loses cleanly instead of clobbering the row.

use std::sync::Arc;

use clipcommerce_common::{AppError, AppResult, IdGenerator};
use clipcommerce_db::entities::{submission, submission::SubmissionStatus, user, UserRole};
use clipcommerce_db::repositories::{
    ClipperProfileRepository, CreatorProfileRepository, SubmissionRepository,
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use serde::Deserialize;
use validator::Validate;

use super::{compute_payment, NotificationService, StatsService, VideoProvider};

/// Actions that may move a submission between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionAction {
    /// Creator accepts the clip.
    Approve,
    /// Creator declines the clip.
    Reject,
    /// Creator initiates payment for an approved clip.
    Settle,
    /// Payment gateway confirmed the transfer.
    TransferSucceeded,
    /// Payment gateway reported the transfer failed.
    TransferFailed,
}

impl SubmissionAction {
    /// Lowercase verb used in error messages.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Settle => "settle",
            Self::TransferSucceeded => "confirm payment for",
            Self::TransferFailed => "fail payment for",
        }
    }
}

/// Lowercase state name used in error messages and filters.
#[must_use]
pub const fn status_name(status: SubmissionStatus) -> &'static str {
    match status {
        SubmissionStatus::Pending => "pending",
        SubmissionStatus::Approved => "approved",
        SubmissionStatus::Rejected => "rejected",
        SubmissionStatus::Paid => "paid",
        SubmissionStatus::PaymentFailed => "payment_failed",
    }
}

/// The full transition table for submission statuses.
///
/// Every `(state, action)` pair not listed here is an
/// [`AppError::InvalidStateTransition`]. `Rejected` and `PaymentFailed`
/// are terminal; `Paid` can only be reversed by a failed-transfer callback.
pub fn next_status(from: SubmissionStatus, action: SubmissionAction) -> AppResult<SubmissionStatus> {
    match (from, action) {
        (SubmissionStatus::Pending, SubmissionAction::Approve) => Ok(SubmissionStatus::Approved),
        (SubmissionStatus::Pending, SubmissionAction::Reject) => Ok(SubmissionStatus::Rejected),
        (SubmissionStatus::Approved, SubmissionAction::Settle) => Ok(SubmissionStatus::Paid),
        (SubmissionStatus::Paid, SubmissionAction::TransferSucceeded) => Ok(SubmissionStatus::Paid),
        (SubmissionStatus::Paid, SubmissionAction::TransferFailed) => {
            Ok(SubmissionStatus::PaymentFailed)
        }
        (from, action) => Err(AppError::InvalidStateTransition {
            from: status_name(from).to_string(),
            action: action.verb().to_string(),
        }),
    }
}

/// Input for creating a submission.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionInput {
    /// Creator profile the clip is submitted to.
    #[validate(length(min = 1, message = "creatorId is required"))]
    pub creator_id: String,
    /// Video ID at the external video platform.
    #[validate(length(min = 1, max = 128, message = "videoId must be 1-128 characters"))]
    pub external_video_id: String,
}

/// Submission lifecycle service.
#[derive(Clone)]
pub struct SubmissionService {
    db: Arc<DatabaseConnection>,
    submission_repo: SubmissionRepository,
    creator_repo: CreatorProfileRepository,
    clipper_repo: ClipperProfileRepository,
    video: Arc<dyn VideoProvider>,
    stats: StatsService,
    notifications: NotificationService,
    id_gen: IdGenerator,
}

impl SubmissionService {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        submission_repo: SubmissionRepository,
        creator_repo: CreatorProfileRepository,
        clipper_repo: ClipperProfileRepository,
        video: Arc<dyn VideoProvider>,
        stats: StatsService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            db,
            submission_repo,
            creator_repo,
            clipper_repo,
            video,
            stats,
            notifications,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a clip to a creator.
    ///
    /// Verifies video ownership against the clipper's registered channel,
    /// fetches the current view count and freezes the payment amount from
    /// it. The payment never changes afterwards, however the views drift.
    pub async fn create_submission(
        &self,
        actor: &user::Model,
        input: CreateSubmissionInput,
    ) -> AppResult<submission::Model> {
        input.validate()?;

        let clipper = self
            .clipper_repo
            .find_by_user_id(&actor.id)
            .await?
            .ok_or_else(|| AppError::Forbidden("only clippers can submit clips".to_string()))?;

        let channel_id = clipper.channel_id.as_deref().ok_or_else(|| {
            AppError::Validation(
                "a channel must be linked to the clipper profile before submitting".to_string(),
            )
        })?;

        let creator = self
            .creator_repo
            .find_by_id(&input.creator_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("creator {} not found", input.creator_id)))?;

        // One submission per (creator, video); surface the existing one.
        if let Some(existing) = self
            .submission_repo
            .find_by_creator_and_video(&creator.id, &input.external_video_id)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "video already submitted to this creator as submission {} ({})",
                existing.id,
                status_name(existing.status)
            )));
        }

        if !self
            .video
            .verify_ownership(&input.external_video_id, channel_id)
            .await?
        {
            return Err(AppError::Forbidden(
                "video does not belong to your linked channel".to_string(),
            ));
        }

        let metadata = self.video.video_metadata(&input.external_video_id).await?;
        let views = i64::try_from(metadata.view_count).unwrap_or(i64::MAX);

        let payment_amount =
            compute_payment(metadata.view_count, creator.rate_amount, creator.rate_views)?;

        let model = submission::ActiveModel {
            id: Set(self.id_gen.generate()),
            creator_id: Set(creator.id.clone()),
            clipper_id: Set(clipper.id.clone()),
            external_video_id: Set(input.external_video_id),
            views_at_submit: Set(views),
            views_current: Set(views),
            payment_amount: Set(payment_amount),
            platform_fee: Set(None),
            clipper_net: Set(None),
            status: Set(SubmissionStatus::Pending),
            rejection_reason: Set(None),
            submitted_at: Set(chrono::Utc::now().into()),
            reviewed_at: Set(None),
            paid_at: Set(None),
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let created = self.submission_repo.create(&txn, model).await?;
        self.stats.recompute(&txn, &clipper.id).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let creator_user_id = creator.user_id.clone();
        self.notifications
            .notify_new_submission(&creator_user_id, &actor.display_name, &created.id)
            .await;

        Ok(created)
    }

    /// Approve a pending submission.
    pub async fn approve(
        &self,
        actor: &user::Model,
        submission_id: &str,
    ) -> AppResult<submission::Model> {
        self.review(actor, submission_id, SubmissionAction::Approve, None)
            .await
    }

    /// Reject a pending submission with a reason.
    pub async fn reject(
        &self,
        actor: &user::Model,
        submission_id: &str,
        reason: &str,
    ) -> AppResult<submission::Model> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation(
                "a rejection reason is required".to_string(),
            ));
        }
        self.review(actor, submission_id, SubmissionAction::Reject, Some(reason))
            .await
    }

    /// Shared approve/reject path.
    ///
    /// The status flip and the stats recompute commit in one database
    /// transaction; the notification is emitted after commit, best effort.
    async fn review(
        &self,
        actor: &user::Model,
        submission_id: &str,
        action: SubmissionAction,
        rejection_reason: Option<&str>,
    ) -> AppResult<submission::Model> {
        let submission = self.find_owned_by_creator(actor, submission_id).await?;
        let target = next_status(submission.status, action)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let rows = self
            .submission_repo
            .mark_reviewed(&txn, submission_id, target, rejection_reason)
            .await?;
        if rows == 0 {
            // A concurrent review won the compare-and-swap.
            txn.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Err(AppError::InvalidStateTransition {
                from: status_name(submission.status).to_string(),
                action: action.verb().to_string(),
            });
        }

        self.stats.recompute(&txn, &submission.clipper_id).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let updated = self
            .submission_repo
            .find_by_id(submission_id)
            .await?
            .ok_or_else(|| AppError::SubmissionNotFound(submission_id.to_string()))?;

        if let Ok(Some(clipper)) = self.clipper_repo.find_by_id(&updated.clipper_id).await {
            match action {
                SubmissionAction::Approve => {
                    self.notifications
                        .notify_submission_approved(&clipper.user_id, submission_id)
                        .await;
                }
                SubmissionAction::Reject => {
                    self.notifications
                        .notify_submission_rejected(
                            &clipper.user_id,
                            submission_id,
                            rejection_reason.unwrap_or_default(),
                        )
                        .await;
                }
                _ => {}
            }
        }

        Ok(updated)
    }

    /// Refresh the drifting view count from the video platform.
    ///
    /// Display-only: the frozen `payment_amount` is never recomputed.
    pub async fn refresh_views(
        &self,
        actor: &user::Model,
        submission_id: &str,
    ) -> AppResult<submission::Model> {
        let submission = self.find_visible(actor, submission_id).await?;

        let metadata = self
            .video
            .video_metadata(&submission.external_video_id)
            .await?;
        let views = i64::try_from(metadata.view_count).unwrap_or(i64::MAX);

        self.submission_repo
            .update_views_current(&submission.id, views)
            .await?;

        self.submission_repo
            .find_by_id(submission_id)
            .await?
            .ok_or_else(|| AppError::SubmissionNotFound(submission_id.to_string()))
    }

    /// Fetch a submission visible to the actor (its creator or clipper).
    pub async fn get(
        &self,
        actor: &user::Model,
        submission_id: &str,
    ) -> AppResult<submission::Model> {
        self.find_visible(actor, submission_id).await
    }

    /// List submissions from the actor's side of the marketplace.
    pub async fn list(
        &self,
        actor: &user::Model,
        limit: u64,
        until_id: Option<&str>,
        status: Option<SubmissionStatus>,
    ) -> AppResult<Vec<submission::Model>> {
        match actor.role {
            UserRole::Creator => {
                let profile = self
                    .creator_repo
                    .find_by_user_id(&actor.id)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound("creator profile not set up".to_string())
                    })?;
                self.submission_repo
                    .list_by_creator(&profile.id, limit, until_id, status)
                    .await
            }
            UserRole::Clipper => {
                let profile = self
                    .clipper_repo
                    .find_by_user_id(&actor.id)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound("clipper profile not set up".to_string())
                    })?;
                self.submission_repo
                    .list_by_clipper(&profile.id, limit, until_id, status)
                    .await
            }
        }
    }

    /// Fetch a submission and require the actor to be its creator.
    pub(crate) async fn find_owned_by_creator(
        &self,
        actor: &user::Model,
        submission_id: &str,
    ) -> AppResult<submission::Model> {
        let submission = self
            .submission_repo
            .find_by_id(submission_id)
            .await?
            .ok_or_else(|| AppError::SubmissionNotFound(submission_id.to_string()))?;

        self.creator_repo
            .find_by_user_id(&actor.id)
            .await?
            .filter(|p| p.id == submission.creator_id)
            .ok_or_else(|| {
                AppError::Forbidden("only the receiving creator can act on this submission".into())
            })?;

        Ok(submission)
    }

    /// Fetch a submission and require the actor to be a party to it.
    async fn find_visible(
        &self,
        actor: &user::Model,
        submission_id: &str,
    ) -> AppResult<submission::Model> {
        let submission = self
            .submission_repo
            .find_by_id(submission_id)
            .await?
            .ok_or_else(|| AppError::SubmissionNotFound(submission_id.to_string()))?;

        let is_creator = self
            .creator_repo
            .find_by_user_id(&actor.id)
            .await?
            .is_some_and(|p| p.id == submission.creator_id);
        let is_clipper = self
            .clipper_repo
            .find_by_user_id(&actor.id)
            .await?
            .is_some_and(|p| p.id == submission.clipper_id);

        if is_creator || is_clipper {
            Ok(submission)
        } else {
            Err(AppError::Forbidden(
                "submission is only visible to its creator and clipper".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_transitions() {
        assert_eq!(
            next_status(SubmissionStatus::Pending, SubmissionAction::Approve).unwrap(),
            SubmissionStatus::Approved
        );
        assert_eq!(
            next_status(SubmissionStatus::Pending, SubmissionAction::Reject).unwrap(),
            SubmissionStatus::Rejected
        );
    }

    #[test]
    fn test_only_approved_settles() {
        assert_eq!(
            next_status(SubmissionStatus::Approved, SubmissionAction::Settle).unwrap(),
            SubmissionStatus::Paid
        );

        for from in [
            SubmissionStatus::Pending,
            SubmissionStatus::Rejected,
            SubmissionStatus::Paid,
            SubmissionStatus::PaymentFailed,
        ] {
            let err = next_status(from, SubmissionAction::Settle).unwrap_err();
            assert!(matches!(err, AppError::InvalidStateTransition { .. }));
        }
    }

    #[test]
    fn test_settle_pending_error_message() {
        let err = next_status(SubmissionStatus::Pending, SubmissionAction::Settle).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid state transition: cannot settle a pending submission"
        );
    }

    #[test]
    fn test_paid_reversal() {
        assert_eq!(
            next_status(SubmissionStatus::Paid, SubmissionAction::TransferFailed).unwrap(),
            SubmissionStatus::PaymentFailed
        );
        // A confirmation callback leaves the state alone.
        assert_eq!(
            next_status(SubmissionStatus::Paid, SubmissionAction::TransferSucceeded).unwrap(),
            SubmissionStatus::Paid
        );
    }

    #[test]
    fn test_terminal_states_reject_review() {
        for from in [
            SubmissionStatus::Rejected,
            SubmissionStatus::Paid,
            SubmissionStatus::PaymentFailed,
        ] {
            assert!(next_status(from, SubmissionAction::Approve).is_err());
            assert!(next_status(from, SubmissionAction::Reject).is_err());
        }
    }

    #[test]
    fn test_status_names() {
        assert_eq!(status_name(SubmissionStatus::PaymentFailed), "payment_failed");
        assert_eq!(status_name(SubmissionStatus::Pending), "pending");
    }
}
