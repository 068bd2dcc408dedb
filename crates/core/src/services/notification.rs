//! Notification service.
//!
//! Notifications are best-effort: emission failures are logged and never
//! fail the workflow step that triggered them. Callers use the `notify_*`
//! helpers, which swallow and log errors.

use clipcommerce_common::{AppResult, IdGenerator};
use clipcommerce_db::{
    entities::notification::{self, NotificationType},
    repositories::NotificationRepository,
};
use rust_decimal::Decimal;
use sea_orm::Set;

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    id_gen: IdGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(notification_repo: NotificationRepository) -> Self {
        Self {
            notification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Notify a creator that a clipper submitted a clip. Best effort.
    pub async fn notify_new_submission(
        &self,
        creator_user_id: &str,
        clipper_name: &str,
        submission_id: &str,
    ) {
        let result = self
            .create_internal(
                creator_user_id,
                NotificationType::NewSubmission,
                "New clip submission",
                &format!("{clipper_name} submitted a clip for your review"),
                Some(submission_id),
            )
            .await;

        if let Err(e) = result {
            tracing::warn!(error = %e, submission_id, "Failed to emit new-submission notification");
        }
    }

    /// Notify a clipper that their submission was approved. Best effort.
    pub async fn notify_submission_approved(&self, clipper_user_id: &str, submission_id: &str) {
        let result = self
            .create_internal(
                clipper_user_id,
                NotificationType::SubmissionApproved,
                "Submission approved",
                "Your clip was approved and is eligible for payment",
                Some(submission_id),
            )
            .await;

        if let Err(e) = result {
            tracing::warn!(error = %e, submission_id, "Failed to emit approval notification");
        }
    }

    /// Notify a clipper that their submission was rejected. Best effort.
    pub async fn notify_submission_rejected(
        &self,
        clipper_user_id: &str,
        submission_id: &str,
        reason: &str,
    ) {
        let result = self
            .create_internal(
                clipper_user_id,
                NotificationType::SubmissionRejected,
                "Submission rejected",
                &format!("Your clip was rejected: {reason}"),
                Some(submission_id),
            )
            .await;

        if let Err(e) = result {
            tracing::warn!(error = %e, submission_id, "Failed to emit rejection notification");
        }
    }

    /// Notify a clipper that a payment was sent. Best effort.
    pub async fn notify_payment_sent(
        &self,
        clipper_user_id: &str,
        submission_id: &str,
        clipper_net: Decimal,
    ) {
        let result = self
            .create_internal(
                clipper_user_id,
                NotificationType::PaymentSent,
                "Payment on the way",
                &format!("A payment of ${clipper_net} was sent for your clip"),
                Some(submission_id),
            )
            .await;

        if let Err(e) = result {
            tracing::warn!(error = %e, submission_id, "Failed to emit payment notification");
        }
    }

    /// Notify a clipper that a payment failed. Best effort.
    pub async fn notify_payment_failed(
        &self,
        clipper_user_id: &str,
        submission_id: &str,
        reason: &str,
    ) {
        let result = self
            .create_internal(
                clipper_user_id,
                NotificationType::PaymentFailed,
                "Payment failed",
                &format!("The payment for your clip failed: {reason}"),
                Some(submission_id),
            )
            .await;

        if let Err(e) = result {
            tracing::warn!(error = %e, submission_id, "Failed to emit payment-failure notification");
        }
    }

    /// Internal helper to create notifications.
    async fn create_internal(
        &self,
        user_id: &str,
        notification_type: NotificationType,
        title: &str,
        message: &str,
        submission_id: Option<&str>,
    ) -> AppResult<notification::Model> {
        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            notification_type: Set(notification_type),
            title: Set(title.to_string()),
            message: Set(message.to_string()),
            action_url: Set(submission_id.map(|id| format!("/submissions/{id}"))),
            submission_id: Set(submission_id.map(ToString::to_string)),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.notification_repo.create(model).await
    }

    /// Get notifications for a user.
    pub async fn get_notifications(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
        unread_only: bool,
    ) -> AppResult<Vec<notification::Model>> {
        self.notification_repo
            .find_by_user(user_id, limit, until_id, unread_only)
            .await
    }

    /// Mark a notification as read.
    pub async fn mark_as_read(&self, user_id: &str, notification_id: &str) -> AppResult<()> {
        // Verify the notification belongs to the user
        let notification = self.notification_repo.find_by_id(notification_id).await?;
        if let Some(n) = notification
            && n.user_id == user_id
        {
            self.notification_repo.mark_as_read(notification_id).await?;
        }
        Ok(())
    }

    /// Mark all notifications as read for a user.
    pub async fn mark_all_as_read(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.mark_all_as_read(user_id).await
    }

    /// Count unread notifications for a user.
    pub async fn count_unread(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.count_unread(user_id).await
    }
}
