//! Submission repository.

use std::sync::Arc;

use crate::entities::{submission, submission::SubmissionStatus, Submission};
use clipcommerce_common::{AppError, AppResult};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

/// Submission repository for database operations.
#[derive(Clone)]
pub struct SubmissionRepository {
    db: Arc<DatabaseConnection>,
}

impl SubmissionRepository {
    /// Create a new submission repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a submission by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<submission::Model>> {
        Submission::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a submission by (creator, external video) pair.
    ///
    /// The pair carries a unique constraint; duplicate submissions to the
    /// same creator are rejected at creation time.
    pub async fn find_by_creator_and_video(
        &self,
        creator_id: &str,
        external_video_id: &str,
    ) -> AppResult<Option<submission::Model>> {
        Submission::find()
            .filter(submission::Column::CreatorId.eq(creator_id))
            .filter(submission::Column::ExternalVideoId.eq(external_video_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new submission on the caller's connection.
    pub async fn create<C: ConnectionTrait>(
        &self,
        db: &C,
        model: submission::ActiveModel,
    ) -> AppResult<submission::Model> {
        model
            .insert(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List submissions sent to a creator (paginated, newest first).
    pub async fn list_by_creator(
        &self,
        creator_id: &str,
        limit: u64,
        until_id: Option<&str>,
        status: Option<SubmissionStatus>,
    ) -> AppResult<Vec<submission::Model>> {
        let mut query = Submission::find()
            .filter(submission::Column::CreatorId.eq(creator_id))
            .order_by_desc(submission::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(submission::Column::Id.lt(id));
        }

        if let Some(status) = status {
            query = query.filter(submission::Column::Status.eq(status));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a clipper's submissions (paginated, newest first).
    pub async fn list_by_clipper(
        &self,
        clipper_id: &str,
        limit: u64,
        until_id: Option<&str>,
        status: Option<SubmissionStatus>,
    ) -> AppResult<Vec<submission::Model>> {
        let mut query = Submission::find()
            .filter(submission::Column::ClipperId.eq(clipper_id))
            .order_by_desc(submission::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(submission::Column::Id.lt(id));
        }

        if let Some(status) = status {
            query = query.filter(submission::Column::Status.eq(status));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Move a pending submission to `Approved` or `Rejected`.
    ///
    /// Guard and mutation are one compare-and-swap UPDATE filtered on
    /// `status = 'pending'`; returns the number of rows matched. Zero means
    /// the submission was not pending (or does not exist) and no side
    /// effects were applied.
    pub async fn mark_reviewed<C: ConnectionTrait>(
        &self,
        db: &C,
        id: &str,
        status: SubmissionStatus,
        rejection_reason: Option<&str>,
    ) -> AppResult<u64> {
        let result = Submission::update_many()
            .set(submission::ActiveModel {
                status: Set(status),
                reviewed_at: Set(Some(chrono::Utc::now().into())),
                rejection_reason: Set(rejection_reason.map(ToString::to_string)),
                ..Default::default()
            })
            .filter(submission::Column::Id.eq(id))
            .filter(submission::Column::Status.eq(SubmissionStatus::Pending))
            .exec(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Record the fee split and optimistically mark an approved submission
    /// paid. Compare-and-swap on `status = 'approved'`; returns rows matched.
    pub async fn mark_paid<C: ConnectionTrait>(
        &self,
        db: &C,
        id: &str,
        platform_fee: Decimal,
        clipper_net: Decimal,
    ) -> AppResult<u64> {
        let result = Submission::update_many()
            .set(submission::ActiveModel {
                status: Set(SubmissionStatus::Paid),
                platform_fee: Set(Some(platform_fee)),
                clipper_net: Set(Some(clipper_net)),
                paid_at: Set(Some(chrono::Utc::now().into())),
                ..Default::default()
            })
            .filter(submission::Column::Id.eq(id))
            .filter(submission::Column::Status.eq(SubmissionStatus::Approved))
            .exec(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Flip an optimistically-paid submission to `PaymentFailed` after a
    /// failed transfer callback. Returns rows matched.
    pub async fn mark_payment_failed<C: ConnectionTrait>(&self, db: &C, id: &str) -> AppResult<u64> {
        let result = Submission::update_many()
            .set(submission::ActiveModel {
                status: Set(SubmissionStatus::PaymentFailed),
                paid_at: Set(None),
                ..Default::default()
            })
            .filter(submission::Column::Id.eq(id))
            .filter(submission::Column::Status.eq(SubmissionStatus::Paid))
            .exec(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Refresh the drifting view count. Never touches `payment_amount`.
    pub async fn update_views_current(&self, id: &str, views_current: i64) -> AppResult<()> {
        let submission = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::SubmissionNotFound(id.to_string()))?;

        let mut active: submission::ActiveModel = submission.into();
        active.views_current = Set(views_current);
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count all submissions by a clipper, on the caller's connection.
    pub async fn count_for_clipper<C: ConnectionTrait>(
        &self,
        db: &C,
        clipper_id: &str,
    ) -> AppResult<u64> {
        Submission::find()
            .filter(submission::Column::ClipperId.eq(clipper_id))
            .count(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count a clipper's approved submissions, including states only
    /// reachable after approval (paid, payment failed).
    pub async fn count_approved_for_clipper<C: ConnectionTrait>(
        &self,
        db: &C,
        clipper_id: &str,
    ) -> AppResult<u64> {
        Submission::find()
            .filter(submission::Column::ClipperId.eq(clipper_id))
            .filter(submission::Column::Status.is_in([
                SubmissionStatus::Approved,
                SubmissionStatus::Paid,
                SubmissionStatus::PaymentFailed,
            ]))
            .count(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_submission(id: &str, status: SubmissionStatus) -> submission::Model {
        submission::Model {
            id: id.to_string(),
            creator_id: "creator1".to_string(),
            clipper_id: "clipper1".to_string(),
            external_video_id: "vid1".to_string(),
            views_at_submit: 500,
            views_current: 500,
            payment_amount: Decimal::new(10, 0),
            platform_fee: None,
            clipper_net: None,
            status,
            rejection_reason: None,
            submitted_at: Utc::now().into(),
            reviewed_at: None,
            paid_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_creator_and_video_found() {
        let submission = create_test_submission("s1", SubmissionStatus::Pending);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[submission.clone()]])
                .into_connection(),
        );

        let repo = SubmissionRepository::new(db);
        let result = repo
            .find_by_creator_and_video("creator1", "vid1")
            .await
            .unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().id, "s1");
    }

    #[tokio::test]
    async fn test_mark_reviewed_reports_rows_matched() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                ])
                .into_connection(),
        );

        let repo = SubmissionRepository::new(db.clone());

        // First call wins the compare-and-swap
        let rows = repo
            .mark_reviewed(db.as_ref(), "s1", SubmissionStatus::Approved, None)
            .await
            .unwrap();
        assert_eq!(rows, 1);

        // Second call finds no pending row
        let rows = repo
            .mark_reviewed(db.as_ref(), "s1", SubmissionStatus::Approved, None)
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn test_mark_paid_requires_approved() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = SubmissionRepository::new(db.clone());
        let rows = repo
            .mark_paid(db.as_ref(), "s1", Decimal::new(50, 2), Decimal::new(950, 2))
            .await
            .unwrap();

        assert_eq!(rows, 0);
    }
}
