//! Payment transaction repository.

use std::sync::Arc;

use crate::entities::{transaction, transaction::TransactionStatus, Transaction};
use clipcommerce_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};

/// Transaction repository for database operations.
#[derive(Clone)]
pub struct TransactionRepository {
    db: Arc<DatabaseConnection>,
}

impl TransactionRepository {
    /// Create a new transaction repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a transaction by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<transaction::Model>> {
        Transaction::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a transaction by the gateway's transfer ID.
    pub async fn find_by_external_transfer_id(
        &self,
        external_transfer_id: &str,
    ) -> AppResult<Option<transaction::Model>> {
        Transaction::find()
            .filter(transaction::Column::ExternalTransferId.eq(external_transfer_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the live (non-failed) transaction for a submission, if any.
    ///
    /// The double-settlement guard: at most one such row may exist, backed
    /// by a partial unique index.
    pub async fn find_live_by_submission(
        &self,
        submission_id: &str,
    ) -> AppResult<Option<transaction::Model>> {
        Transaction::find()
            .filter(transaction::Column::SubmissionId.eq(submission_id))
            .filter(transaction::Column::Status.ne(TransactionStatus::Failed))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a transaction row on the caller's connection.
    ///
    /// A unique-violation from the partial index means another settlement
    /// won the race; surfaced as `Conflict`.
    pub async fn create<C: ConnectionTrait>(
        &self,
        db: &C,
        model: transaction::ActiveModel,
    ) -> AppResult<transaction::Model> {
        model.insert(db).await.map_err(|e| {
            let msg = e.to_string();
            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                AppError::Conflict("a live transaction already exists for this submission".into())
            } else {
                AppError::Database(msg)
            }
        })
    }

    /// Confirm a pending transaction. Compare-and-swap on
    /// `status = 'pending'`; returns rows matched, so duplicate webhook
    /// deliveries observe zero and apply nothing.
    pub async fn mark_succeeded<C: ConnectionTrait>(&self, db: &C, id: &str) -> AppResult<u64> {
        let result = Transaction::update_many()
            .set(transaction::ActiveModel {
                status: Set(TransactionStatus::Succeeded),
                completed_at: Set(Some(chrono::Utc::now().into())),
                ..Default::default()
            })
            .filter(transaction::Column::Id.eq(id))
            .filter(transaction::Column::Status.eq(TransactionStatus::Pending))
            .exec(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Fail a pending transaction with a reason. Compare-and-swap on
    /// `status = 'pending'`; returns rows matched.
    pub async fn mark_failed<C: ConnectionTrait>(
        &self,
        db: &C,
        id: &str,
        failure_reason: &str,
    ) -> AppResult<u64> {
        let result = Transaction::update_many()
            .set(transaction::ActiveModel {
                status: Set(TransactionStatus::Failed),
                failure_reason: Set(Some(failure_reason.to_string())),
                completed_at: Set(Some(chrono::Utc::now().into())),
                ..Default::default()
            })
            .filter(transaction::Column::Id.eq(id))
            .filter(transaction::Column::Status.eq(TransactionStatus::Pending))
            .exec(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}
