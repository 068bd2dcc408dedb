//! Clipper profile repository.

use std::sync::Arc;

use crate::entities::{clipper_profile, ClipperProfile};
use clipcommerce_common::{AppError, AppResult};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};

/// Clipper profile repository for database operations.
#[derive(Clone)]
pub struct ClipperProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl ClipperProfileRepository {
    /// Create a new clipper profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a clipper profile by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<clipper_profile::Model>> {
        ClipperProfile::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a clipper profile by owning user.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<clipper_profile::Model>> {
        ClipperProfile::find()
            .filter(clipper_profile::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new clipper profile.
    pub async fn create(
        &self,
        model: clipper_profile::ActiveModel,
    ) -> AppResult<clipper_profile::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Set the clipper's payout destination.
    pub async fn set_payout_account(
        &self,
        id: &str,
        payout_account_id: &str,
    ) -> AppResult<clipper_profile::Model> {
        let profile = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("clipper profile {id}")))?;

        let mut active: clipper_profile::ActiveModel = profile.into();
        active.payout_account_id = Set(Some(payout_account_id.to_string()));
        active.updated_at = Set(chrono::Utc::now().into());
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Set the clipper's video-platform channel.
    pub async fn set_channel(&self, id: &str, channel_id: &str) -> AppResult<clipper_profile::Model> {
        let profile = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("clipper profile {id}")))?;

        let mut active: clipper_profile::ActiveModel = profile.into();
        active.channel_id = Set(Some(channel_id.to_string()));
        active.updated_at = Set(chrono::Utc::now().into());
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Write recomputed aggregate statistics.
    ///
    /// Runs on the caller's connection so the stats write shares a database
    /// transaction with the status change that triggered the recompute.
    pub async fn write_stats<C: ConnectionTrait>(
        &self,
        db: &C,
        id: &str,
        total_submissions: i32,
        total_approved: i32,
        approval_rate: Decimal,
    ) -> AppResult<()> {
        ClipperProfile::update_many()
            .col_expr(
                clipper_profile::Column::TotalSubmissions,
                Expr::value(total_submissions),
            )
            .col_expr(
                clipper_profile::Column::TotalApproved,
                Expr::value(total_approved),
            )
            .col_expr(
                clipper_profile::Column::ApprovalRate,
                Expr::value(approval_rate),
            )
            .col_expr(
                clipper_profile::Column::UpdatedAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(clipper_profile::Column::Id.eq(id))
            .exec(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Add a confirmed payout to the clipper's lifetime earnings.
    ///
    /// Atomic in-database addition; callers serialize through the
    /// transaction-row status change, so this never double-applies.
    pub async fn add_earned<C: ConnectionTrait>(
        &self,
        db: &C,
        id: &str,
        amount: Decimal,
    ) -> AppResult<()> {
        ClipperProfile::update_many()
            .col_expr(
                clipper_profile::Column::TotalEarned,
                Expr::col(clipper_profile::Column::TotalEarned).add(amount),
            )
            .col_expr(
                clipper_profile::Column::UpdatedAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(clipper_profile::Column::Id.eq(id))
            .exec(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
