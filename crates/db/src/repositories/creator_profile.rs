//! Creator profile repository.

use std::sync::Arc;

use crate::entities::{creator_profile, CreatorProfile};
use clipcommerce_common::{AppError, AppResult};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

/// Creator profile repository for database operations.
#[derive(Clone)]
pub struct CreatorProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl CreatorProfileRepository {
    /// Create a new creator profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a creator profile by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<creator_profile::Model>> {
        CreatorProfile::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a creator profile by owning user.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<creator_profile::Model>> {
        CreatorProfile::find()
            .filter(creator_profile::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new creator profile.
    pub async fn create(
        &self,
        model: creator_profile::ActiveModel,
    ) -> AppResult<creator_profile::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a creator's payment rate.
    pub async fn update_rate(
        &self,
        id: &str,
        rate_amount: Decimal,
        rate_views: i32,
    ) -> AppResult<creator_profile::Model> {
        let profile = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("creator profile {id}")))?;

        let mut active: creator_profile::ActiveModel = profile.into();
        active.rate_amount = Set(rate_amount);
        active.rate_views = Set(rate_views);
        active.updated_at = Set(chrono::Utc::now().into());
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
