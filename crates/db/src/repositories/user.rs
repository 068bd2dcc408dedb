//! User repository.

use std::sync::Arc;

use crate::entities::{user, User};
use clipcommerce_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by API token.
    pub async fn find_by_api_token(&self, token: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::ApiToken.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by their ID at the external identity provider.
    pub async fn find_by_external_auth_id(
        &self,
        external_auth_id: &str,
    ) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::ExternalAuthId.eq(external_auth_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Rotate a user's API token.
    pub async fn set_api_token(&self, id: &str, token: Option<&str>) -> AppResult<()> {
        let user = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;

        let mut active: user::ActiveModel = user.into();
        active.api_token = Set(token.map(ToString::to_string));
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user::UserRole;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_user(id: &str, role: UserRole) -> user::Model {
        user::Model {
            id: id.to_string(),
            external_auth_id: format!("auth_{id}"),
            email: format!("{id}@example.com"),
            display_name: id.to_string(),
            role,
            api_token: Some(format!("token_{id}")),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_api_token_found() {
        let user = create_test_user("u1", UserRole::Creator);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.find_by_api_token("token_u1").await.unwrap();

        assert!(result.is_some());
        let found = result.unwrap();
        assert_eq!(found.id, "u1");
        assert_eq!(found.role, UserRole::Creator);
    }

    #[tokio::test]
    async fn test_find_by_api_token_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.find_by_api_token("nope").await.unwrap();

        assert!(result.is_none());
    }
}
