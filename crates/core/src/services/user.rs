//! User registration and token authentication.

use clipcommerce_common::{AppError, AppResult, IdGenerator};
use clipcommerce_db::entities::{user, UserRole};
use clipcommerce_db::repositories::UserRepository;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for registering (or re-registering) a user.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    /// Principal ID at the external identity provider.
    #[validate(length(min = 1, message = "externalAuthId is required"))]
    pub external_auth_id: String,
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "displayName must be 1-100 characters"))]
    pub display_name: String,
    pub role: UserRole,
}

/// User account service.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl UserService {
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Resolve a bearer token to a user.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_api_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Register a user for the external identity, or rotate the token of an
    /// existing one.
    ///
    /// The role is fixed at first registration; re-registering with a
    /// different role is a conflict rather than a silent role change.
    pub async fn register(&self, input: RegisterInput) -> AppResult<(user::Model, String)> {
        input.validate()?;

        let token = self.id_gen.generate_token();

        if let Some(existing) = self
            .user_repo
            .find_by_external_auth_id(&input.external_auth_id)
            .await?
        {
            if existing.role != input.role {
                return Err(AppError::Conflict(
                    "account is already registered with a different role".to_string(),
                ));
            }
            self.user_repo
                .set_api_token(&existing.id, Some(&token))
                .await?;
            let user = self
                .user_repo
                .find_by_id(&existing.id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("user {}", existing.id)))?;
            return Ok((user, token));
        }

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            external_auth_id: Set(input.external_auth_id),
            email: Set(input.email),
            display_name: Set(input.display_name),
            role: Set(input.role),
            api_token: Set(Some(token.clone())),
            created_at: Set(chrono::Utc::now().into()),
        };

        let user = self.user_repo.create(model).await?;
        Ok((user, token))
    }
}
