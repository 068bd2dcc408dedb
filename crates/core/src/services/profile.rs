//! Creator and clipper profile management.

use clipcommerce_common::{AppError, AppResult, IdGenerator};
use clipcommerce_db::entities::{clipper_profile, creator_profile, user, UserRole};
use clipcommerce_db::repositories::{ClipperProfileRepository, CreatorProfileRepository};
use rust_decimal::Decimal;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for setting up a creator profile or changing its rate.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetupCreatorInput {
    /// Payment per `rate_views` views, in major currency units.
    pub rate_amount: Decimal,
    /// View-count milestone the rate is quoted against.
    #[validate(range(min = 1, message = "rateViews must be at least 1"))]
    pub rate_views: i32,
}

/// Input for setting up a clipper profile.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetupClipperInput {
    /// Video-platform channel the clipper uploads to; submissions are
    /// verified against it.
    #[validate(length(min = 1, max = 128, message = "channelId must be 1-128 characters"))]
    pub channel_id: String,
}

/// Profile management service.
#[derive(Clone)]
pub struct ProfileService {
    creator_repo: CreatorProfileRepository,
    clipper_repo: ClipperProfileRepository,
    id_gen: IdGenerator,
}

impl ProfileService {
    #[must_use]
    pub const fn new(
        creator_repo: CreatorProfileRepository,
        clipper_repo: ClipperProfileRepository,
    ) -> Self {
        Self {
            creator_repo,
            clipper_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create the actor's creator profile with an initial rate.
    pub async fn setup_creator(
        &self,
        actor: &user::Model,
        input: SetupCreatorInput,
    ) -> AppResult<creator_profile::Model> {
        input.validate()?;
        Self::require_positive_rate(input.rate_amount)?;
        Self::require_role(actor, UserRole::Creator)?;

        if self.creator_repo.find_by_user_id(&actor.id).await?.is_some() {
            return Err(AppError::Conflict(
                "creator profile already exists".to_string(),
            ));
        }

        let now = chrono::Utc::now();
        let model = creator_profile::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(actor.id.clone()),
            rate_amount: Set(input.rate_amount),
            rate_views: Set(input.rate_views),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        self.creator_repo.create(model).await
    }

    /// Change the actor's payment rate.
    ///
    /// Only affects future submissions; the payment amount of existing
    /// submissions stays frozen at the rate in effect when they were made.
    pub async fn update_rate(
        &self,
        actor: &user::Model,
        input: SetupCreatorInput,
    ) -> AppResult<creator_profile::Model> {
        input.validate()?;
        Self::require_positive_rate(input.rate_amount)?;

        let profile = self
            .creator_repo
            .find_by_user_id(&actor.id)
            .await?
            .ok_or_else(|| AppError::NotFound("creator profile not set up".to_string()))?;

        self.creator_repo
            .update_rate(&profile.id, input.rate_amount, input.rate_views)
            .await
    }

    /// Fetch a creator profile by ID (public; clippers browse these).
    pub async fn get_creator(&self, creator_id: &str) -> AppResult<creator_profile::Model> {
        self.creator_repo
            .find_by_id(creator_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("creator {creator_id} not found")))
    }

    /// Create the actor's clipper profile with a linked channel.
    pub async fn setup_clipper(
        &self,
        actor: &user::Model,
        input: SetupClipperInput,
    ) -> AppResult<clipper_profile::Model> {
        input.validate()?;
        Self::require_role(actor, UserRole::Clipper)?;

        if self.clipper_repo.find_by_user_id(&actor.id).await?.is_some() {
            return Err(AppError::Conflict(
                "clipper profile already exists".to_string(),
            ));
        }

        let now = chrono::Utc::now();
        let model = clipper_profile::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(actor.id.clone()),
            channel_id: Set(Some(input.channel_id)),
            payout_account_id: Set(None),
            total_earned: Set(Decimal::ZERO),
            total_submissions: Set(0),
            total_approved: Set(0),
            approval_rate: Set(Decimal::ZERO),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        self.clipper_repo.create(model).await
    }

    /// Connect the actor's payout destination at the payment processor.
    pub async fn set_payout_account(
        &self,
        actor: &user::Model,
        payout_account_id: &str,
    ) -> AppResult<clipper_profile::Model> {
        let payout_account_id = payout_account_id.trim();
        if payout_account_id.is_empty() {
            return Err(AppError::Validation(
                "payoutAccountId is required".to_string(),
            ));
        }

        let profile = self.require_clipper_profile(actor).await?;
        self.clipper_repo
            .set_payout_account(&profile.id, payout_account_id)
            .await
    }

    /// Fetch the actor's own clipper profile, statistics included.
    pub async fn get_clipper(&self, actor: &user::Model) -> AppResult<clipper_profile::Model> {
        self.require_clipper_profile(actor).await
    }

    async fn require_clipper_profile(
        &self,
        actor: &user::Model,
    ) -> AppResult<clipper_profile::Model> {
        self.clipper_repo
            .find_by_user_id(&actor.id)
            .await?
            .ok_or_else(|| AppError::NotFound("clipper profile not set up".to_string()))
    }

    fn require_role(actor: &user::Model, role: UserRole) -> AppResult<()> {
        if actor.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "this operation requires the {} role",
                match role {
                    UserRole::Creator => "creator",
                    UserRole::Clipper => "clipper",
                }
            )))
        }
    }

    fn require_positive_rate(rate_amount: Decimal) -> AppResult<()> {
        if rate_amount > Decimal::ZERO {
            Ok(())
        } else {
            Err(AppError::Validation(
                "rateAmount must be a positive amount".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creator_input_rejects_zero_views() {
        let input = SetupCreatorInput {
            rate_amount: Decimal::new(20, 0),
            rate_views: 0,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_positive_rate_guard() {
        assert!(ProfileService::require_positive_rate(Decimal::new(1, 2)).is_ok());
        assert!(ProfileService::require_positive_rate(Decimal::ZERO).is_err());
        assert!(ProfileService::require_positive_rate(Decimal::new(-5, 0)).is_err());
    }
}
