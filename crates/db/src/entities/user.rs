//! User entity.
//!
//! Local principal record for an identity managed by the external auth
//! provider. The workflow trusts `role` and ownership of profile rows for
//! authorization checks.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Marketplace role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "camelCase")]
pub enum UserRole {
    /// Reviews and pays for submitted clips.
    #[sea_orm(string_value = "creator")]
    Creator,
    /// Submits clips to creators for payment.
    #[sea_orm(string_value = "clipper")]
    Clipper,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Principal ID at the external identity provider.
    #[sea_orm(unique)]
    pub external_auth_id: String,

    #[sea_orm(unique)]
    pub email: String,

    pub display_name: String,

    pub role: UserRole,

    /// Bearer token resolved by the auth middleware.
    #[sea_orm(unique, nullable)]
    pub api_token: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::creator_profile::Entity")]
    CreatorProfile,

    #[sea_orm(has_one = "super::clipper_profile::Entity")]
    ClipperProfile,

    #[sea_orm(has_many = "super::notification::Entity")]
    Notification,
}

impl Related<super::creator_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatorProfile.def()
    }
}

impl Related<super::clipper_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClipperProfile.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
