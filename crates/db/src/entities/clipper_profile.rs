//! Clipper profile entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A clipper's profile and aggregate statistics.
///
/// `total_submissions`, `total_approved` and `approval_rate` are fully
/// recomputed (not incrementally patched) inside the same database
/// transaction as the status write that changes them. `total_earned` only
/// grows, and only when a transfer is confirmed by the payment webhook.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clipper_profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub user_id: String,

    /// Video-platform channel used for ownership verification.
    #[sea_orm(nullable)]
    pub channel_id: Option<String>,

    /// External payout destination (payment-processor account ID).
    #[sea_orm(nullable)]
    pub payout_account_id: Option<String>,

    /// Lifetime confirmed earnings, in major currency units.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))", default_value = "0")]
    pub total_earned: Decimal,

    #[sea_orm(default_value = 0)]
    pub total_submissions: i32,

    #[sea_orm(default_value = 0)]
    pub total_approved: i32,

    /// Percentage in [0, 100]; 0 when no submissions exist.
    #[sea_orm(column_type = "Decimal(Some((5, 2)))", default_value = "0")]
    pub approval_rate: Decimal,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(has_many = "super::submission::Entity")]
    Submission,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
