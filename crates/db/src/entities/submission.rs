//! Submission entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle states of a submission.
///
/// Legal transitions: `Pending` → `Approved` | `Rejected`;
/// `Approved` → `Paid`; `Paid` → `PaymentFailed` (webhook reversal of an
/// optimistic settlement). Everything else is rejected by the transition
/// function in the core crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "camelCase")]
pub enum SubmissionStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "payment_failed")]
    PaymentFailed,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub creator_id: String,

    pub clipper_id: String,

    /// Video ID at the external video platform. Unique per creator.
    pub external_video_id: String,

    /// View count when the clip was submitted.
    pub views_at_submit: i64,

    /// Latest known view count; display-only drift tracking.
    pub views_current: i64,

    /// Gross payment, frozen at creation from `views_at_submit` and the
    /// creator's rate. Never recomputed from `views_current`.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub payment_amount: Decimal,

    /// Platform fee, set at settlement.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))", nullable)]
    pub platform_fee: Option<Decimal>,

    /// Clipper payout, set at settlement. `platform_fee + clipper_net`
    /// always equals `payment_amount` when both are set.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))", nullable)]
    pub clipper_net: Option<Decimal>,

    pub status: SubmissionStatus,

    #[sea_orm(nullable)]
    pub rejection_reason: Option<String>,

    pub submitted_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub reviewed_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub paid_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::creator_profile::Entity",
        from = "Column::CreatorId",
        to = "super::creator_profile::Column::Id",
        on_delete = "Cascade"
    )]
    Creator,

    #[sea_orm(
        belongs_to = "super::clipper_profile::Entity",
        from = "Column::ClipperId",
        to = "super::clipper_profile::Column::Id",
        on_delete = "Cascade"
    )]
    Clipper,

    #[sea_orm(has_many = "super::transaction::Entity")]
    Transaction,
}

impl Related<super::creator_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::clipper_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clipper.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
