//! Payment transaction entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transfer status, driven by the payment gateway's webhook callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "camelCase")]
pub enum TransactionStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "succeeded")]
    Succeeded,
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// One payment attempt for a submission.
///
/// At most one non-failed transaction may exist per submission; a partial
/// unique index on `(submission_id) WHERE status <> 'failed'` backs the
/// service-level guard against double settlement.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub submission_id: String,

    /// Gross payment amount.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,

    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub platform_fee: Decimal,

    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub clipper_net: Decimal,

    /// Transfer ID issued by the payment gateway; webhook callbacks are
    /// matched on this.
    #[sea_orm(unique)]
    pub external_transfer_id: String,

    pub status: TransactionStatus,

    #[sea_orm(nullable)]
    pub failure_reason: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub completed_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::submission::Entity",
        from = "Column::SubmissionId",
        to = "super::submission::Column::Id",
        on_delete = "Cascade"
    )]
    Submission,
}

impl Related<super::submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
