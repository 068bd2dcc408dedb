//! Notification entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification types emitted by the submission workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum NotificationType {
    /// A clipper submitted a clip (sent to the creator).
    #[sea_orm(string_value = "newSubmission")]
    NewSubmission,
    /// A creator approved a submission (sent to the clipper).
    #[sea_orm(string_value = "submissionApproved")]
    SubmissionApproved,
    /// A creator rejected a submission (sent to the clipper).
    #[sea_orm(string_value = "submissionRejected")]
    SubmissionRejected,
    /// A transfer was initiated (sent to the clipper).
    #[sea_orm(string_value = "paymentSent")]
    PaymentSent,
    /// A transfer failed (sent to the clipper).
    #[sea_orm(string_value = "paymentFailed")]
    PaymentFailed,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The user receiving the notification.
    pub user_id: String,

    pub notification_type: NotificationType,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub message: String,

    /// Relative URL to act on the notification.
    #[sea_orm(nullable)]
    pub action_url: Option<String>,

    /// Related submission, when applicable.
    #[sea_orm(nullable)]
    pub submission_id: Option<String>,

    #[sea_orm(default_value = false)]
    pub is_read: bool,

    pub created_at: DateTimeWithTimeZone,
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

    #[sea_orm(
        belongs_to = "super::submission::Entity",
        from = "Column::SubmissionId",
        to = "super::submission::Column::Id",
        on_delete = "Cascade"
    )]
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
