//! Creator profile entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A creator's payment rate: pay `rate_amount` per `rate_views` views.
/// Both values are strictly positive (enforced at the service layer and by
/// CHECK constraints); the rate is read-only at submission-creation time.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "creator_profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub user_id: String,

    /// Payment per `rate_views` views, in major currency units.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub rate_amount: Decimal,

    /// View-count milestone the rate is quoted against.
    pub rate_views: i32,

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
