//! Create creator profile table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CreatorProfile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreatorProfile::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CreatorProfile::UserId)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CreatorProfile::RateAmount)
                            .decimal_len(16, 4)
                            .not_null()
                            .check(Expr::col(CreatorProfile::RateAmount).gt(0)),
                    )
                    .col(
                        ColumnDef::new(CreatorProfile::RateViews)
                            .integer()
                            .not_null()
                            .check(Expr::col(CreatorProfile::RateViews).gt(0)),
                    )
                    .col(
                        ColumnDef::new(CreatorProfile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CreatorProfile::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_creator_profile_user")
                            .from(CreatorProfile::Table, CreatorProfile::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CreatorProfile::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CreatorProfile {
    Table,
    Id,
    UserId,
    RateAmount,
    RateViews,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
