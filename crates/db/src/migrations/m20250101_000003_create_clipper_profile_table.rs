//! Create clipper profile table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClipperProfile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClipperProfile::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClipperProfile::UserId)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ClipperProfile::ChannelId).string_len(128))
                    .col(ColumnDef::new(ClipperProfile::PayoutAccountId).string_len(128))
                    .col(
                        ColumnDef::new(ClipperProfile::TotalEarned)
                            .decimal_len(16, 4)
                            .not_null()
                            .default(0)
                            .check(Expr::col(ClipperProfile::TotalEarned).gte(0)),
                    )
                    .col(
                        ColumnDef::new(ClipperProfile::TotalSubmissions)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ClipperProfile::TotalApproved)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ClipperProfile::ApprovalRate)
                            .decimal_len(5, 2)
                            .not_null()
                            .default(0)
                            .check(
                                Expr::col(ClipperProfile::ApprovalRate)
                                    .gte(0)
                                    .and(Expr::col(ClipperProfile::ApprovalRate).lte(100)),
                            ),
                    )
                    .col(
                        ColumnDef::new(ClipperProfile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ClipperProfile::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clipper_profile_user")
                            .from(ClipperProfile::Table, ClipperProfile::UserId)
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
            .drop_table(Table::drop().table(ClipperProfile::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ClipperProfile {
    Table,
    Id,
    UserId,
    ChannelId,
    PayoutAccountId,
    TotalEarned,
    TotalSubmissions,
    TotalApproved,
    ApprovalRate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
