//! Create submission table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Submission::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submission::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Submission::CreatorId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submission::ClipperId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submission::ExternalVideoId)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submission::ViewsAtSubmit)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(Submission::ViewsAtSubmit).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Submission::ViewsCurrent)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(Submission::ViewsCurrent).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Submission::PaymentAmount)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submission::PlatformFee).decimal_len(16, 4))
                    .col(ColumnDef::new(Submission::ClipperNet).decimal_len(16, 4))
                    .col(
                        ColumnDef::new(Submission::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submission::RejectionReason).text())
                    .col(
                        ColumnDef::new(Submission::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Submission::ReviewedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Submission::PaidAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_submission_creator")
                            .from(Submission::Table, Submission::CreatorId)
                            .to(CreatorProfile::Table, CreatorProfile::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_submission_clipper")
                            .from(Submission::Table, Submission::ClipperId)
                            .to(ClipperProfile::Table, ClipperProfile::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique: one submission per (creator, video) pair
        manager
            .create_index(
                Index::create()
                    .name("idx_submission_creator_video")
                    .table(Submission::Table)
                    .col(Submission::CreatorId)
                    .col(Submission::ExternalVideoId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: clipper_id (stats recomputation, listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_submission_clipper_id")
                    .table(Submission::Table)
                    .col(Submission::ClipperId)
                    .to_owned(),
            )
            .await?;

        // Index: (creator_id, status) (review inbox)
        manager
            .create_index(
                Index::create()
                    .name("idx_submission_creator_status")
                    .table(Submission::Table)
                    .col(Submission::CreatorId)
                    .col(Submission::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Submission::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Submission {
    Table,
    Id,
    CreatorId,
    ClipperId,
    ExternalVideoId,
    ViewsAtSubmit,
    ViewsCurrent,
    PaymentAmount,
    PlatformFee,
    ClipperNet,
    Status,
    RejectionReason,
    SubmittedAt,
    ReviewedAt,
    PaidAt,
}

#[derive(Iden)]
enum CreatorProfile {
    Table,
    Id,
}

#[derive(Iden)]
enum ClipperProfile {
    Table,
    Id,
}
