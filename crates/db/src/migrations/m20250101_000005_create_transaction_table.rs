//! Create transaction table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transaction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transaction::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Transaction::SubmissionId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transaction::Amount)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transaction::PlatformFee)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transaction::ClipperNet)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transaction::ExternalTransferId)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Transaction::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transaction::FailureReason).text())
                    .col(
                        ColumnDef::new(Transaction::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Transaction::CompletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transaction_submission")
                            .from(Transaction::Table, Transaction::SubmissionId)
                            .to(Submission::Table, Submission::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one live (non-failed) transaction per submission. Partial
        // indexes are not expressible through the schema builder, so this is
        // raw SQL.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX idx_transaction_submission_live \
                 ON \"transaction\" (submission_id) WHERE status <> 'failed'",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transaction::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Transaction {
    Table,
    Id,
    SubmissionId,
    Amount,
    PlatformFee,
    ClipperNet,
    ExternalTransferId,
    Status,
    FailureReason,
    CreatedAt,
    CompletedAt,
}

#[derive(Iden)]
enum Submission {
    Table,
    Id,
}
