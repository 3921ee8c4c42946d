use sea_orm_migration::prelude::*;

/// Credit histories (用户充值记录)
#[derive(DeriveIden)]
enum CreditHistories {
    Table,
    Id,
    UserId,
    Name,
    Description,
    Value,
    Status,
    DepositType,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CreditHistories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreditHistories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CreditHistories::UserId).uuid().null())
                    .col(ColumnDef::new(CreditHistories::Name).string().null())
                    .col(
                        ColumnDef::new(CreditHistories::Description)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditHistories::Value)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(CreditHistories::Status)
                            .string_len(16)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(CreditHistories::DepositType)
                            .string_len(16)
                            .not_null()
                            .default("PIX"),
                    )
                    .col(
                        ColumnDef::new(CreditHistories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(CreditHistories::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_credit_histories_user_id")
                    .table(CreditHistories::Table)
                    .col(CreditHistories::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(CreditHistories::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}
