use sea_orm_migration::prelude::*;

/// Base titles (票据目录, 与期次无关)
#[derive(DeriveIden)]
enum BaseTitles {
    Table,
    Id,
    Name,
    Dozens,
    BarCode,
    QrCode,
    Chances,
    CreatedAt,
    UpdatedAt,
}

/// Editions (销售期次)
#[derive(DeriveIden)]
enum Editions {
    Table,
    Id,
    Name,
    DrawDate,
    Order,
    Status,
    ImageKey,
    ImageUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BuyedTitles {
    Table,
    Id,
    UserId,
    PaymentForm,
    PaymentId,
    TotalValue,
    CreatedAt,
    UpdatedAt,
}

/// Titles (可售票据)
#[derive(DeriveIden)]
enum Titles {
    Table,
    Id,
    EditionId,
    Name,
    Dozens,
    BarCode,
    QrCode,
    Chances,
    Value,
    UserId,
    BuyedTitleId,
    PaymentId,
    Deleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DrawItems {
    Table,
    Id,
    EditionId,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// titles.edition_id 不加外键: 删除期次时只删除已售出的票据,
/// 未售出的票据保留 (edition_id 指向已删除的期次)
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BaseTitles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BaseTitles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(BaseTitles::Name).string_len(64).not_null())
                    .col(ColumnDef::new(BaseTitles::Dozens).json().not_null())
                    .col(ColumnDef::new(BaseTitles::BarCode).string().not_null())
                    .col(ColumnDef::new(BaseTitles::QrCode).string().not_null())
                    .col(
                        ColumnDef::new(BaseTitles::Chances)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(BaseTitles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(BaseTitles::UpdatedAt)
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
                    .name("idx_base_titles_name_unique")
                    .table(BaseTitles::Table)
                    .col(BaseTitles::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Editions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Editions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Editions::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Editions::DrawDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Editions::Order).integer().null())
                    .col(
                        ColumnDef::new(Editions::Status)
                            .string_len(16)
                            .not_null()
                            .default("OPEN"),
                    )
                    .col(ColumnDef::new(Editions::ImageKey).string().null())
                    .col(ColumnDef::new(Editions::ImageUrl).string().null())
                    .col(
                        ColumnDef::new(Editions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(Editions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .to_owned(),
            )
            .await?;

        // 期次名称唯一
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_editions_name_unique")
                    .table(Editions::Table)
                    .col(Editions::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BuyedTitles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BuyedTitles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BuyedTitles::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(BuyedTitles::PaymentForm)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(BuyedTitles::PaymentId).string().null())
                    .col(
                        ColumnDef::new(BuyedTitles::TotalValue)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BuyedTitles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(BuyedTitles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Titles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Titles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Titles::EditionId).uuid().not_null())
                    .col(ColumnDef::new(Titles::Name).string_len(64).not_null())
                    .col(ColumnDef::new(Titles::Dozens).json().not_null())
                    .col(ColumnDef::new(Titles::BarCode).string().not_null())
                    .col(ColumnDef::new(Titles::QrCode).string().not_null())
                    .col(
                        ColumnDef::new(Titles::Chances)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Titles::Value)
                            .big_integer()
                            .not_null()
                            .default(5),
                    )
                    .col(ColumnDef::new(Titles::UserId).uuid().null())
                    .col(ColumnDef::new(Titles::BuyedTitleId).uuid().null())
                    .col(ColumnDef::new(Titles::PaymentId).string().null())
                    .col(
                        ColumnDef::new(Titles::Deleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Titles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(Titles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .to_owned(),
            )
            .await?;

        // 对账时按名称查找已存在票据
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_titles_name")
                    .table(Titles::Table)
                    .col(Titles::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_titles_edition_id")
                    .table(Titles::Table)
                    .col(Titles::EditionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DrawItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DrawItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DrawItems::EditionId).uuid().not_null())
                    .col(ColumnDef::new(DrawItems::Name).string().not_null())
                    .col(ColumnDef::new(DrawItems::Description).text().null())
                    .col(
                        ColumnDef::new(DrawItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(DrawItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_draw_items_edition_id")
                            .from(DrawItems::Table, DrawItems::EditionId)
                            .to(Editions::Table, Editions::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DrawItems::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Titles::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BuyedTitles::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Editions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BaseTitles::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
