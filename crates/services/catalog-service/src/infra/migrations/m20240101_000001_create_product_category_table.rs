//! Migration: Create the self-referencing product category table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductCategory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductCategory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // NULL = root category
                    .col(ColumnDef::new(ProductCategory::ParentId).integer().null())
                    .col(ColumnDef::new(ProductCategory::Name).string().not_null())
                    .col(
                        ColumnDef::new(ProductCategory::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ProductCategory::ViewOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProductCategory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Children lookups walk the tree one level at a time
        manager
            .create_index(
                Index::create()
                    .name("idx_product_category_parent_id")
                    .table(ProductCategory::Table)
                    .col(ProductCategory::ParentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_category_sibling_order")
                    .table(ProductCategory::Table)
                    .col(ProductCategory::ParentId)
                    .col(ProductCategory::ViewOrder)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductCategory::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ProductCategory {
    Table,
    Id,
    ParentId,
    Name,
    IsActive,
    ViewOrder,
    CreatedAt,
}
