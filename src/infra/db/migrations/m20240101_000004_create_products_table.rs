//! Migration: Create products table with catalog indexes and full-text search.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_vendors_table::Vendors;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Products::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Products::NumericId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Products::VendorId).uuid().null())
                    .col(ColumnDef::new(Products::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Products::Description).text().null())
                    .col(
                        ColumnDef::new(Products::Price)
                            .decimal_len(10, 2)
                            .not_null()
                            .check(Expr::col(Products::Price).gt(0)),
                    )
                    .col(ColumnDef::new(Products::ComparePrice).decimal_len(10, 2).null())
                    .col(ColumnDef::new(Products::Sku).string_len(100).null())
                    .col(ColumnDef::new(Products::Category).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Products::Tags)
                            .array(ColumnType::Text)
                            .not_null()
                            .default(Expr::cust("'{}'")),
                    )
                    .col(
                        ColumnDef::new(Products::Images)
                            .array(ColumnType::Text)
                            .not_null()
                            .default(Expr::cust("'{}'")),
                    )
                    .col(
                        ColumnDef::new(Products::Stock)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Products::Stock).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Products::Status)
                            .string_len(20)
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(Products::Featured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Products::Weight).decimal_len(10, 2).null())
                    .col(ColumnDef::new(Products::Dimensions).json_binary().null())
                    .col(ColumnDef::new(Products::Seo).json_binary().null())
                    .col(
                        ColumnDef::new(Products::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Products::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_vendor")
                            .from(Products::Table, Products::VendorId)
                            .to(Vendors::Table, Vendors::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_products_category", Products::Category),
            ("idx_products_status", Products::Status),
            ("idx_products_vendor_id", Products::VendorId),
            ("idx_products_featured", Products::Featured),
            ("idx_products_created_at", Products::CreatedAt),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Products::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        let db = manager.get_connection();
        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_products_name_search ON products \
             USING GIN (to_tsvector('english', name))",
        )
        .await?;
        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_products_description_search ON products \
             USING GIN (to_tsvector('english', coalesce(description, '')))",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
pub(super) enum Products {
    Table,
    Id,
    NumericId,
    VendorId,
    Name,
    Description,
    Price,
    ComparePrice,
    Sku,
    Category,
    Tags,
    Images,
    Stock,
    Status,
    Featured,
    Weight,
    Dimensions,
    Seo,
    CreatedAt,
    UpdatedAt,
}
