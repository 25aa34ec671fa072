//! Migration: Create vendors table, one row per selling user.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vendors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vendors::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Vendors::UserId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Vendors::BusinessName).string_len(255).not_null())
                    .col(ColumnDef::new(Vendors::BusinessType).string_len(100).null())
                    .col(ColumnDef::new(Vendors::Description).text().null())
                    .col(ColumnDef::new(Vendors::Logo).string_len(500).null())
                    .col(ColumnDef::new(Vendors::Website).string_len(500).null())
                    .col(ColumnDef::new(Vendors::Address).json_binary().null())
                    .col(
                        ColumnDef::new(Vendors::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Vendors::VerifiedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Vendors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Vendors::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vendors_user")
                            .from(Vendors::Table, Vendors::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vendors_status")
                    .table(Vendors::Table)
                    .col(Vendors::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vendors::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Vendors {
    Table,
    Id,
    UserId,
    BusinessName,
    BusinessType,
    Description,
    Logo,
    Website,
    Address,
    Status,
    VerifiedAt,
    CreatedAt,
    UpdatedAt,
}
