//! Migration to create the properties table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Properties::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Properties::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Properties::Address).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Properties::PropertyType)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Properties::Description).text().not_null())
                    .col(
                        ColumnDef::new(Properties::NumberOfUnits)
                            .integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Properties {
    Table,
    Id,
    Name,
    Address,
    PropertyType,
    Description,
    NumberOfUnits,
}
