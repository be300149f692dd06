//! Migration to create the employees table.
//!
//! Soft-deleted rows stay in the table with `is_active = false`, so both
//! listing queries are served from the same table ordered by `full_name`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Employees::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Employees::FullName).text().not_null())
                    .col(ColumnDef::new(Employees::Age).integer().not_null())
                    .col(ColumnDef::new(Employees::Area).text().not_null())
                    .col(ColumnDef::new(Employees::Seniority).integer().not_null())
                    .col(ColumnDef::new(Employees::Phone).text().not_null())
                    .col(
                        ColumnDef::new(Employees::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Employees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employees_full_name")
                    .table(Employees::Table)
                    .col(Employees::FullName)
                    .to_owned(),
            )
            .await?;

        // Serves the active-only listing
        manager
            .create_index(
                Index::create()
                    .name("idx_employees_active_full_name")
                    .table(Employees::Table)
                    .col(Employees::IsActive)
                    .col(Employees::FullName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_employees_active_full_name")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("idx_employees_full_name").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    FullName,
    Age,
    Area,
    Seniority,
    Phone,
    IsActive,
    CreatedAt,
}
