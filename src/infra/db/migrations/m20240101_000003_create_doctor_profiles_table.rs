//! Migration: Create doctor_profiles table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_accounts_table::Accounts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DoctorProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DoctorProfiles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // One profile per account
                    .col(
                        ColumnDef::new(DoctorProfiles::AccountId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(DoctorProfiles::Specialty).string_len(100).not_null())
                    .col(
                        ColumnDef::new(DoctorProfiles::LicenseNumber)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DoctorProfiles::Phone).string_len(20).null())
                    .col(ColumnDef::new(DoctorProfiles::LicenseDocument).string().null())
                    .col(
                        ColumnDef::new(DoctorProfiles::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(DoctorProfiles::ReviewedBy).integer().null())
                    .col(
                        ColumnDef::new(DoctorProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DoctorProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_doctor_profiles_account")
                            .from(DoctorProfiles::Table, DoctorProfiles::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_doctor_profiles_status")
                    .table(DoctorProfiles::Table)
                    .col(DoctorProfiles::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DoctorProfiles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DoctorProfiles {
    Table,
    Id,
    AccountId,
    Specialty,
    LicenseNumber,
    Phone,
    LicenseDocument,
    Status,
    ReviewedBy,
    CreatedAt,
    UpdatedAt,
}
