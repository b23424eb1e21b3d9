//! Migration: Create doctor_requests table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DoctorRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DoctorRequests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DoctorRequests::Email).string_len(255).not_null())
                    .col(ColumnDef::new(DoctorRequests::PasswordHash).string().not_null())
                    .col(ColumnDef::new(DoctorRequests::Name).string_len(100).not_null())
                    .col(ColumnDef::new(DoctorRequests::Specialty).string_len(100).not_null())
                    .col(
                        ColumnDef::new(DoctorRequests::LicenseNumber)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DoctorRequests::Phone).string_len(20).null())
                    .col(
                        ColumnDef::new(DoctorRequests::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(DoctorRequests::DecidedBy).integer().null())
                    .col(
                        ColumnDef::new(DoctorRequests::DecidedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(DoctorRequests::RejectionReason).text().null())
                    .col(
                        ColumnDef::new(DoctorRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DoctorRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Duplicate checks look up pending requests by email
        manager
            .create_index(
                Index::create()
                    .name("idx_doctor_requests_email_status")
                    .table(DoctorRequests::Table)
                    .col(DoctorRequests::Email)
                    .col(DoctorRequests::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DoctorRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DoctorRequests {
    Table,
    Id,
    Email,
    PasswordHash,
    Name,
    Specialty,
    LicenseNumber,
    Phone,
    Status,
    DecidedBy,
    DecidedAt,
    RejectionReason,
    CreatedAt,
    UpdatedAt,
}
