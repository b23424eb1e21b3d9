//! Doctor request database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{ApprovalStatus, DoctorRequest};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "doctor_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub specialty: String,
    pub license_number: String,
    pub phone: Option<String>,
    pub status: String,
    pub decided_by: Option<i32>,
    pub decided_at: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for DoctorRequest {
    fn from(model: Model) -> Self {
        DoctorRequest {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            name: model.name,
            specialty: model.specialty,
            license_number: model.license_number,
            phone: model.phone,
            status: ApprovalStatus::from(model.status.as_str()),
            decided_by: model.decided_by,
            decided_at: model.decided_at,
            rejection_reason: model.rejection_reason,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
