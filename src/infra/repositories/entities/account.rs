//! Account database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Account, ApprovalStatus, Role};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub status: String,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::doctor_profile::Entity")]
    DoctorProfile,
}

impl Related<super::doctor_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DoctorProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Account {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            name: model.name,
            role: Role::from(model.role.as_str()),
            status: ApprovalStatus::from(model.status.as_str()),
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
