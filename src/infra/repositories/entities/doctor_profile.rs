//! Doctor profile database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{ApprovalStatus, DoctorProfile};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "doctor_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub account_id: i32,
    pub specialty: String,
    pub license_number: String,
    pub phone: Option<String>,
    pub license_document: Option<String>,
    pub status: String,
    pub reviewed_by: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id",
        on_delete = "Cascade"
    )]
    Account,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for DoctorProfile {
    fn from(model: Model) -> Self {
        DoctorProfile {
            id: model.id,
            account_id: model.account_id,
            specialty: model.specialty,
            license_number: model.license_number,
            phone: model.phone,
            license_document: model.license_document,
            status: ApprovalStatus::from(model.status.as_str()),
            reviewed_by: model.reviewed_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
