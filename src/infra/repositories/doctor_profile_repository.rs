//! Doctor profile repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::doctor_profile::{self, ActiveModel, Entity as DoctorProfileEntity};
use crate::domain::{ApprovalStatus, DoctorProfile, NewDoctorProfile};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DoctorProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<DoctorProfile>>;

    async fn find_by_account(&self, account_id: i32) -> AppResult<Option<DoctorProfile>>;

    /// Insert a profile. A second profile for the same account is a `Conflict`.
    async fn create(&self, profile: NewDoctorProfile) -> AppResult<DoctorProfile>;

    async fn list(&self, status: Option<ApprovalStatus>) -> AppResult<Vec<DoctorProfile>>;

    async fn update_status(
        &self,
        id: i32,
        status: ApprovalStatus,
        reviewed_by: i32,
    ) -> AppResult<DoctorProfile>;
}

/// Pooled doctor profile repository
pub struct DoctorProfileStore {
    db: DatabaseConnection,
}

impl DoctorProfileStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DoctorProfileRepository for DoctorProfileStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<DoctorProfile>> {
        find_by_id(&self.db, id).await
    }

    async fn find_by_account(&self, account_id: i32) -> AppResult<Option<DoctorProfile>> {
        find_by_account(&self.db, account_id).await
    }

    async fn create(&self, profile: NewDoctorProfile) -> AppResult<DoctorProfile> {
        create(&self.db, profile).await
    }

    async fn list(&self, status: Option<ApprovalStatus>) -> AppResult<Vec<DoctorProfile>> {
        list(&self.db, status).await
    }

    async fn update_status(
        &self,
        id: i32,
        status: ApprovalStatus,
        reviewed_by: i32,
    ) -> AppResult<DoctorProfile> {
        update_status(&self.db, id, status, reviewed_by).await
    }
}

/// Transaction-bound doctor profile repository
pub struct TxDoctorProfileRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxDoctorProfileRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<DoctorProfile>> {
        find_by_id(self.txn, id).await
    }

    pub async fn find_by_account(&self, account_id: i32) -> AppResult<Option<DoctorProfile>> {
        find_by_account(self.txn, account_id).await
    }

    pub async fn create(&self, profile: NewDoctorProfile) -> AppResult<DoctorProfile> {
        create(self.txn, profile).await
    }

    pub async fn update_status(
        &self,
        id: i32,
        status: ApprovalStatus,
        reviewed_by: i32,
    ) -> AppResult<DoctorProfile> {
        update_status(self.txn, id, status, reviewed_by).await
    }
}

async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<DoctorProfile>> {
    let result = DoctorProfileEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(AppError::from)?;

    Ok(result.map(DoctorProfile::from))
}

async fn find_by_account<C: ConnectionTrait>(
    db: &C,
    account_id: i32,
) -> AppResult<Option<DoctorProfile>> {
    let result = DoctorProfileEntity::find()
        .filter(doctor_profile::Column::AccountId.eq(account_id))
        .one(db)
        .await
        .map_err(AppError::from)?;

    Ok(result.map(DoctorProfile::from))
}

async fn create<C: ConnectionTrait>(db: &C, profile: NewDoctorProfile) -> AppResult<DoctorProfile> {
    let now = chrono::Utc::now();
    let active_model = ActiveModel {
        account_id: Set(profile.account_id),
        specialty: Set(profile.specialty),
        license_number: Set(profile.license_number),
        phone: Set(profile.phone),
        license_document: Set(profile.license_document),
        status: Set(profile.status.as_str().to_string()),
        reviewed_by: Set(profile.reviewed_by),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = active_model.insert(db).await.map_err(|e| match AppError::from(e) {
        AppError::Conflict(_) => AppError::conflict("Doctor profile"),
        other => other,
    })?;

    Ok(DoctorProfile::from(model))
}

async fn list<C: ConnectionTrait>(
    db: &C,
    status: Option<ApprovalStatus>,
) -> AppResult<Vec<DoctorProfile>> {
    let mut query = DoctorProfileEntity::find().order_by_desc(doctor_profile::Column::Id);
    if let Some(status) = status {
        query = query.filter(doctor_profile::Column::Status.eq(status.as_str()));
    }

    let models = query.all(db).await.map_err(AppError::from)?;
    Ok(models.into_iter().map(DoctorProfile::from).collect())
}

async fn update_status<C: ConnectionTrait>(
    db: &C,
    id: i32,
    status: ApprovalStatus,
    reviewed_by: i32,
) -> AppResult<DoctorProfile> {
    let model = DoctorProfileEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = model.into();
    active.status = Set(status.as_str().to_string());
    active.reviewed_by = Set(Some(reviewed_by));
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(db).await.map_err(AppError::from)?;
    Ok(DoctorProfile::from(model))
}
