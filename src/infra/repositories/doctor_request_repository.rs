//! Doctor request repository.
//!
//! Decisions are written with a conditional update guarded on
//! `status = 'pending'`, so two concurrent deciders cannot both win.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::doctor_request::{self, ActiveModel, Entity as DoctorRequestEntity};
use crate::domain::{ApprovalStatus, DoctorRequest, NewDoctorRequest};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Outcome recorded on a request when an admin decides it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub status: ApprovalStatus,
    pub decided_by: i32,
    pub decided_at: DateTime<Utc>,
    pub rejection_reason: Option<String>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DoctorRequestRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<DoctorRequest>>;

    /// Latest request for `email` that is still pending
    async fn find_pending_by_email(&self, email: &str) -> AppResult<Option<DoctorRequest>>;

    async fn create(&self, request: NewDoctorRequest) -> AppResult<DoctorRequest>;

    /// Requests newest first, optionally filtered by status
    async fn list(&self, status: Option<ApprovalStatus>) -> AppResult<Vec<DoctorRequest>>;

    /// Move a pending request to its decision.
    ///
    /// Returns `false` when the request is missing or no longer pending.
    async fn decide(&self, id: i32, decision: Decision) -> AppResult<bool>;
}

/// Pooled doctor request repository
pub struct DoctorRequestStore {
    db: DatabaseConnection,
}

impl DoctorRequestStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DoctorRequestRepository for DoctorRequestStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<DoctorRequest>> {
        find_by_id(&self.db, id).await
    }

    async fn find_pending_by_email(&self, email: &str) -> AppResult<Option<DoctorRequest>> {
        find_pending_by_email(&self.db, email).await
    }

    async fn create(&self, request: NewDoctorRequest) -> AppResult<DoctorRequest> {
        create(&self.db, request).await
    }

    async fn list(&self, status: Option<ApprovalStatus>) -> AppResult<Vec<DoctorRequest>> {
        list(&self.db, status).await
    }

    async fn decide(&self, id: i32, decision: Decision) -> AppResult<bool> {
        decide(&self.db, id, decision).await
    }
}

/// Transaction-bound doctor request repository
pub struct TxDoctorRequestRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxDoctorRequestRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<DoctorRequest>> {
        find_by_id(self.txn, id).await
    }

    pub async fn find_pending_by_email(&self, email: &str) -> AppResult<Option<DoctorRequest>> {
        find_pending_by_email(self.txn, email).await
    }

    pub async fn create(&self, request: NewDoctorRequest) -> AppResult<DoctorRequest> {
        create(self.txn, request).await
    }

    pub async fn decide(&self, id: i32, decision: Decision) -> AppResult<bool> {
        decide(self.txn, id, decision).await
    }
}

async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<DoctorRequest>> {
    let result = DoctorRequestEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(AppError::from)?;

    Ok(result.map(DoctorRequest::from))
}

async fn find_pending_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> AppResult<Option<DoctorRequest>> {
    let result = DoctorRequestEntity::find()
        .filter(doctor_request::Column::Email.eq(email))
        .filter(doctor_request::Column::Status.eq(ApprovalStatus::Pending.as_str()))
        .order_by_desc(doctor_request::Column::Id)
        .one(db)
        .await
        .map_err(AppError::from)?;

    Ok(result.map(DoctorRequest::from))
}

async fn create<C: ConnectionTrait>(db: &C, request: NewDoctorRequest) -> AppResult<DoctorRequest> {
    let now = Utc::now();
    let active_model = ActiveModel {
        email: Set(request.email),
        password_hash: Set(request.password_hash),
        name: Set(request.name),
        specialty: Set(request.specialty),
        license_number: Set(request.license_number),
        phone: Set(request.phone),
        status: Set(ApprovalStatus::Pending.as_str().to_string()),
        decided_by: Set(None),
        decided_at: Set(None),
        rejection_reason: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = active_model.insert(db).await.map_err(AppError::from)?;
    Ok(DoctorRequest::from(model))
}

async fn list<C: ConnectionTrait>(
    db: &C,
    status: Option<ApprovalStatus>,
) -> AppResult<Vec<DoctorRequest>> {
    let mut query = DoctorRequestEntity::find().order_by_desc(doctor_request::Column::Id);
    if let Some(status) = status {
        query = query.filter(doctor_request::Column::Status.eq(status.as_str()));
    }

    let models = query.all(db).await.map_err(AppError::from)?;
    Ok(models.into_iter().map(DoctorRequest::from).collect())
}

async fn decide<C: ConnectionTrait>(db: &C, id: i32, decision: Decision) -> AppResult<bool> {
    let result = DoctorRequestEntity::update_many()
        .col_expr(
            doctor_request::Column::Status,
            Expr::value(decision.status.as_str()),
        )
        .col_expr(
            doctor_request::Column::DecidedBy,
            Expr::value(decision.decided_by),
        )
        .col_expr(
            doctor_request::Column::DecidedAt,
            Expr::value(decision.decided_at),
        )
        .col_expr(
            doctor_request::Column::RejectionReason,
            Expr::value(decision.rejection_reason),
        )
        .col_expr(doctor_request::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(doctor_request::Column::Id.eq(id))
        .filter(doctor_request::Column::Status.eq(ApprovalStatus::Pending.as_str()))
        .exec(db)
        .await
        .map_err(AppError::from)?;

    Ok(result.rows_affected == 1)
}
