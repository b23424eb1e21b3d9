//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and owns the transaction lifecycle, so
//! multi-table workflows (approving a doctor request creates an account and a
//! profile) commit or roll back as one.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use super::repositories::{
    AccountRepository, AccountStore, DoctorProfileRepository, DoctorProfileStore,
    DoctorRequestRepository, DoctorRequestStore, TxAccountRepository, TxDoctorProfileRepository,
    TxDoctorRequestRepository,
};
use crate::errors::{AppError, AppResult};

/// Boxed closure body run inside a transaction
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic transaction methods; tests
/// wrap the repository mocks in their own implementation instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn accounts(&self) -> Arc<dyn AccountRepository>;

    fn doctor_requests(&self) -> Arc<dyn DoctorRequestRepository>;

    fn doctor_profiles(&self) -> Arc<dyn DoctorProfileRepository>;

    /// Run `f` in a ReadCommitted transaction.
    ///
    /// Committed on `Ok`, rolled back on `Err` or when the store timeout elapses.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;

    /// Run `f` in a Serializable transaction.
    ///
    /// Used for check-then-insert flows such as duplicate email detection.
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn accounts(&self) -> TxAccountRepository<'_> {
        TxAccountRepository::new(self.txn)
    }

    pub fn doctor_requests(&self) -> TxDoctorRequestRepository<'_> {
        TxDoctorRequestRepository::new(self.txn)
    }

    pub fn doctor_profiles(&self) -> TxDoctorProfileRepository<'_> {
        TxDoctorProfileRepository::new(self.txn)
    }
}

/// SeaORM-backed UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    timeout: Duration,
    accounts: Arc<AccountStore>,
    doctor_requests: Arc<DoctorRequestStore>,
    doctor_profiles: Arc<DoctorProfileStore>,
}

impl Persistence {
    /// `timeout` bounds each whole transaction, begin through commit.
    pub fn new(db: DatabaseConnection, timeout: Duration) -> Self {
        Self {
            accounts: Arc::new(AccountStore::new(db.clone())),
            doctor_requests: Arc::new(DoctorRequestStore::new(db.clone())),
            doctor_profiles: Arc::new(DoctorProfileStore::new(db.clone())),
            db,
            timeout,
        }
    }

    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let work = async {
            let txn = self
                .db
                .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
                .await
                .map_err(AppError::from)?;

            let ctx = TransactionContext::new(&txn);

            match f(ctx).await {
                Ok(result) => {
                    txn.commit().await.map_err(AppError::from)?;
                    Ok(result)
                }
                Err(e) => {
                    if let Err(rollback_err) = txn.rollback().await {
                        tracing::error!("Transaction rollback failed: {}", rollback_err);
                    }
                    Err(e)
                }
            }
        };

        // Dropping an unfinished transaction rolls it back
        tokio::time::timeout(self.timeout, work)
            .await
            .map_err(|_| {
                tracing::warn!(timeout = ?self.timeout, "Transaction timed out");
                AppError::Timeout
            })?
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn accounts(&self) -> Arc<dyn AccountRepository> {
        self.accounts.clone()
    }

    fn doctor_requests(&self) -> Arc<dyn DoctorRequestRepository> {
        self.doctor_requests.clone()
    }

    fn doctor_profiles(&self) -> Arc<dyn DoctorProfileRepository> {
        self.doctor_profiles.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f).await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::Serializable, f).await
    }
}
