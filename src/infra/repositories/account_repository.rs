//! Account repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::account::{self, ActiveModel, Entity as AccountEntity};
use crate::domain::{Account, ApprovalStatus, NewAccount, Role};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Account repository trait for dependency injection.
///
/// Emails are expected to be normalized by the caller.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Account>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Insert a new account. A taken email surfaces as `Conflict`.
    async fn create(&self, account: NewAccount) -> AppResult<Account>;

    /// Change role and/or approval status
    async fn update_access(
        &self,
        id: i32,
        role: Option<Role>,
        status: Option<ApprovalStatus>,
    ) -> AppResult<Account>;

    async fn set_active(&self, id: i32, is_active: bool) -> AppResult<Account>;

    /// One page of accounts, newest first, plus the total matching count
    async fn list(&self, role: Option<Role>, page: u64, per_page: u64)
        -> AppResult<(Vec<Account>, u64)>;
}

/// Pooled account repository
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Account>> {
        find_by_id(&self.db, id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        find_by_email(&self.db, email).await
    }

    async fn create(&self, account: NewAccount) -> AppResult<Account> {
        create(&self.db, account).await
    }

    async fn update_access(
        &self,
        id: i32,
        role: Option<Role>,
        status: Option<ApprovalStatus>,
    ) -> AppResult<Account> {
        update_access(&self.db, id, role, status).await
    }

    async fn set_active(&self, id: i32, is_active: bool) -> AppResult<Account> {
        set_active(&self.db, id, is_active).await
    }

    async fn list(
        &self,
        role: Option<Role>,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<Account>, u64)> {
        list(&self.db, role, page, per_page).await
    }
}

/// Transaction-bound account repository.
///
/// Borrows the transaction so every call joins the same unit of work.
pub struct TxAccountRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxAccountRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Account>> {
        find_by_id(self.txn, id).await
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        find_by_email(self.txn, email).await
    }

    pub async fn create(&self, account: NewAccount) -> AppResult<Account> {
        create(self.txn, account).await
    }

    pub async fn update_access(
        &self,
        id: i32,
        role: Option<Role>,
        status: Option<ApprovalStatus>,
    ) -> AppResult<Account> {
        update_access(self.txn, id, role, status).await
    }
}

async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<Account>> {
    let result = AccountEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(AppError::from)?;

    Ok(result.map(Account::from))
}

async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> AppResult<Option<Account>> {
    let result = AccountEntity::find()
        .filter(account::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(AppError::from)?;

    Ok(result.map(Account::from))
}

async fn create<C: ConnectionTrait>(db: &C, account: NewAccount) -> AppResult<Account> {
    let now = chrono::Utc::now();
    let active_model = ActiveModel {
        email: Set(account.email),
        password_hash: Set(account.password_hash),
        name: Set(account.name),
        role: Set(account.role.as_str().to_string()),
        status: Set(account.status.as_str().to_string()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = active_model.insert(db).await.map_err(|e| match AppError::from(e) {
        AppError::Conflict(_) => AppError::conflict("Account"),
        other => other,
    })?;

    Ok(Account::from(model))
}

async fn update_access<C: ConnectionTrait>(
    db: &C,
    id: i32,
    role: Option<Role>,
    status: Option<ApprovalStatus>,
) -> AppResult<Account> {
    let model = AccountEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = model.into();
    if let Some(role) = role {
        active.role = Set(role.as_str().to_string());
    }
    if let Some(status) = status {
        active.status = Set(status.as_str().to_string());
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(db).await.map_err(AppError::from)?;
    Ok(Account::from(model))
}

async fn set_active<C: ConnectionTrait>(db: &C, id: i32, is_active: bool) -> AppResult<Account> {
    let model = AccountEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = model.into();
    active.is_active = Set(is_active);
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(db).await.map_err(AppError::from)?;
    Ok(Account::from(model))
}

async fn list<C: ConnectionTrait>(
    db: &C,
    role: Option<Role>,
    page: u64,
    per_page: u64,
) -> AppResult<(Vec<Account>, u64)> {
    let mut query = AccountEntity::find().order_by_desc(account::Column::Id);
    if let Some(role) = role {
        query = query.filter(account::Column::Role.eq(role.as_str()));
    }

    let paginator = query.paginate(db, per_page.max(1));
    let total = paginator.num_items().await.map_err(AppError::from)?;
    let models = paginator
        .fetch_page(page.saturating_sub(1))
        .await
        .map_err(AppError::from)?;

    Ok((models.into_iter().map(Account::from).collect(), total))
}
