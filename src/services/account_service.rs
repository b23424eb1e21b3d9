//! Account administration.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Account, Role};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// One page of accounts and the total count
    async fn list_accounts(
        &self,
        role: Option<Role>,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<Account>, u64)>;

    async fn get_account(&self, id: i32) -> AppResult<Account>;

    /// Enable or disable an account. Admins cannot disable themselves.
    async fn set_active(&self, id: i32, is_active: bool, admin_id: i32) -> AppResult<Account>;
}

pub struct AccountManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AccountManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> AccountService for AccountManager<U> {
    async fn list_accounts(
        &self,
        role: Option<Role>,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<Account>, u64)> {
        self.uow.accounts().list(role, page, per_page).await
    }

    async fn get_account(&self, id: i32) -> AppResult<Account> {
        self.uow.accounts().find_by_id(id).await?.ok_or_not_found()
    }

    async fn set_active(&self, id: i32, is_active: bool, admin_id: i32) -> AppResult<Account> {
        if !is_active && id == admin_id {
            return Err(AppError::validation("You cannot deactivate your own account"));
        }

        let account = self.uow.accounts().set_active(id, is_active).await?;
        tracing::info!(account_id = id, admin_id, is_active, "Account activation changed");
        Ok(account)
    }
}
