//! Service container: builds the services once at startup and hands out
//! trait objects.

use std::sync::Arc;

use super::{
    AccountManager, AccountService, AuthService, Authenticator, DoctorOnboarding,
    JwtSessions, OnboardingService, SessionIssuer,
};
use crate::config::Config;
use crate::infra::{FileStore, HttpFileStore, Persistence};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn onboarding(&self) -> Arc<dyn OnboardingService>;

    fn accounts(&self) -> Arc<dyn AccountService>;
}

pub struct Services {
    auth_service: Arc<dyn AuthService>,
    onboarding_service: Arc<dyn OnboardingService>,
    account_service: Arc<dyn AccountService>,
}

impl Services {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        onboarding_service: Arc<dyn OnboardingService>,
        account_service: Arc<dyn AccountService>,
    ) -> Self {
        Self {
            auth_service,
            onboarding_service,
            account_service,
        }
    }

    /// Wire the production services over one connection pool.
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> Self {
        let files: Arc<dyn FileStore> = Arc::new(HttpFileStore::new(config.file_store_url.clone()));
        Self::with_file_store(db, config, files)
    }

    /// Same wiring with a caller-supplied file store.
    pub fn with_file_store(
        db: sea_orm::DatabaseConnection,
        config: &Config,
        files: Arc<dyn FileStore>,
    ) -> Self {
        let uow = Arc::new(Persistence::new(db, config.database_timeout));
        let sessions: Arc<dyn SessionIssuer> = Arc::new(JwtSessions::new(config));

        let onboarding_service: Arc<dyn OnboardingService> =
            Arc::new(DoctorOnboarding::new(uow.clone(), files));
        let auth_service = Arc::new(Authenticator::new(
            uow.clone(),
            sessions,
            onboarding_service.clone(),
        ));
        let account_service = Arc::new(AccountManager::new(uow));

        Self {
            auth_service,
            onboarding_service,
            account_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn onboarding(&self) -> Arc<dyn OnboardingService> {
        self.onboarding_service.clone()
    }

    fn accounts(&self) -> Arc<dyn AccountService> {
        self.account_service.clone()
    }
}
