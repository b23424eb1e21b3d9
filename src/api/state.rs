//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{AccountService, AuthService, OnboardingService, ServiceContainer, Services};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Registration, login and session resolution
    pub auth_service: Arc<dyn AuthService>,
    /// Doctor requests and doctor profiles
    pub onboarding_service: Arc<dyn OnboardingService>,
    /// Account administration
    pub account_service: Arc<dyn AccountService>,
    /// Database connection, used by the health check
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the production services over the database pool.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::from_container(&container, database)
    }

    /// Take the services from any container, e.g. one built with a custom file store.
    pub fn from_container(container: &dyn ServiceContainer, database: Arc<Database>) -> Self {
        Self {
            auth_service: container.auth(),
            onboarding_service: container.onboarding(),
            account_service: container.accounts(),
            database,
        }
    }

    /// Create application state with manually injected services.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        onboarding_service: Arc<dyn OnboardingService>,
        account_service: Arc<dyn AccountService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service,
            onboarding_service,
            account_service,
            database,
        }
    }
}
