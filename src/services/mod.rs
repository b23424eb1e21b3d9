//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion and reach the store through the Unit of Work.

mod account_service;
mod auth_service;
pub mod container;
mod onboarding_service;
mod token;

pub use container::{ServiceContainer, Services};

pub use account_service::{AccountManager, AccountService};
pub use auth_service::{AuthService, Authenticator, LoginOutcome};
pub use onboarding_service::{
    Approval, DoctorOnboarding, LicenseDocument, OnboardingService,
};
pub use token::{Claims, JwtSessions, SessionIssuer, TokenKind, TokenResponse};

#[cfg(any(test, feature = "test-utils"))]
pub use account_service::MockAccountService;
#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use onboarding_service::MockOnboardingService;
#[cfg(any(test, feature = "test-utils"))]
pub use token::MockSessionIssuer;
