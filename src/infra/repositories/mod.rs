//! Repository layer - Data access abstraction
//!
//! Each repository comes in two flavors sharing the same queries: a pooled
//! store behind a mockable trait, and a transaction-bound variant handed out
//! by [`TransactionContext`](crate::infra::TransactionContext).

mod account_repository;
mod doctor_profile_repository;
mod doctor_request_repository;
pub(crate) mod entities;

pub use account_repository::{AccountRepository, AccountStore, TxAccountRepository};
pub use doctor_profile_repository::{
    DoctorProfileRepository, DoctorProfileStore, TxDoctorProfileRepository,
};
pub use doctor_request_repository::{
    Decision, DoctorRequestRepository, DoctorRequestStore, TxDoctorRequestRepository,
};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use doctor_profile_repository::MockDoctorProfileRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use doctor_request_repository::MockDoctorRequestRepository;
