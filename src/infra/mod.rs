//! Infrastructure layer - External systems integration
//!
//! - Database connection, migrations and repositories
//! - Unit of Work for transaction management
//! - File-upload service client

pub mod db;
pub mod file_store;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use file_store::{FileMetadata, FileStore, HttpFileStore};
pub use repositories::{
    AccountRepository, AccountStore, Decision, DoctorProfileRepository, DoctorProfileStore,
    DoctorRequestRepository, DoctorRequestStore, TxAccountRepository, TxDoctorProfileRepository,
    TxDoctorRequestRepository,
};
pub use unit_of_work::{Persistence, TransactionContext, TxFuture, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use file_store::MockFileStore;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockAccountRepository, MockDoctorProfileRepository, MockDoctorRequestRepository,
};
