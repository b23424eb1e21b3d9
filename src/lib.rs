//! Clinic API - accounts, doctor onboarding and approval.
//!
//! A layered REST backend: doctors apply through a request queue or by
//! attaching a profile to an existing account, administrators approve or
//! reject, and the access gate keeps unapproved doctors from getting a
//! session.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Entities, validation and the login gate
//! - **services**: Onboarding, authentication and account use cases
//! - **infra**: Database, repositories, Unit of Work, file store
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server (applies pending migrations)
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Bootstrap an admin
//! cargo run -- admin create --email admin@clinic.com --password secret123
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Account, ApprovalStatus, Password, Role};
pub use errors::{AppError, AppResult};
