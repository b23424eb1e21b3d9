//! Account domain entity, roles and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::validation::{email_address, non_blank};
use super::ApprovalStatus;
use crate::config::{
    ROLE_ADMIN, ROLE_DOCTOR, ROLE_LEGACY_USER, ROLE_PATIENT, ROLE_UNAPPROVED_USER,
};

/// Account roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Admin,
    Doctor,
    Patient,
    #[serde(alias = "user")]
    UnapprovedUser,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Doctor => ROLE_DOCTOR,
            Role::Patient => ROLE_PATIENT,
            Role::UnapprovedUser => ROLE_UNAPPROVED_USER,
        }
    }

    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Whether this role meets a route's `required` role.
    ///
    /// Admin satisfies everything, doctor satisfies doctor and patient
    /// requirements. Access check only; no data is inherited.
    pub fn satisfies(&self, required: Role) -> bool {
        match self {
            Role::Admin => true,
            Role::Doctor => matches!(required, Role::Doctor | Role::Patient),
            Role::Patient => matches!(required, Role::Patient),
            Role::UnapprovedUser => matches!(required, Role::UnapprovedUser),
        }
    }

    /// Strict parse of caller input; `None` for anything unknown.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            ROLE_ADMIN => Some(Role::Admin),
            ROLE_DOCTOR => Some(Role::Doctor),
            ROLE_PATIENT => Some(Role::Patient),
            ROLE_UNAPPROVED_USER | ROLE_LEGACY_USER => Some(Role::UnapprovedUser),
            _ => None,
        }
    }
}

/// Lenient conversion for stored values; unknown roles get no privileges.
impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Role::parse(s).unwrap_or(Role::UnapprovedUser)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trim and lowercase an email so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Account domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub status: ApprovalStatus,
    /// Accounts are never deleted; disabled ones keep their row
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Check if account has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_doctor(&self) -> bool {
        matches!(self.role, Role::Doctor)
    }
}

/// Values needed to insert an account row.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub status: ApprovalStatus,
}

/// Self-service registration input
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterAccount {
    #[validate(custom(function = "email_address", message = "Invalid email format"))]
    #[schema(example = "patient@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "secret1", min_length = 6)]
    pub password: String,
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1 to 100 characters"),
        custom(function = "non_blank", message = "Name is required")
    )]
    #[schema(example = "Jane Doe")]
    pub name: String,
    /// `patient` or `unapproved-user` (default). Privileged roles are refused.
    pub role: Option<Role>,
}

/// Account response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "Dr. Ada Lovelace")]
    pub name: String,
    pub role: Role,
    pub status: ApprovalStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            name: account.name,
            role: account.role,
            status: account.status,
            is_active: account.is_active,
            created_at: account.created_at,
        }
    }
}
