//! Approval status shared by accounts, doctor requests and doctor profiles.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{STATUS_APPROVED, STATUS_PENDING, STATUS_REJECTED, VALID_STATUSES};
use crate::errors::{AppError, AppResult};

/// Where a record sits in the approval workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => STATUS_PENDING,
            ApprovalStatus::Approved => STATUS_APPROVED,
            ApprovalStatus::Rejected => STATUS_REJECTED,
        }
    }

    /// Strict, case-insensitive parse of caller input.
    ///
    /// # Errors
    /// Returns a validation error naming the allowed values.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            STATUS_PENDING => Ok(ApprovalStatus::Pending),
            STATUS_APPROVED => Ok(ApprovalStatus::Approved),
            STATUS_REJECTED => Ok(ApprovalStatus::Rejected),
            _ => Err(AppError::validation(format!(
                "Invalid status. Allowed: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }

    /// A decided status is final for doctor requests.
    pub fn is_decided(&self) -> bool {
        !matches!(self, ApprovalStatus::Pending)
    }
}

/// Lenient conversion for values read back from the store.
/// Anything unrecognised is treated as still pending.
impl From<&str> for ApprovalStatus {
    fn from(s: &str) -> Self {
        ApprovalStatus::parse(s).unwrap_or_default()
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(ApprovalStatus::parse("Approved").unwrap(), ApprovalStatus::Approved);
        assert_eq!(ApprovalStatus::parse(" REJECTED ").unwrap(), ApprovalStatus::Rejected);
        assert_eq!(ApprovalStatus::parse("pending").unwrap(), ApprovalStatus::Pending);
    }

    #[test]
    fn test_parse_rejects_unknown_values() {
        let err = ApprovalStatus::parse("archived").unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("pending, approved, rejected")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_lenient_conversion_defaults_to_pending() {
        assert_eq!(ApprovalStatus::from("garbage"), ApprovalStatus::Pending);
        assert_eq!(ApprovalStatus::from("approved"), ApprovalStatus::Approved);
    }

    #[test]
    fn test_only_pending_is_undecided() {
        assert!(!ApprovalStatus::Pending.is_decided());
        assert!(ApprovalStatus::Approved.is_decided());
        assert!(ApprovalStatus::Rejected.is_decided());
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&ApprovalStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
    }
}
