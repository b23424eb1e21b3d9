//! HTTP request handlers.

pub mod account_handler;
pub mod auth_handler;
pub mod doctor_handler;
pub mod doctor_request_handler;

pub use account_handler::account_routes;
pub use auth_handler::auth_routes;
pub use doctor_handler::doctor_routes;
pub use doctor_request_handler::doctor_request_routes;

use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::ApprovalStatus;
use crate::errors::AppResult;

/// Optional approval status filter for list endpoints
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusQuery {
    /// pending, approved or rejected (case-insensitive)
    pub status: Option<String>,
}

impl StatusQuery {
    /// Parsed filter; a blank value means no filter.
    pub fn parsed(&self) -> AppResult<Option<ApprovalStatus>> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => ApprovalStatus::parse(value).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[test]
    fn test_status_query_parsing() {
        assert_eq!(StatusQuery::default().parsed().unwrap(), None);
        let blank = StatusQuery { status: Some("  ".into()) };
        assert_eq!(blank.parsed().unwrap(), None);
        let upper = StatusQuery { status: Some("APPROVED".into()) };
        assert_eq!(upper.parsed().unwrap(), Some(ApprovalStatus::Approved));
        let bad = StatusQuery { status: Some("done".into()) };
        assert!(matches!(bad.parsed(), Err(AppError::Validation(_))));
    }
}
