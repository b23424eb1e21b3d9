//! Doctor request: an application submitted before any account exists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::validation::{email_address, non_blank, PHONE_REGEX};
use super::ApprovalStatus;

/// Doctor application awaiting an admin decision.
#[derive(Debug, Clone)]
pub struct DoctorRequest {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub specialty: String,
    pub license_number: String,
    pub phone: Option<String>,
    pub status: ApprovalStatus,
    /// Admin who approved or rejected the request
    pub decided_by: Option<i32>,
    pub decided_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DoctorRequest {
    pub fn is_pending(&self) -> bool {
        self.status == ApprovalStatus::Pending
    }
}

/// Validated, normalized submission ready to be stored.
#[derive(Debug, Clone)]
pub struct NewDoctorRequest {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub specialty: String,
    pub license_number: String,
    pub phone: Option<String>,
}

/// Doctor request as shown to admins. The password hash never leaves the store.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DoctorRequestResponse {
    #[schema(example = 12)]
    pub id: i32,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "Dr. Ada Lovelace")]
    pub name: String,
    #[schema(example = "Cardiology")]
    pub specialty: String,
    #[schema(example = "L123")]
    pub license_number: String,
    #[schema(example = "+20 100 000 0000")]
    pub phone: Option<String>,
    pub status: ApprovalStatus,
    #[schema(example = 7)]
    pub decided_by: Option<i32>,
    pub decided_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DoctorRequest> for DoctorRequestResponse {
    fn from(request: DoctorRequest) -> Self {
        Self {
            id: request.id,
            email: request.email,
            name: request.name,
            specialty: request.specialty,
            license_number: request.license_number,
            phone: request.phone,
            status: request.status,
            decided_by: request.decided_by,
            decided_at: request.decided_at,
            rejection_reason: request.rejection_reason,
            created_at: request.created_at,
        }
    }
}

/// Doctor application as submitted by the applicant
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DoctorRequestInput {
    #[validate(custom(function = "email_address", message = "Invalid email format"))]
    #[schema(example = "a@x.com")]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "secret1", min_length = 6)]
    pub password: String,
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1 to 100 characters"),
        custom(function = "non_blank", message = "Name is required")
    )]
    #[schema(example = "Dr. Ada Lovelace")]
    pub name: String,
    #[validate(
        length(min = 1, max = 100, message = "Specialty must be 1 to 100 characters"),
        custom(function = "non_blank", message = "Specialty is required")
    )]
    #[schema(example = "Cardiology")]
    pub specialty: String,
    #[serde(alias = "national_id")]
    #[validate(
        length(min = 1, max = 100, message = "License number must be 1 to 100 characters"),
        custom(function = "non_blank", message = "License number is required")
    )]
    #[schema(example = "L123")]
    pub license_number: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    #[schema(example = "+20 100 000 0000")]
    pub phone: Option<String>,
}

/// Admin's reason for turning a request down
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct RejectRequestInput {
    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    #[schema(example = "License could not be verified")]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> DoctorRequestInput {
        DoctorRequestInput {
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
            name: "Ada".to_string(),
            specialty: "Cardiology".to_string(),
            license_number: "L123".to_string(),
            phone: None,
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn test_blank_specialty_rejected() {
        let mut input = input();
        input.specialty = "  ".to_string();
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("specialty"));
    }

    #[test]
    fn test_bad_phone_rejected() {
        let mut input = input();
        input.phone = Some("call me".to_string());
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_national_id_alias() {
        let json = r#"{"email":"a@x.com","password":"secret1","name":"Ada",
            "specialty":"Cardiology","national_id":"N-9"}"#;
        let input: DoctorRequestInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.license_number, "N-9");
        assert_eq!(input.phone, None);
    }
}
