//! Doctor profile: the operational doctor record owned by one account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::validation::{email_address, non_blank, PHONE_REGEX};
use super::ApprovalStatus;

/// Doctor profile. `status == Approved` implies the owning account is approved.
#[derive(Debug, Clone)]
pub struct DoctorProfile {
    pub id: i32,
    pub account_id: i32,
    pub specialty: String,
    pub license_number: String,
    pub phone: Option<String>,
    /// Opaque reference returned by the file store
    pub license_document: Option<String>,
    pub status: ApprovalStatus,
    pub reviewed_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DoctorProfile {
    pub fn is_approved(&self) -> bool {
        self.status == ApprovalStatus::Approved
    }
}

/// Values needed to insert a profile row.
#[derive(Debug, Clone)]
pub struct NewDoctorProfile {
    pub account_id: i32,
    pub specialty: String,
    pub license_number: String,
    pub phone: Option<String>,
    pub license_document: Option<String>,
    pub status: ApprovalStatus,
    pub reviewed_by: Option<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DoctorProfileResponse {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = 42)]
    pub account_id: i32,
    #[schema(example = "Cardiology")]
    pub specialty: String,
    #[schema(example = "L123")]
    pub license_number: String,
    pub phone: Option<String>,
    pub license_document: Option<String>,
    pub status: ApprovalStatus,
    pub reviewed_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DoctorProfile> for DoctorProfileResponse {
    fn from(profile: DoctorProfile) -> Self {
        Self {
            id: profile.id,
            account_id: profile.account_id,
            specialty: profile.specialty,
            license_number: profile.license_number,
            phone: profile.phone,
            license_document: profile.license_document,
            status: profile.status,
            reviewed_by: profile.reviewed_by,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// Profile submission by an existing account, authenticated by its credentials.
///
/// Arrives as multipart form fields next to an optional license file.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DoctorProfileInput {
    #[validate(custom(function = "email_address", message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(
        length(min = 1, max = 100, message = "Specialty must be 1 to 100 characters"),
        custom(function = "non_blank", message = "Specialty is required")
    )]
    pub specialty: String,
    #[serde(alias = "national_id")]
    #[validate(
        length(min = 1, max = 100, message = "License number must be 1 to 100 characters"),
        custom(function = "non_blank", message = "License number is required")
    )]
    pub license_number: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,
}

/// Admin override of a profile's status; parsed case-insensitively
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProfileStatusInput {
    #[validate(length(min = 1, message = "Status is required"))]
    #[schema(example = "approved")]
    pub status: String,
}
