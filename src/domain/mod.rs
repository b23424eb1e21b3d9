//! Domain layer - Core business entities and logic
//!
//! Accounts, doctor requests and doctor profiles, the approval status they
//! share, and the rules that do not need the store (password hashing,
//! role hierarchy, the doctor login gate).

pub mod account;
pub mod approval;
pub mod doctor_profile;
pub mod doctor_request;
pub mod onboarding;
pub mod password;
pub mod validation;

pub use account::{normalize_email, Account, AccountResponse, NewAccount, RegisterAccount, Role};
pub use approval::ApprovalStatus;
pub use doctor_profile::{
    DoctorProfile, DoctorProfileInput, DoctorProfileResponse, NewDoctorProfile, ProfileStatusInput,
};
pub use doctor_request::{
    DoctorRequest, DoctorRequestInput, DoctorRequestResponse, NewDoctorRequest, RejectRequestInput,
};
pub use onboarding::LoginGate;
pub use password::Password;
