//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    account_handler, auth_handler, doctor_handler, doctor_request_handler,
};
use crate::domain::{
    AccountResponse, ApprovalStatus, DoctorProfileResponse, DoctorRequestInput,
    DoctorRequestResponse, ProfileStatusInput, RegisterAccount, RejectRequestInput, Role,
};
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the clinic API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clinic API",
        version = "0.1.0",
        description = "Clinic backend: accounts, doctor onboarding and approval"
    ),
    servers(
        (url = "http://localhost:3001", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::refresh,
        auth_handler::me,
        auth_handler::logout,
        // Doctor request endpoints
        doctor_request_handler::submit_request,
        doctor_request_handler::list_requests,
        doctor_request_handler::get_request,
        doctor_request_handler::approve_request,
        doctor_request_handler::reject_request,
        // Doctor profile endpoints
        doctor_handler::submit_profile,
        doctor_handler::list_profiles,
        doctor_handler::list_pending_profiles,
        doctor_handler::get_profile,
        doctor_handler::update_profile_status,
        // Account endpoints
        account_handler::list_accounts,
        account_handler::get_account,
        account_handler::activate_account,
        account_handler::deactivate_account,
    ),
    components(
        schemas(
            // Domain types
            Role,
            ApprovalStatus,
            AccountResponse,
            RegisterAccount,
            DoctorRequestInput,
            DoctorRequestResponse,
            RejectRequestInput,
            DoctorProfileResponse,
            ProfileStatusInput,
            // Auth types
            auth_handler::LoginRequest,
            auth_handler::RefreshRequest,
            auth_handler::SessionResponse,
            auth_handler::ProfileRequiredResponse,
            auth_handler::AwaitingApprovalResponse,
            TokenResponse,
            MessageResponse,
            // Onboarding types
            doctor_handler::ProfileForm,
            doctor_request_handler::ApprovalResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and sessions"),
        (name = "Doctor Requests", description = "Doctor applications and admin review"),
        (name = "Doctors", description = "Doctor profiles"),
        (name = "Accounts", description = "Account administration")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
