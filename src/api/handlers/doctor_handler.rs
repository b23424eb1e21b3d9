//! Doctor profile handlers.
//!
//! Profile submission authenticates with the credentials in the form itself,
//! since a doctor without an approved profile never holds a session.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    middleware,
    response::Json,
    routing::{get, patch, post},
    Extension, Router,
};
use utoipa::ToSchema;

use super::StatusQuery;
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, authorize, require_admin, CurrentUser};
use crate::api::AppState;
use crate::config::{FILE_STORE_FIELD_NAME, MAX_LICENSE_FILE_BYTES};
use crate::domain::{
    ApprovalStatus, DoctorProfileInput, DoctorProfileResponse, ProfileStatusInput, Role,
};
use crate::errors::{AppError, AppResult};
use crate::infra::FileMetadata;
use crate::services::LicenseDocument;
use crate::types::Created;

/// Headroom for the text fields around the license file
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Multipart form accepted by profile submission
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ProfileForm {
    email: String,
    password: String,
    specialty: String,
    /// `national_id` is accepted as an alias
    license_number: String,
    phone: Option<String>,
    /// Optional license document, at most 5 MiB
    #[schema(value_type = Option<String>, format = Binary)]
    file: Option<Vec<u8>>,
}

/// Create doctor profile routes
pub fn doctor_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", get(list_profiles))
        .route("/pending", get(list_pending_profiles))
        .route("/:id", get(get_profile))
        .route("/:id/status", patch(update_profile_status))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route(
            "/profile",
            post(submit_profile)
                .layer(DefaultBodyLimit::max(MAX_LICENSE_FILE_BYTES + FORM_OVERHEAD_BYTES)),
        )
        .merge(protected)
}

/// Read the profile form: text fields plus an optional license file.
async fn read_profile_form(
    mut multipart: Multipart,
) -> AppResult<(DoctorProfileInput, Option<LicenseDocument>)> {
    let mut input = DoctorProfileInput::default();
    let mut document = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == FILE_STORE_FIELD_NAME {
            let metadata = FileMetadata {
                file_name: field.file_name().unwrap_or("license").to_string(),
                content_type: field.content_type().map(str::to_string),
            };
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(e.body_text()))?;
            document = Some(LicenseDocument {
                bytes: bytes.to_vec(),
                metadata,
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        match name.as_str() {
            "email" => input.email = value,
            "password" => input.password = value,
            "specialty" => input.specialty = value,
            "license_number" | "national_id" => input.license_number = value,
            "phone" => input.phone = Some(value).filter(|v| !v.trim().is_empty()),
            other => tracing::debug!(field = other, "Ignoring unknown profile form field"),
        }
    }

    Ok((input, document))
}

/// Submit a doctor profile for an existing account
#[utoipa::path(
    post,
    path = "/api/doctors/profile",
    tag = "Doctors",
    request_body(content = ProfileForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Profile submitted, pending review", body = DoctorProfileResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account cannot become a doctor"),
        (status = 409, description = "Profile already exists")
    )
)]
pub async fn submit_profile(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Created<DoctorProfileResponse>> {
    let (input, document) = read_profile_form(multipart).await?;
    let profile = state
        .onboarding_service
        .submit_profile(input, document)
        .await?;
    Ok(Created(profile.into()))
}

/// List doctor profiles
#[utoipa::path(
    get,
    path = "/api/doctors",
    tag = "Doctors",
    params(StatusQuery),
    responses(
        (status = 200, description = "Profiles", body = [DoctorProfileResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Doctor or admin only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_profiles(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<Vec<DoctorProfileResponse>>> {
    authorize(Some(&current_user), &[Role::Doctor])?;

    let profiles = state
        .onboarding_service
        .list_profiles(query.parsed()?)
        .await?;

    Ok(Json(profiles.into_iter().map(Into::into).collect()))
}

/// List profiles waiting for review
#[utoipa::path(
    get,
    path = "/api/doctors/pending",
    tag = "Doctors",
    responses(
        (status = 200, description = "Pending profiles", body = [DoctorProfileResponse]),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_pending_profiles(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<DoctorProfileResponse>>> {
    require_admin(&current_user)?;

    let profiles = state
        .onboarding_service
        .list_profiles(Some(ApprovalStatus::Pending))
        .await?;

    Ok(Json(profiles.into_iter().map(Into::into).collect()))
}

/// Get one doctor profile
#[utoipa::path(
    get,
    path = "/api/doctors/{id}",
    tag = "Doctors",
    params(("id" = i32, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Profile", body = DoctorProfileResponse),
        (status = 403, description = "Doctor or admin only"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> AppResult<Json<DoctorProfileResponse>> {
    authorize(Some(&current_user), &[Role::Doctor])?;
    let profile = state.onboarding_service.get_profile(id).await?;
    Ok(Json(profile.into()))
}

/// Set a profile's status directly; the account follows approved and rejected
#[utoipa::path(
    patch,
    path = "/api/doctors/{id}/status",
    tag = "Doctors",
    params(("id" = i32, Path, description = "Profile ID")),
    request_body = ProfileStatusInput,
    responses(
        (status = 200, description = "Updated profile", body = DoctorProfileResponse),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile_status(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<ProfileStatusInput>,
) -> AppResult<Json<DoctorProfileResponse>> {
    require_admin(&current_user)?;
    let profile = state
        .onboarding_service
        .update_profile_status(id, &payload.status, current_user.id)
        .await?;
    Ok(Json(profile.into()))
}
