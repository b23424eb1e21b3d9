//! Doctor request handlers: public submission, admin review.

use axum::{
    extract::{Path, Query, State},
    middleware,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use super::StatusQuery;
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{
    AccountResponse, DoctorProfileResponse, DoctorRequestInput, DoctorRequestResponse,
    RejectRequestInput,
};
use crate::errors::AppResult;
use crate::services::Approval;
use crate::types::Created;

/// Records produced by an approval
#[derive(Debug, Serialize, ToSchema)]
pub struct ApprovalResponse {
    pub request: DoctorRequestResponse,
    pub account: AccountResponse,
    pub profile: DoctorProfileResponse,
}

impl From<Approval> for ApprovalResponse {
    fn from(approval: Approval) -> Self {
        Self {
            request: approval.request.into(),
            account: approval.account.into(),
            profile: approval.profile.into(),
        }
    }
}

/// Create doctor request routes. Submission is public, the rest is admin only.
pub fn doctor_request_routes(state: AppState) -> Router<AppState> {
    let auth = middleware::from_fn_with_state(state, auth_middleware);

    Router::new()
        .route(
            "/",
            post(submit_request).merge(get(list_requests).route_layer(auth.clone())),
        )
        .route("/:id", get(get_request).route_layer(auth.clone()))
        .route("/:id/approve", put(approve_request).route_layer(auth.clone()))
        .route("/:id/reject", put(reject_request).route_layer(auth))
}

/// Submit a doctor application
#[utoipa::path(
    post,
    path = "/api/doctor-requests",
    tag = "Doctor Requests",
    request_body = DoctorRequestInput,
    responses(
        (status = 201, description = "Request queued for review", body = DoctorRequestResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered or pending")
    )
)]
pub async fn submit_request(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<DoctorRequestInput>,
) -> AppResult<Created<DoctorRequestResponse>> {
    let request = state.onboarding_service.submit_request(payload).await?;
    Ok(Created(request.into()))
}

/// List doctor requests
#[utoipa::path(
    get,
    path = "/api/doctor-requests",
    tag = "Doctor Requests",
    params(StatusQuery),
    responses(
        (status = 200, description = "Requests, newest first", body = [DoctorRequestResponse]),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_requests(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<Vec<DoctorRequestResponse>>> {
    require_admin(&current_user)?;

    let requests = state
        .onboarding_service
        .list_requests(query.parsed()?)
        .await?;

    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// Get one doctor request
#[utoipa::path(
    get,
    path = "/api/doctor-requests/{id}",
    tag = "Doctor Requests",
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request", body = DoctorRequestResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_request(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> AppResult<Json<DoctorRequestResponse>> {
    require_admin(&current_user)?;
    let request = state.onboarding_service.get_request(id).await?;
    Ok(Json(request.into()))
}

/// Approve a pending request, creating the doctor account and profile
#[utoipa::path(
    put,
    path = "/api/doctor-requests/{id}/approve",
    tag = "Doctor Requests",
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Approved", body = ApprovalResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No pending request with this id"),
        (status = 409, description = "Account already exists for the email")
    ),
    security(("bearer_auth" = []))
)]
pub async fn approve_request(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApprovalResponse>> {
    require_admin(&current_user)?;
    let approval = state
        .onboarding_service
        .approve_request(id, current_user.id)
        .await?;
    Ok(Json(approval.into()))
}

/// Reject a pending request
#[utoipa::path(
    put,
    path = "/api/doctor-requests/{id}/reject",
    tag = "Doctor Requests",
    params(("id" = i32, Path, description = "Request ID")),
    request_body(content = RejectRequestInput, description = "Optional reason"),
    responses(
        (status = 200, description = "Rejected", body = DoctorRequestResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No pending request with this id")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reject_request(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    body: Option<Json<RejectRequestInput>>,
) -> AppResult<Json<DoctorRequestResponse>> {
    require_admin(&current_user)?;

    let input = body.map(|Json(input)| input).unwrap_or_default();
    input.validate()?;

    let request = state
        .onboarding_service
        .reject_request(id, current_user.id, input.reason)
        .await?;
    Ok(Json(request.into()))
}
