//! Authentication handlers.

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::validation::email_address;
use crate::domain::{AccountResponse, ApprovalStatus, RegisterAccount};
use crate::errors::AppResult;
use crate::services::{LoginOutcome, TokenResponse};
use crate::types::{Created, MessageResponse};

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(custom(function = "email_address", message = "Invalid email format"))]
    #[schema(example = "doctor@clinic.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "secret123")]
    pub password: String,
}

/// Refresh request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Session issued on login
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    #[schema(example = 28800)]
    pub expires_in: i64,
    pub account: AccountResponse,
}

/// Doctor login without a profile on file
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileRequiredResponse {
    pub message: String,
    pub account: AccountResponse,
    pub needs_doctor_profile: bool,
}

/// Doctor login while the profile or request is undecided or rejected
#[derive(Debug, Serialize, ToSchema)]
pub struct AwaitingApprovalResponse {
    pub message: String,
    pub account: AccountResponse,
    pub doctor_status: ApprovalStatus,
}

/// Create authentication routes
pub fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(me))
        .route("/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .merge(protected)
}

/// Register a patient or unapproved-user account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterAccount,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterAccount>,
) -> AppResult<Created<AccountResponse>> {
    let account = state.auth_service.register(payload).await?;
    Ok(Created(AccountResponse::from(account)))
}

/// Log in. Doctors only get a session once their profile is approved.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session issued; doctors without a profile get ProfileRequiredResponse instead", body = SessionResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Waiting for clinic approval", body = AwaitingApprovalResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Response> {
    let outcome = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    let response = match outcome {
        LoginOutcome::Authenticated { account, tokens } => Json(SessionResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
            account: account.into(),
        })
        .into_response(),
        LoginOutcome::NeedsProfile { account } => Json(ProfileRequiredResponse {
            message: "Login successful. Please complete your doctor profile".to_string(),
            account: account.into(),
            needs_doctor_profile: true,
        })
        .into_response(),
        LoginOutcome::AwaitingApproval { account, status } => (
            StatusCode::FORBIDDEN,
            Json(AwaitingApprovalResponse {
                message: "Waiting for clinic approval".to_string(),
                account: account.into(),
                doctor_status: status,
            }),
        )
            .into_response(),
    };

    Ok(response)
}

/// Exchange a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "Authentication",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair", body = TokenResponse),
        (status = 401, description = "Invalid or expired refresh token"),
        (status = 403, description = "Doctor no longer approved")
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshRequest>,
) -> AppResult<Json<TokenResponse>> {
    let tokens = state.auth_service.refresh(&payload.refresh_token).await?;
    Ok(Json(tokens))
}

/// Current account
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Authentication",
    responses(
        (status = 200, description = "Current account", body = AccountResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<AccountResponse>> {
    let account = state.account_service.get_account(current_user.id).await?;
    Ok(Json(account.into()))
}

/// Logout. Tokens are stateless, so this only acknowledges.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn logout(Extension(current_user): Extension<CurrentUser>) -> Json<MessageResponse> {
    tracing::debug!(account_id = current_user.id, "Logout");
    Json(MessageResponse::new("Logout successful"))
}
