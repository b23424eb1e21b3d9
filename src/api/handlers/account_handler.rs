//! Account administration handlers (admin only).

use axum::{
    extract::{Path, Query, State},
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::middleware::{auth_middleware, require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{AccountResponse, Role};
use crate::errors::{AppError, AppResult};
use crate::types::{Paginated, PaginationParams};

/// Optional role filter for the account list
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RoleQuery {
    /// admin, doctor, patient or unapproved-user
    pub role: Option<String>,
}

impl RoleQuery {
    fn parsed(&self) -> AppResult<Option<Role>> {
        match self.role.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => Role::parse(value)
                .map(Some)
                .ok_or_else(|| AppError::validation(format!("Unknown role: {value}"))),
        }
    }
}

/// Create account administration routes
pub fn account_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_accounts))
        .route("/:id", get(get_account))
        .route("/:id/activate", post(activate_account))
        .route("/:id/deactivate", post(deactivate_account))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// List accounts, newest first
#[utoipa::path(
    get,
    path = "/api/accounts",
    tag = "Accounts",
    params(PaginationParams, RoleQuery),
    responses(
        (status = 200, description = "One page of accounts with pagination meta"),
        (status = 400, description = "Unknown role"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_accounts(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<RoleQuery>,
) -> AppResult<Json<Paginated<AccountResponse>>> {
    require_admin(&current_user)?;

    let (page, per_page) = (pagination.page(), pagination.limit());
    let (accounts, total) = state
        .account_service
        .list_accounts(filter.parsed()?, page, per_page)
        .await?;

    Ok(Json(Paginated::new(
        accounts.into_iter().map(Into::into).collect(),
        page,
        per_page,
        total,
    )))
}

/// Get one account
#[utoipa::path(
    get,
    path = "/api/accounts/{id}",
    tag = "Accounts",
    params(("id" = i32, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account", body = AccountResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_account(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> AppResult<Json<AccountResponse>> {
    require_admin(&current_user)?;
    let account = state.account_service.get_account(id).await?;
    Ok(Json(account.into()))
}

/// Re-enable an account
#[utoipa::path(
    post,
    path = "/api/accounts/{id}/activate",
    tag = "Accounts",
    params(("id" = i32, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account enabled", body = AccountResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn activate_account(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> AppResult<Json<AccountResponse>> {
    require_admin(&current_user)?;
    let account = state
        .account_service
        .set_active(id, true, current_user.id)
        .await?;
    Ok(Json(account.into()))
}

/// Disable an account. Its sessions stop working on the next request.
#[utoipa::path(
    post,
    path = "/api/accounts/{id}/deactivate",
    tag = "Accounts",
    params(("id" = i32, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account disabled", body = AccountResponse),
        (status = 400, description = "Cannot deactivate yourself"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn deactivate_account(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> AppResult<Json<AccountResponse>> {
    require_admin(&current_user)?;
    let account = state
        .account_service
        .set_active(id, false, current_user.id)
        .await?;
    Ok(Json(account.into()))
}
