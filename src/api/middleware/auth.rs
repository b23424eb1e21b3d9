//! JWT authentication middleware and role checks.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::{Account, Role};
use crate::errors::AppError;

/// Caller behind the bearer token, as currently stored
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i32,
    pub email: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<Account> for CurrentUser {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            role: account.role,
        }
    }
}

/// JWT authentication middleware.
///
/// Resolves the bearer token to its account on every request, so a disabled
/// account, a changed role or a doctor profile that is no longer approved
/// takes effect immediately, then injects `CurrentUser` into the request
/// extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .ok_or(AppError::Unauthorized)?;

    let account = state.auth_service.resolve_session(token).await?;
    request.extensions_mut().insert(CurrentUser::from(account));

    Ok(next.run(request).await)
}

/// Role check against the hierarchy.
///
/// `Unauthorized` without a session, `Forbidden` when the caller's role
/// satisfies none of `required`.
pub fn authorize(user: Option<&CurrentUser>, required: &[Role]) -> Result<(), AppError> {
    let user = user.ok_or(AppError::Unauthorized)?;
    if required.iter().any(|role| user.role.satisfies(*role)) {
        Ok(())
    } else {
        tracing::debug!(account_id = user.id, role = %user.role, ?required, "Access denied");
        Err(AppError::Forbidden)
    }
}

/// Require admin role, returns Forbidden error if not admin.
pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    authorize(Some(user), &[Role::Admin])
}
