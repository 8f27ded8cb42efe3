use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::PRIVILEGED_ROLE_ID;
use crate::error::ApiError;
use crate::state::AppState;

use super::validate_user::validate_user;

/// Routes reachable without a token, matched on whole path segments
const PUBLIC_PREFIXES: &[&str] = &["/api/users/login", "/api/users/register", "/api-docs"];

/// Routes reachable without a token, matched exactly
const PUBLIC_EXACT: &[&str] = &["/", "/health"];

/// Authenticated caller attached to the request by the auth gate.
/// `role_id` is the role stored in the database at request time, not the token claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
    pub role_id: i64,
}

impl AuthUser {
    pub fn is_privileged(&self) -> bool {
        self.role_id == PRIVILEGED_ROLE_ID
    }

    pub fn require_privileged(&self) -> Result<(), ApiError> {
        if self.is_privileged() {
            Ok(())
        } else {
            tracing::debug!("User {} denied: admin role required", self.user_id);
            Err(ApiError::forbidden("Forbidden: admin role required"))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| ApiError::unauthorized("Unauthorized: token missing"))
    }
}

/// True when `path` bypasses authentication
pub fn is_public_path(path: &str) -> bool {
    if PUBLIC_EXACT.contains(&path) {
        return true;
    }
    PUBLIC_PREFIXES.iter().any(|prefix| match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    })
}

/// Auth gate: verifies the bearer token, re-checks the user row and attaches `AuthUser`
pub async fn auth_gate_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if is_public_path(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let token = extract_bearer_token(request.headers())?;
    let identity = state.tokens.verify(token).map_err(|e| {
        tracing::warn!("Rejected token on {}", request.uri().path());
        ApiError::from(e)
    })?;

    let auth_user = validate_user(state.db.pool(), identity).await?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("Unauthorized: token missing"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Unauthorized: invalid token"))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(ApiError::unauthorized("Unauthorized: invalid token")),
    }
}
