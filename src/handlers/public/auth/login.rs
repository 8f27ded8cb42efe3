// handlers/public/auth/login.rs - POST /api/users/login handler

use axum::extract::State;
use serde::Serialize;

use crate::auth::password::verify_password;
use crate::auth::Identity;
use crate::database::models::{LoginInput, User};
use crate::database::{DatabaseError, Required};
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::services::audit;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /api/users/login - exchange `{Email, Password}` for a token
///
/// Unknown email and wrong password produce the same 400 so accounts cannot be
/// enumerated. A blocked account is only revealed after the password matches.
pub async fn login_post(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginInput>,
) -> ApiResult<LoginResponse> {
    Required::new()
        .text("Email", &input.email)
        .text("Password", &input.password)
        .check()?;

    let email = input.email.as_deref().unwrap_or_default().trim();
    let password = input.password.as_deref().unwrap_or_default();

    let user = sqlx::query_as::<_, User>(r#"SELECT * FROM "Users" WHERE "Email" = ?"#)
        .bind(email)
        .fetch_optional(state.db.pool())
        .await?;

    let Some(user) = user else {
        tracing::warn!("Login failed: unknown email");
        return Err(invalid_credentials());
    };

    if !verify_password(password, &user.password).await? {
        tracing::warn!("Login failed: wrong password for user {}", user.id);
        return Err(invalid_credentials());
    }

    if user.is_blocked {
        tracing::warn!("Login refused for blocked user {}", user.id);
        return Err(ApiError::user_blocked(user.block_reason));
    }

    let token = state.tokens.issue(Identity {
        user_id: user.id,
        role_id: user.role_id,
    })?;

    if let Err(err) = record_login(&state, user.id).await {
        tracing::warn!("Login audit entry for user {} not written: {}", user.id, err);
    }

    tracing::info!("User {} logged in", user.id);
    Ok(ApiResponse::success(LoginResponse { token }))
}

async fn record_login(state: &AppState, user_id: i64) -> Result<(), DatabaseError> {
    let mut conn = state.db.pool().acquire().await?;
    audit::record(&mut *conn, Some(user_id), &audit::action("login", "User", user_id)).await?;
    Ok(())
}

fn invalid_credentials() -> ApiError {
    ApiError::validation_error("Invalid credentials", None)
}
