// handlers/public/auth/register.rs - POST /api/users/register handler

use axum::extract::State;

use crate::auth::password::hash_password;
use crate::auth::{PRIVILEGED_ROLE_ID, REGULAR_ROLE_ID};
use crate::database::models::{UserInput, UserView};
use crate::database::{Record, Repository, Required};
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, Created};
use crate::services::audit;
use crate::state::AppState;

/// POST /api/users/register - create an account, 201 `{"id": n}`
///
/// `RoleId` defaults to the regular role. The admin role can only be claimed
/// while no admin exists, which is how the first administrator is created.
pub async fn register_post(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<UserInput>,
) -> ApiResult<Created> {
    Required::new()
        .text("Name", &input.name)
        .text("Email", &input.email)
        .text("Password", &input.password)
        .check()?;

    let role_id = input.role_id.unwrap_or(REGULAR_ROLE_ID);
    let password = input.password.unwrap_or_default();
    let hash = hash_password(&password, state.config.security.bcrypt_cost).await?;

    let record = Record::new()
        .set("Name", input.name)
        .set("Email", input.email.map(|email| email.trim().to_string()))
        .set("Password", hash)
        .set("RoleId", role_id);

    let mut tx = state.db.pool().begin().await?;

    if role_id == PRIVILEGED_ROLE_ID {
        let admins: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "Users" WHERE "RoleId" = ?"#)
            .bind(PRIVILEGED_ROLE_ID)
            .fetch_one(&mut *tx)
            .await?;
        if admins > 0 {
            tracing::warn!("Rejected self-registration as admin");
            return Err(ApiError::forbidden("Forbidden: cannot register as admin"));
        }
    }

    let id = Repository::<UserView>::new("Users", r#""Id" ASC"#)
        .insert(&mut *tx, &record)
        .await?;
    audit::record(&mut *tx, Some(id), &audit::action("register", "User", id)).await?;
    tx.commit().await?;

    tracing::info!("Registered user {} with role {}", id, role_id);
    Ok(ApiResponse::created(Created { id }))
}
