use sqlx::SqlitePool;

use crate::auth::Identity;
use crate::database::models::UserStatus;
use crate::error::ApiError;

use super::auth::AuthUser;

/// Re-read the token's user so deletions, blocks and role changes apply immediately
pub async fn validate_user(pool: &SqlitePool, identity: Identity) -> Result<AuthUser, ApiError> {
    let status = sqlx::query_as::<_, UserStatus>(
        r#"SELECT "RoleId", "IsBlocked", "BlockReason" FROM "Users" WHERE "Id" = ?"#,
    )
    .bind(identity.user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Database error validating user {}: {}", identity.user_id, e);
        ApiError::internal_server_error("Failed to validate user")
    })?;

    let status = status.ok_or_else(|| {
        tracing::warn!("Token refers to missing user {}", identity.user_id);
        ApiError::unauthorized("Unauthorized: invalid token")
    })?;

    if status.is_blocked {
        tracing::warn!("Blocked user {} rejected", identity.user_id);
        return Err(ApiError::user_blocked(status.block_reason));
    }

    if status.role_id != identity.role_id {
        tracing::debug!(
            "User {} token role {} differs from stored role {}",
            identity.user_id,
            identity.role_id,
            status.role_id
        );
    }

    Ok(AuthUser {
        user_id: identity.user_id,
        role_id: status.role_id,
    })
}
