use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::auth::{PRIVILEGED_ROLE_ID, REGULAR_ROLE_ID};
use crate::database::models::{UserStatus, UserView};
use crate::database::DatabaseError;
use crate::services::audit;

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("User not found")]
    UserNotFound,
    #[error("Administrators cannot be blocked")]
    ProtectedUser,
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for AdminError {
    fn from(err: sqlx::Error) -> Self {
        AdminError::Database(err.into())
    }
}

/// Aggregate user counts reported by `GET /api/admin/statistics`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatistics {
    pub total_users: usize,
    pub active_users: usize,
    pub blocked_users: usize,
    pub admins: usize,
    pub regular_users: usize,
}

impl UserStatistics {
    /// Users whose last activity is at or after `now - window_days` count as active.
    pub fn from_rows(rows: &[UserView], now: DateTime<Utc>, window_days: i64) -> Self {
        let cutoff = now - Duration::days(window_days);
        Self {
            total_users: rows.len(),
            active_users: rows
                .iter()
                .filter(|u| u.last_activity.map_or(false, |seen| seen >= cutoff))
                .count(),
            blocked_users: rows.iter().filter(|u| u.is_blocked).count(),
            admins: rows.iter().filter(|u| u.role_id == PRIVILEGED_ROLE_ID).count(),
            regular_users: rows.iter().filter(|u| u.role_id == REGULAR_ROLE_ID).count(),
        }
    }
}

/// User blocking and reporting for administrators
pub struct AdminService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AdminService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Block `target`, recording the reason. Role 1 users cannot be blocked.
    pub async fn block_user(&self, actor: i64, target: i64, reason: Option<String>) -> Result<(), AdminError> {
        let mut tx = self.pool.begin().await?;

        let status = sqlx::query_as::<_, UserStatus>(
            r#"SELECT "RoleId", "IsBlocked", "BlockReason" FROM "Users" WHERE "Id" = ?"#,
        )
        .bind(target)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AdminError::UserNotFound)?;

        if status.role_id == PRIVILEGED_ROLE_ID {
            tracing::warn!("User {} attempted to block admin {}", actor, target);
            return Err(AdminError::ProtectedUser);
        }

        sqlx::query(r#"UPDATE "Users" SET "IsBlocked" = 1, "BlockReason" = ? WHERE "Id" = ?"#)
            .bind(&reason)
            .bind(target)
            .execute(&mut *tx)
            .await?;
        audit::record(&mut *tx, Some(actor), &audit::action("block", "User", target)).await?;

        tx.commit().await?;
        tracing::info!("User {} blocked by {}", target, actor);
        Ok(())
    }

    /// Clear the block flag and reason on `target`
    pub async fn unblock_user(&self, actor: i64, target: i64) -> Result<(), AdminError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(r#"UPDATE "Users" SET "IsBlocked" = 0, "BlockReason" = NULL WHERE "Id" = ?"#)
            .bind(target)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AdminError::UserNotFound);
        }
        audit::record(&mut *tx, Some(actor), &audit::action("unblock", "User", target)).await?;

        tx.commit().await?;
        tracing::info!("User {} unblocked by {}", target, actor);
        Ok(())
    }

    pub async fn statistics(&self, window_days: i64) -> Result<UserStatistics, AdminError> {
        let rows = sqlx::query_as::<_, UserView>(r#"SELECT * FROM "Users""#)
            .fetch_all(self.pool)
            .await?;
        Ok(UserStatistics::from_rows(&rows, Utc::now(), window_days))
    }
}
