use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::state::AppState;

use super::auth::AuthUser;

/// Stamp `LastActivity` for the authenticated caller without holding up the request
pub async fn activity_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Some(user) = request.extensions().get::<AuthUser>().copied() {
        let pool = state.db.pool().clone();
        tokio::spawn(async move {
            let result = sqlx::query(r#"UPDATE "Users" SET "LastActivity" = ? WHERE "Id" = ?"#)
                .bind(Utc::now())
                .bind(user.user_id)
                .execute(&pool)
                .await;
            if let Err(e) = result {
                tracing::warn!("Failed to record activity for user {}: {}", user.user_id, e);
            }
        });
    }

    next.run(request).await
}
