use axum::{body::Bytes, extract::State};
use serde::{Deserialize, Serialize};

use crate::middleware::{parse_json_or_default, ApiPath, ApiResponse, ApiResult, AuthUser};
use crate::services::{AdminService, UserStatistics};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AdminMessage {
    pub message: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct BlockRequest {
    #[serde(alias = "Reason")]
    pub reason: Option<String>,
}

/// POST /api/admin/block/:id - optional `{ "reason": "..." }`
pub async fn block_post(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    body: Bytes,
) -> ApiResult<AdminMessage> {
    user.require_privileged()?;
    let request: BlockRequest = parse_json_or_default(&body)?;

    let reason = request.reason.filter(|r| !r.trim().is_empty());
    AdminService::new(state.db.pool())
        .block_user(user.user_id, id, reason)
        .await?;
    Ok(ApiResponse::success(AdminMessage { message: "User blocked" }))
}

/// POST /api/admin/unblock/:id
pub async fn unblock_post(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<AdminMessage> {
    user.require_privileged()?;

    AdminService::new(state.db.pool())
        .unblock_user(user.user_id, id)
        .await?;
    Ok(ApiResponse::success(AdminMessage { message: "User unblocked" }))
}

/// GET /api/admin/statistics
pub async fn statistics_get(State(state): State<AppState>, user: AuthUser) -> ApiResult<UserStatistics> {
    user.require_privileged()?;

    let stats = AdminService::new(state.db.pool())
        .statistics(state.config.admin.active_window_days)
        .await?;
    Ok(ApiResponse::success(stats))
}
