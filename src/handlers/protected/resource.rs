// handlers/protected/resource.rs - shared CRUD template for every table-backed resource
//
// Each entity implements `Resource` (table, required fields, access rules) and
// gets list/get/create/update/delete handlers plus routes from here.

use async_trait::async_trait;
use axum::{body::Bytes, extract::State, routing::get, Router};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::FromRow;

use crate::database::{OwnerScope, Record, Repository};
use crate::error::ApiError;
use crate::middleware::{parse_json, ApiPath, ApiResponse, ApiResult, AuthUser, Created};
use crate::services::audit;
use crate::state::AppState;
use crate::types::Operation;

#[async_trait]
pub trait Resource: Send + Sync + 'static {
    /// Table name, e.g. `Animals`
    const TABLE: &'static str;
    /// Singular label used in messages and audit actions, e.g. `Animal`
    const NAME: &'static str;
    /// Column holding the owning user's id; rows are only visible to that user
    const OWNER_COLUMN: Option<&'static str> = None;
    /// Whether mutations append an audit log entry
    const AUDITED: bool = false;
    const ORDER_BY: &'static str = r#""Id" ASC"#;

    type Row: for<'r> FromRow<'r, SqliteRow> + Serialize + Send + Unpin + 'static;
    type Input: DeserializeOwned + Send + 'static;

    /// Role checks; run before any storage access
    fn authorize(_op: Operation, _user: &AuthUser) -> Result<(), ApiError> {
        Ok(())
    }

    /// Per-row restrictions decided from the id alone
    fn check_target(_op: Operation, _id: i64) -> Result<(), ApiError> {
        Ok(())
    }

    /// Validate the body and turn it into the columns to write
    async fn prepare(state: &AppState, user: &AuthUser, input: Self::Input) -> Result<Record, ApiError>;
}

fn repository<R: Resource>() -> Repository<R::Row> {
    Repository::new(R::TABLE, R::ORDER_BY)
}

fn owner_scope<R: Resource>(user: &AuthUser) -> OwnerScope {
    R::OWNER_COLUMN.map(|column| (column, user.user_id))
}

fn not_found<R: Resource>() -> ApiError {
    ApiError::not_found(format!("{} not found", R::NAME))
}

/// GET /api/<resource>
pub async fn list<R: Resource>(State(state): State<AppState>, user: AuthUser) -> ApiResult<Vec<R::Row>> {
    R::authorize(Operation::List, &user)?;

    let rows = repository::<R>()
        .select_all(state.db.pool(), owner_scope::<R>(&user))
        .await?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/<resource>/:id
pub async fn show<R: Resource>(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<R::Row> {
    R::authorize(Operation::Get, &user)?;
    R::check_target(Operation::Get, id)?;

    let row = repository::<R>()
        .select_one(state.db.pool(), id, owner_scope::<R>(&user))
        .await?
        .ok_or_else(not_found::<R>)?;
    Ok(ApiResponse::success(row))
}

/// POST /api/<resource> - 201 `{"id": n}`
pub async fn create<R: Resource>(
    State(state): State<AppState>,
    user: AuthUser,
    body: Bytes,
) -> ApiResult<Created> {
    R::authorize(Operation::Create, &user)?;
    let input: R::Input = parse_json(&body)?;

    let mut record = R::prepare(&state, &user, input).await?;
    if let Some(column) = R::OWNER_COLUMN {
        record = record.set(column, user.user_id);
    }

    let mut tx = state.db.pool().begin().await?;
    let id = repository::<R>().insert(&mut *tx, &record).await?;
    if R::AUDITED {
        audit::record(&mut *tx, Some(user.user_id), &audit_action::<R>("create", id)).await?;
    }
    tx.commit().await?;

    tracing::debug!("User {} created {} #{}", user.user_id, R::NAME, id);
    Ok(ApiResponse::created(Created { id }))
}

/// PUT /api/<resource>/:id - full replace, 204 or 404
pub async fn update<R: Resource>(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    body: Bytes,
) -> ApiResult<()> {
    R::authorize(Operation::Update, &user)?;
    R::check_target(Operation::Update, id)?;
    let input: R::Input = parse_json(&body)?;

    let record = R::prepare(&state, &user, input).await?;

    let mut tx = state.db.pool().begin().await?;
    let changed = repository::<R>()
        .update(&mut *tx, id, owner_scope::<R>(&user), &record)
        .await?;
    if changed == 0 {
        return Err(not_found::<R>());
    }
    if R::AUDITED {
        audit::record(&mut *tx, Some(user.user_id), &audit_action::<R>("update", id)).await?;
    }
    tx.commit().await?;

    Ok(ApiResponse::no_content())
}

/// DELETE /api/<resource>/:id - 204 or 404
pub async fn destroy<R: Resource>(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<()> {
    R::authorize(Operation::Delete, &user)?;
    R::check_target(Operation::Delete, id)?;

    let mut tx = state.db.pool().begin().await?;
    // Entry goes in first: the actor may be the row being removed, and the
    // cascade nulls the entry's UserId.
    if R::AUDITED {
        audit::record(&mut *tx, Some(user.user_id), &audit_action::<R>("delete", id)).await?;
    }
    let removed = repository::<R>()
        .delete(&mut *tx, id, owner_scope::<R>(&user))
        .await?;
    if removed == 0 {
        return Err(not_found::<R>());
    }
    tx.commit().await?;

    tracing::debug!("User {} deleted {} #{}", user.user_id, R::NAME, id);
    Ok(ApiResponse::no_content())
}

fn audit_action<R: Resource>(verb: &str, id: i64) -> String {
    audit::action(verb, R::NAME, id)
}

/// Collection and item routes for `R` mounted at `path`
pub fn routes<R: Resource>(path: &str) -> Router<AppState> {
    Router::new()
        .route(path, get(list::<R>).post(create::<R>))
        .route(
            &format!("{}/:id", path),
            get(show::<R>).put(update::<R>).delete(destroy::<R>),
        )
}
