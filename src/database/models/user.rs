use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full credential row. Never serialized: the password hash stays server side.
#[derive(Debug, Clone, FromRow)]
#[sqlx(rename_all = "PascalCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role_id: i64,
    pub is_blocked: bool,
    pub block_reason: Option<String>,
    pub last_activity: Option<DateTime<Utc>>,
}

/// User as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
#[sqlx(rename_all = "PascalCase")]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role_id: i64,
    pub is_blocked: bool,
    pub block_reason: Option<String>,
    pub last_activity: Option<DateTime<Utc>>,
}

/// The slice of a user row the auth gate re-reads on every request
#[derive(Debug, Clone, FromRow)]
#[sqlx(rename_all = "PascalCase")]
pub struct UserStatus {
    pub role_id: i64,
    pub is_blocked: bool,
    pub block_reason: Option<String>,
}

/// Body of `POST /api/users/register` and the admin user endpoints.
/// PascalCase is canonical; lowercase / camelCase names are accepted too.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserInput {
    #[serde(alias = "name")]
    pub name: Option<String>,
    #[serde(alias = "email")]
    pub email: Option<String>,
    #[serde(alias = "password")]
    pub password: Option<String>,
    #[serde(alias = "roleId")]
    pub role_id: Option<i64>,
}

/// Body of `POST /api/users/login`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginInput {
    #[serde(alias = "email")]
    pub email: Option<String>,
    #[serde(alias = "password")]
    pub password: Option<String>,
}
