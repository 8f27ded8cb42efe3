use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Point-in-time observation of an animal's condition
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
#[sqlx(rename_all = "PascalCase")]
pub struct StateRecord {
    pub id: i64,
    pub date: String,
    pub state: String,
    pub severity: Option<String>,
    pub animal_id: i64,
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StateRecordInput {
    pub date: Option<String>,
    pub state: Option<String>,
    pub severity: Option<String>,
    pub animal_id: Option<i64>,
}
