use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
#[sqlx(rename_all = "PascalCase")]
pub struct MedicalRecord {
    pub id: i64,
    pub date: String,
    pub procedure: String,
    pub notes: Option<String>,
    pub animal_id: i64,
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MedicalRecordInput {
    pub date: Option<String>,
    pub procedure: Option<String>,
    pub notes: Option<String>,
    pub animal_id: Option<i64>,
}
