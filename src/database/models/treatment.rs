use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
#[sqlx(rename_all = "PascalCase")]
pub struct Treatment {
    pub id: i64,
    #[serde(rename = "Type")]
    #[sqlx(rename = "Type")]
    pub kind: String,
    pub description: Option<String>,
    pub animal_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TreatmentInput {
    #[serde(rename = "Type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub animal_id: Option<i64>,
}
