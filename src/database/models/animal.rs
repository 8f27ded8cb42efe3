use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Columns are named one by one: `PhotoURL` does not survive PascalCase renaming.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct Animal {
    #[sqlx(rename = "Id")]
    pub id: i64,
    #[sqlx(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    #[sqlx(rename = "Type")]
    pub kind: String,
    #[sqlx(rename = "Breed")]
    pub breed: Option<String>,
    #[sqlx(rename = "Age")]
    pub age: Option<i64>,
    #[sqlx(rename = "Weight")]
    pub weight: Option<f64>,
    #[sqlx(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "PhotoURL")]
    #[sqlx(rename = "PhotoURL")]
    pub photo_url: Option<String>,
    #[sqlx(rename = "UserId")]
    pub user_id: i64,
}

/// Owner is always the caller; a `UserId` in the body is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnimalInput {
    pub name: Option<String>,
    #[serde(rename = "Type")]
    pub kind: Option<String>,
    pub breed: Option<String>,
    pub age: Option<i64>,
    pub weight: Option<f64>,
    pub description: Option<String>,
    #[serde(rename = "PhotoURL", alias = "PhotoUrl")]
    pub photo_url: Option<String>,
}
