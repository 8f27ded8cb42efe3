use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
#[sqlx(rename_all = "PascalCase")]
pub struct SmartDevice {
    pub id: i64,
    pub device_guid: String,
    pub animal_id: i64,
    pub user_id: i64,
}

/// Older clients send `deviceGuid` / `dogId`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SmartDeviceInput {
    #[serde(alias = "deviceGuid")]
    pub device_guid: Option<String>,
    #[serde(alias = "dogId")]
    pub animal_id: Option<i64>,
}
