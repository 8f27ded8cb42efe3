// services/audit.rs - append-only Logs entries for security relevant mutations
//
// Entries are written on the caller's connection so they commit or roll back
// together with the mutation they describe.

use chrono::{SecondsFormat, Utc};
use sqlx::SqliteConnection;

use crate::database::models::Log;
use crate::database::{DatabaseError, Record, Repository};

pub const LOGS_TABLE: &str = "Logs";

/// Newest entries first
pub const LOGS_ORDER: &str = r#""Timestamp" DESC, "Id" DESC"#;

/// Fixed-width UTC timestamp so text ordering matches time ordering
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Action text in the form `"<verb> <Entity> #<id>"`
pub fn action(verb: &str, entity: &str, id: i64) -> String {
    format!("{} {} #{}", verb, entity, id)
}

/// Append one entry, returning its id
pub async fn record(
    conn: &mut SqliteConnection,
    user_id: Option<i64>,
    action: &str,
) -> Result<i64, DatabaseError> {
    let entry = Record::new()
        .set("Action", action)
        .set("Timestamp", timestamp())
        .set("UserId", user_id);

    let id = Repository::<Log>::new(LOGS_TABLE, LOGS_ORDER).insert(conn, &entry).await?;
    tracing::debug!("Audit #{}: {} (user {:?})", id, action, user_id);
    Ok(id)
}
