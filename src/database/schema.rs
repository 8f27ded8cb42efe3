// database/schema.rs - idempotent table creation and role seeding
//
// Foreign keys are enforced per connection (see DatabaseManager::connect).
// Deleting an animal removes its clinical records and devices; deleting a
// user removes their animals and devices but keeps the audit trail and
// clinical history with the acting user cleared.

use sqlx::SqlitePool;
use tracing::debug;

use crate::auth::{PRIVILEGED_ROLE_ID, REGULAR_ROLE_ID};
use crate::database::manager::DatabaseError;

const TABLES: &[(&str, &str)] = &[
    (
        "Roles",
        r#"CREATE TABLE IF NOT EXISTS "Roles" (
            "Id"   INTEGER PRIMARY KEY AUTOINCREMENT,
            "Name" TEXT NOT NULL UNIQUE
        )"#,
    ),
    (
        "Users",
        r#"CREATE TABLE IF NOT EXISTS "Users" (
            "Id"           INTEGER PRIMARY KEY AUTOINCREMENT,
            "Name"         TEXT NOT NULL,
            "Email"        TEXT NOT NULL UNIQUE,
            "Password"     TEXT NOT NULL,
            "RoleId"       INTEGER NOT NULL REFERENCES "Roles"("Id"),
            "IsBlocked"    INTEGER NOT NULL DEFAULT 0,
            "BlockReason"  TEXT,
            "LastActivity" TEXT
        )"#,
    ),
    (
        "Animals",
        r#"CREATE TABLE IF NOT EXISTS "Animals" (
            "Id"          INTEGER PRIMARY KEY AUTOINCREMENT,
            "Name"        TEXT NOT NULL,
            "Type"        TEXT NOT NULL,
            "Breed"       TEXT,
            "Age"         INTEGER,
            "Weight"      REAL,
            "Description" TEXT,
            "PhotoURL"    TEXT,
            "UserId"      INTEGER NOT NULL REFERENCES "Users"("Id") ON DELETE CASCADE
        )"#,
    ),
    (
        "MedicalRecords",
        r#"CREATE TABLE IF NOT EXISTS "MedicalRecords" (
            "Id"        INTEGER PRIMARY KEY AUTOINCREMENT,
            "Date"      TEXT NOT NULL,
            "Procedure" TEXT NOT NULL,
            "Notes"     TEXT,
            "AnimalId"  INTEGER NOT NULL REFERENCES "Animals"("Id") ON DELETE CASCADE,
            "UserId"    INTEGER REFERENCES "Users"("Id") ON DELETE SET NULL
        )"#,
    ),
    (
        "Treatments",
        r#"CREATE TABLE IF NOT EXISTS "Treatments" (
            "Id"          INTEGER PRIMARY KEY AUTOINCREMENT,
            "Type"        TEXT NOT NULL,
            "Description" TEXT,
            "AnimalId"    INTEGER NOT NULL REFERENCES "Animals"("Id") ON DELETE CASCADE
        )"#,
    ),
    (
        "StateRecords",
        r#"CREATE TABLE IF NOT EXISTS "StateRecords" (
            "Id"       INTEGER PRIMARY KEY AUTOINCREMENT,
            "Date"     TEXT NOT NULL,
            "State"    TEXT NOT NULL,
            "Severity" TEXT,
            "AnimalId" INTEGER NOT NULL REFERENCES "Animals"("Id") ON DELETE CASCADE,
            "UserId"   INTEGER REFERENCES "Users"("Id") ON DELETE SET NULL
        )"#,
    ),
    (
        "SmartDevices",
        r#"CREATE TABLE IF NOT EXISTS "SmartDevices" (
            "Id"         INTEGER PRIMARY KEY AUTOINCREMENT,
            "DeviceGuid" TEXT NOT NULL UNIQUE,
            "AnimalId"   INTEGER NOT NULL REFERENCES "Animals"("Id") ON DELETE CASCADE,
            "UserId"     INTEGER NOT NULL REFERENCES "Users"("Id") ON DELETE CASCADE
        )"#,
    ),
    (
        "Logs",
        r#"CREATE TABLE IF NOT EXISTS "Logs" (
            "Id"        INTEGER PRIMARY KEY AUTOINCREMENT,
            "Action"    TEXT NOT NULL,
            "Timestamp" TEXT NOT NULL,
            "UserId"    INTEGER REFERENCES "Users"("Id") ON DELETE SET NULL
        )"#,
    ),
];

pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), DatabaseError> {
    for (table, ddl) in TABLES {
        sqlx::query(ddl).execute(pool).await?;
        debug!("Ensured table {}", table);
    }

    sqlx::query(r#"INSERT OR IGNORE INTO "Roles" ("Id", "Name") VALUES (?, 'Admin'), (?, 'Regular')"#)
        .bind(PRIVILEGED_ROLE_ID)
        .bind(REGULAR_ROLE_ID)
        .execute(pool)
        .await?;

    Ok(())
}
