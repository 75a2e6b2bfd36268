//! Durable key-value layer.
//!
//! The `_minipm_store` table holds three keys: the projects collection, the
//! tasks collection, and the dark-mode flag. Values are JSON text, so the
//! stored form stays human-readable and self-describing. The table is created
//! automatically by [`StoreBuilder::build()`](crate::StoreBuilder::build).

use sea_orm::{ConnectionTrait, DatabaseBackend, DbErr, FromQueryResult, Statement};

pub const PROJECTS_KEY: &str = "projects";
pub const TASKS_KEY: &str = "tasks";
pub const DARK_MODE_KEY: &str = "darkMode";

pub const ALL_KEYS: [&str; 3] = [PROJECTS_KEY, TASKS_KEY, DARK_MODE_KEY];

/// Create the `_minipm_store` table if it does not already exist.
pub async fn create_store_table(db: &impl ConnectionTrait) -> Result<(), DbErr> {
    db.execute_unprepared(
        "CREATE TABLE IF NOT EXISTS _minipm_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
    )
    .await?;
    Ok(())
}

#[derive(Debug, FromQueryResult)]
struct ValueRow {
    value: String,
}

/// Read one key's raw JSON text, `None` when the key has never been written.
pub async fn load(db: &impl ConnectionTrait, key: &str) -> Result<Option<String>, DbErr> {
    let row = ValueRow::find_by_statement(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "SELECT value FROM _minipm_store WHERE key = $1",
        [key.into()],
    ))
    .one(db)
    .await?;
    Ok(row.map(|r| r.value))
}

/// Upsert one key's JSON text (full overwrite — each write carries the whole
/// collection snapshot, so the last write to land wins).
pub async fn save(db: &impl ConnectionTrait, key: &str, value: &str) -> Result<(), DbErr> {
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT OR REPLACE INTO _minipm_store (key, value) VALUES ($1, $2)",
        [key.into(), value.into()],
    ))
    .await?;
    Ok(())
}

/// Delete one key.
pub async fn remove(db: &impl ConnectionTrait, key: &str) -> Result<(), DbErr> {
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "DELETE FROM _minipm_store WHERE key = $1",
        [key.into()],
    ))
    .await?;
    Ok(())
}
