//! Versioned schema migrations.
//!
//! The schema version lives in SQLite's `PRAGMA user_version`. Each
//! migration is additive: it only creates tables and indexes, never drops
//! or rewrites existing data, so a database at any earlier version can be
//! upgraded in place. Re-running is a no-op.

use sqlx::SqlitePool;

use crate::error::Result;

/// Migrations in application order. Index `n` brings the schema to version `n + 1`.
const MIGRATIONS: &[&[&str]] = &[
    // v1: items
    &[
        r#"
        CREATE TABLE IF NOT EXISTS items (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL DEFAULT '',
            location TEXT NOT NULL DEFAULT '{}',
            category TEXT NOT NULL DEFAULT '',
            note TEXT NOT NULL DEFAULT '',
            photo_url TEXT NOT NULL DEFAULT '',
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_items_name ON items(name)",
        "CREATE INDEX IF NOT EXISTS idx_items_category ON items(category)",
        "CREATE INDEX IF NOT EXISTS idx_items_created_at ON items(created_at DESC)",
        "CREATE INDEX IF NOT EXISTS idx_items_updated_at ON items(updated_at DESC)",
    ],
    // v2: locations
    &[
        r#"
        CREATE TABLE IF NOT EXISTS locations (
            id TEXT PRIMARY KEY,
            area TEXT NOT NULL DEFAULT '',
            place TEXT NOT NULL DEFAULT ''
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_locations_area ON locations(area)",
        "CREATE INDEX IF NOT EXISTS idx_locations_place ON locations(place)",
    ],
];

/// Latest schema version this build knows about.
pub const SCHEMA_VERSION: i64 = MIGRATIONS.len() as i64;

/// Current schema version of the database.
pub async fn schema_version(pool: &SqlitePool) -> Result<i64> {
    let version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await?;
    Ok(version)
}

/// Apply every migration newer than the database's current version.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    migrate_to(pool, SCHEMA_VERSION).await
}

/// Apply migrations up to and including `target`.
///
/// Each version is applied in its own transaction together with the
/// `user_version` bump.
pub async fn migrate_to(pool: &SqlitePool, target: i64) -> Result<()> {
    let current = schema_version(pool).await?;
    let target = target.min(SCHEMA_VERSION);

    for version in (current + 1)..=target {
        let mut tx = pool.begin().await?;
        for statement in MIGRATIONS[(version - 1) as usize] {
            sqlx::query(*statement).execute(&mut *tx).await?;
        }
        // PRAGMA does not accept bound parameters.
        sqlx::query(&format!("PRAGMA user_version = {}", version))
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::info!(version, "applied schema migration");
    }

    Ok(())
}
