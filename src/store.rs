//! The inventory store handle and the table abstraction shared by the
//! repositories.
//!
//! An [`Inventory`] is constructed explicitly from a [`Config`] (or an
//! existing pool) and handed to whatever needs it. There is no global
//! database handle: open it, use its repositories, and [`close`](Inventory::close)
//! it when done.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;
use crate::error::Result;
use crate::items::ItemRepository;
use crate::locations::LocationRepository;
use crate::migrate;

/// One entity table that can be listed, cleared and bulk-loaded.
///
/// Both repositories implement this so the import/export codec in
/// [`crate::codec`] is written once.
#[async_trait]
pub trait Table: Send + Sync {
    /// Entity stored in this table.
    type Record: Serialize + Send + Sync;

    /// Human-readable table name used in log output.
    const NAME: &'static str;

    /// Every record, in the table's natural listing order.
    async fn all(&self) -> Result<Vec<Self::Record>>;

    /// Delete every record.
    async fn clear(&self) -> Result<()>;

    /// Insert one fully-formed record, keeping its id and timestamps.
    async fn insert(&self, record: &Self::Record) -> Result<()>;

    /// Rebuild a record from untrusted JSON, default-filling missing fields.
    fn reconstruct(value: &Value) -> Self::Record;
}

/// An opened, migrated inventory database.
#[derive(Clone)]
pub struct Inventory {
    pool: SqlitePool,
}

impl Inventory {
    /// Connect to the configured database and bring its schema up to date.
    pub async fn open(config: &Config) -> Result<Self> {
        let pool = db::connect(config).await?;
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, applying any pending migrations.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        migrate::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    pub fn items(&self) -> ItemRepository {
        ItemRepository::new(self.pool.clone())
    }

    pub fn locations(&self) -> LocationRepository {
        LocationRepository::new(self.pool.clone())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn schema_version(&self) -> Result<i64> {
        migrate::schema_version(&self.pool).await
    }

    /// Close every pooled connection. Repositories handed out earlier stop
    /// working after this.
    pub async fn close(self) {
        self.pool.close().await;
    }
}
