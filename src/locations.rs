//! Location repository over the `locations` table.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::codec;
use crate::error::Result;
use crate::models::{Location, NewLocation};
use crate::store::Table;

pub struct LocationRepository {
    pool: SqlitePool,
}

impl LocationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn add(&self, data: NewLocation) -> Result<Location> {
        let location = Location::new(data);
        self.insert_location(&location).await?;
        tracing::debug!(id = %location.id, area = %location.area, place = %location.place, "added location");
        Ok(location)
    }

    /// All locations in storage order. No particular ordering is promised.
    pub async fn list(&self) -> Result<Vec<Location>> {
        let rows = sqlx::query("SELECT id, area, place FROM locations")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(location_from_row).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Location>> {
        let row = sqlx::query("SELECT id, area, place FROM locations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(location_from_row))
    }

    /// Remove a location. Items that refer to the same area/place are left
    /// alone, and deleting an unknown id is not an error.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM locations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        tracing::debug!(id, removed = result.rows_affected(), "deleted location");
        Ok(())
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM locations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM locations")
            .execute(&self.pool)
            .await?;
        tracing::info!("cleared all locations");
        Ok(())
    }

    pub async fn export(&self) -> Result<String> {
        codec::export(self).await
    }

    pub async fn import(&self, json: &str) -> Result<usize> {
        codec::import(self, json).await
    }

    async fn insert_location(&self, location: &Location) -> Result<()> {
        sqlx::query("INSERT INTO locations (id, area, place) VALUES (?, ?, ?)")
            .bind(&location.id)
            .bind(&location.area)
            .bind(&location.place)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Table for LocationRepository {
    type Record = Location;

    const NAME: &'static str = "locations";

    async fn all(&self) -> Result<Vec<Location>> {
        self.list().await
    }

    async fn clear(&self) -> Result<()> {
        LocationRepository::clear(self).await
    }

    async fn insert(&self, record: &Location) -> Result<()> {
        self.insert_location(record).await
    }

    fn reconstruct(value: &Value) -> Location {
        Location::reconstruct(value)
    }
}

fn location_from_row(row: &SqliteRow) -> Location {
    Location {
        id: row.get("id"),
        area: row.get("area"),
        place: row.get("place"),
    }
}
