//! Item repository: CRUD, search and category queries over the `items` table.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::collections::BTreeSet;

use crate::codec;
use crate::error::{InventoryError, Result};
use crate::models::{from_millis, next_update_time, Item, ItemLocation, ItemPatch, NewItem};
use crate::store::Table;

const SELECT_ITEMS: &str = "SELECT id, name, location, category, note, photo_url, created_at, updated_at FROM items";

pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a new item with a generated id and timestamps.
    pub async fn add(&self, data: NewItem) -> Result<Item> {
        let item = Item::new(data);
        self.insert_item(&item).await?;
        tracing::debug!(id = %item.id, name = %item.name, "added item");
        Ok(item)
    }

    /// All items, newest first.
    pub async fn list(&self) -> Result<Vec<Item>> {
        let rows = sqlx::query(&format!("{} ORDER BY created_at DESC, rowid DESC", SELECT_ITEMS))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(item_from_row).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Item>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_ITEMS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(item_from_row))
    }

    /// Merge `patch` into the stored item and write the whole record back.
    ///
    /// `updated_at` always moves strictly forward. Fails with
    /// [`InventoryError::NotFound`] if no item has this id.
    pub async fn update(&self, id: &str, patch: ItemPatch) -> Result<Item> {
        let mut item = self
            .get(id)
            .await?
            .ok_or_else(|| InventoryError::item_not_found(id))?;

        patch.apply(&mut item);
        item.updated_at = next_update_time(item.updated_at);

        let result = sqlx::query(
            r#"
            UPDATE items
            SET name = ?, location = ?, category = ?, note = ?, photo_url = ?,
                created_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&item.name)
        .bind(item.location.to_stored())
        .bind(&item.category)
        .bind(&item.note)
        .bind(&item.photo_url)
        .bind(item.created_at.timestamp_millis())
        .bind(item.updated_at.timestamp_millis())
        .bind(&item.id)
        .execute(&self.pool)
        .await?;

        // Deleted between the read and the write.
        if result.rows_affected() == 0 {
            return Err(InventoryError::item_not_found(id));
        }

        tracing::debug!(id = %item.id, "updated item");
        Ok(item)
    }

    /// Remove an item. Deleting an unknown id is not an error.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        tracing::debug!(id, removed = result.rows_affected(), "deleted item");
        Ok(())
    }

    /// Case-insensitive substring search over name, area, place, note and
    /// category.
    ///
    /// This loads every item and filters in memory, so it is O(n) in the
    /// size of the inventory and never uses an index. Fine for a household;
    /// a large collection would need a full-text index instead. An empty
    /// query matches everything.
    pub async fn search(&self, query: &str) -> Result<Vec<Item>> {
        let needle = query.to_lowercase();
        let items = self.list().await?;
        Ok(items.into_iter().filter(|item| item.matches(&needle)).collect())
    }

    /// Distinct non-empty categories, sorted.
    pub async fn categories(&self) -> Result<Vec<String>> {
        let items = self.list().await?;
        let categories: BTreeSet<String> = items
            .into_iter()
            .map(|item| item.category)
            .filter(|category| !category.is_empty())
            .collect();
        Ok(categories.into_iter().collect())
    }

    /// Items with exactly this category, via the category index.
    pub async fn by_category(&self, category: &str) -> Result<Vec<Item>> {
        let rows = sqlx::query(&format!(
            "{} WHERE category = ? ORDER BY created_at DESC, rowid DESC",
            SELECT_ITEMS
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(item_from_row).collect())
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Delete every item.
    pub async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM items").execute(&self.pool).await?;
        tracing::info!("cleared all items");
        Ok(())
    }

    /// Pretty-printed JSON array of every item.
    pub async fn export(&self) -> Result<String> {
        codec::export(self).await
    }

    /// Replace the whole table with the items in `json`.
    ///
    /// See [`codec::import`] for the exact ordering and failure behavior.
    pub async fn import(&self, json: &str) -> Result<usize> {
        codec::import(self, json).await
    }

    async fn insert_item(&self, item: &Item) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO items (id, name, location, category, note, photo_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(item.location.to_stored())
        .bind(&item.category)
        .bind(&item.note)
        .bind(&item.photo_url)
        .bind(item.created_at.timestamp_millis())
        .bind(item.updated_at.timestamp_millis())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Table for ItemRepository {
    type Record = Item;

    const NAME: &'static str = "items";

    async fn all(&self) -> Result<Vec<Item>> {
        self.list().await
    }

    async fn clear(&self) -> Result<()> {
        ItemRepository::clear(self).await
    }

    async fn insert(&self, record: &Item) -> Result<()> {
        self.insert_item(record).await
    }

    fn reconstruct(value: &Value) -> Item {
        Item::reconstruct(value)
    }
}

fn item_from_row(row: &SqliteRow) -> Item {
    let location: String = row.get("location");
    Item {
        id: row.get("id"),
        name: row.get("name"),
        location: ItemLocation::from_stored(&location),
        category: row.get("category"),
        note: row.get("note"),
        photo_url: row.get("photo_url"),
        created_at: from_millis(row.get("created_at")),
        updated_at: from_millis(row.get("updated_at")),
    }
}
