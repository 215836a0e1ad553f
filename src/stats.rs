//! Inventory statistics.
//!
//! A quick summary of what's stored: item and location counts, category
//! coverage, photo coverage, items with no location and schema version. Used by `inv stats`.

use serde::Serialize;
use sqlx::Row;

use crate::error::Result;
use crate::store::Inventory;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InventoryStats {
    pub items: i64,
    pub locations: i64,
    pub categories: i64,
    pub items_with_photo: i64,
    pub uncategorized_items: i64,
    /// Items whose area and place are both empty, including legacy rows
    /// whose stored location was not an object.
    pub items_without_location: i64,
    pub schema_version: i64,
}

/// Per-category item count, largest first.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub items: i64,
}

pub async fn inventory_stats(inventory: &Inventory) -> Result<InventoryStats> {
    let pool = inventory.pool();

    let row = sqlx::query(
        r#"
        SELECT
            COUNT(*) AS items,
            COUNT(DISTINCT NULLIF(category, '')) AS categories,
            COALESCE(SUM(photo_url <> ''), 0) AS items_with_photo,
            COALESCE(SUM(category = ''), 0) AS uncategorized_items
        FROM items
        "#,
    )
    .fetch_one(pool)
    .await?;

    let locations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM locations")
        .fetch_one(pool)
        .await?;

    // The location column may hold legacy non-object JSON, so decode rows
    // instead of counting in SQL.
    let items_without_location = inventory
        .items()
        .list()
        .await?
        .iter()
        .filter(|item| item.location.is_empty())
        .count() as i64;

    Ok(InventoryStats {
        items: row.get("items"),
        locations,
        categories: row.get("categories"),
        items_with_photo: row.get("items_with_photo"),
        uncategorized_items: row.get("uncategorized_items"),
        items_without_location,
        schema_version: inventory.schema_version().await?,
    })
}

pub async fn category_breakdown(inventory: &Inventory) -> Result<Vec<CategoryCount>> {
    let rows = sqlx::query(
        r#"
        SELECT category, COUNT(*) AS items
        FROM items
        WHERE category <> ''
        GROUP BY category
        ORDER BY items DESC, category ASC
        "#,
    )
    .fetch_all(inventory.pool())
    .await?;

    Ok(rows
        .iter()
        .map(|row| CategoryCount {
            category: row.get("category"),
            items: row.get("items"),
        })
        .collect())
}

/// Format a byte count as a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
