//! Error types for the inventory library.
//!
//! Repository operations return [`InventoryError`]. The CLI wraps these in
//! `anyhow` and prints them once; nothing is retried.

use thiserror::Error;

/// Result type alias for inventory operations.
pub type Result<T> = std::result::Result<T, InventoryError>;

#[derive(Error, Debug)]
pub enum InventoryError {
    /// Operation on an id that is not in the table.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Import payload could not be parsed or is not a JSON array.
    #[error("invalid import data: {0}")]
    Format(String),

    /// Rejected user input (blank required field, bad photo file).
    #[error("invalid input: {0}")]
    Invalid(String),

    /// Underlying database failure, passed through unmodified.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl InventoryError {
    pub(crate) fn item_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "item",
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }
}
