//! # Home Inventory
//!
//! A local-first tracker for the things in your house and where they are.
//!
//! Items and named storage locations live in a local SQLite database. The
//! library exposes a repository per table (CRUD, substring search, category
//! aggregation) plus whole-table JSON import/export; the `inv` binary is a
//! thin CLI over it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────────────┐   ┌──────────┐
//! │   CLI    │──▶│ ItemRepository       │──▶│  SQLite   │
//! │  (inv)   │   │ LocationRepository   │   │ items     │
//! └──────────┘   └──────────┬───────────┘   │ locations │
//!                           │               └──────────┘
//!                           ▼
//!                    ┌─────────────┐
//!                    │ JSON codec  │
//!                    └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! inv init
//! inv location add Kitchen "Top drawer"
//! inv add "Bottle opener" --area Kitchen --place "Top drawer" --category Tools
//! inv search drawer
//! inv export items --output ./backups/
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Items, locations and their constructors |
//! | [`store`] | Inventory handle and table abstraction |
//! | [`items`] | Item repository |
//! | [`locations`] | Location repository |
//! | [`codec`] | JSON import/export |
//! | [`photo`] | Photo `data:` URI encoding |
//! | [`stats`] | Inventory statistics |
//! | [`db`] | Database connection |
//! | [`migrate`] | Versioned schema migrations |

pub mod codec;
pub mod config;
pub mod db;
pub mod error;
pub mod items;
pub mod locations;
pub mod logging;
pub mod migrate;
pub mod models;
pub mod photo;
pub mod stats;
pub mod store;

pub use error::{InventoryError, Result};
pub use models::{Item, ItemLocation, ItemPatch, Location, NewItem, NewLocation};
pub use store::{Inventory, Table};
