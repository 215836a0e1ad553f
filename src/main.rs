//! # Home Inventory CLI (`inv`)
//!
//! Command-line front end for the inventory store: add and find items,
//! manage storage locations, and back everything up as JSON.
//!
//! ## Usage
//!
//! ```bash
//! inv --config ./config/inv.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `inv init` | Create the database and apply schema migrations |
//! | `inv add <name>` | Add an item |
//! | `inv list` | List items, newest first |
//! | `inv get <id>` | Show one item |
//! | `inv update <id>` | Change some fields of an item |
//! | `inv delete <id>` | Delete an item |
//! | `inv search "<query>"` | Substring search across item fields |
//! | `inv categories` | List distinct categories |
//! | `inv photo <id>` | Save an item's photo to a file |
//! | `inv clear --yes` | Delete every item |
//! | `inv location add/list/delete` | Manage storage locations |
//! | `inv export <table>` | Export items or locations as JSON |
//! | `inv import <table> <file>` | Replace items or locations from a JSON file |
//! | `inv stats` | Show what's stored |

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use home_inventory::codec;
use home_inventory::config::{self, Config};
use home_inventory::logging;
use home_inventory::photo;
use home_inventory::stats;
use home_inventory::{Inventory, Item, ItemLocation, ItemPatch, NewItem, NewLocation};

const DEFAULT_CONFIG_PATH: &str = "./config/inv.toml";

/// Home Inventory: keep track of what you own and where you put it.
#[derive(Parser)]
#[command(
    name = "inv",
    about = "Home Inventory: keep track of what you own and where you put it",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/inv.toml`. If that file does not exist, a
    /// built-in configuration with the database at
    /// `./data/inventory.sqlite` is used.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Idempotent: running it again only applies migrations that are
    /// missing.
    Init,

    /// Add an item.
    Add {
        /// Item name.
        name: String,

        /// Area the item is kept in (e.g. `Kitchen`).
        #[arg(long)]
        area: String,

        /// Place within the area (e.g. `Top drawer`).
        #[arg(long)]
        place: String,

        #[arg(long, default_value = "")]
        category: String,

        #[arg(long, default_value = "")]
        note: String,

        /// Image file to attach as the item's photo.
        #[arg(long)]
        photo: Option<PathBuf>,
    },

    /// List items, newest first.
    List {
        /// Only items in this category.
        #[arg(long)]
        category: Option<String>,
    },

    /// Show a single item.
    Get {
        /// Item id.
        id: String,
    },

    /// Update some fields of an item.
    ///
    /// Fields that are not given keep their current value.
    Update {
        /// Item id.
        id: String,

        #[arg(long)]
        name: Option<String>,

        /// New area; must be given together with `--place`.
        #[arg(long, requires = "place")]
        area: Option<String>,

        /// New place; must be given together with `--area`.
        #[arg(long, requires = "area")]
        place: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        note: Option<String>,

        /// Replace the photo with this image file.
        #[arg(long, conflicts_with = "remove_photo")]
        photo: Option<PathBuf>,

        /// Remove the photo.
        #[arg(long)]
        remove_photo: bool,
    },

    /// Delete an item.
    Delete {
        /// Item id.
        id: String,
    },

    /// Search items by name, location, note or category.
    Search {
        /// Case-insensitive substring. An empty query lists everything.
        query: String,
    },

    /// List the distinct item categories.
    Categories,

    /// Write an item's photo to a file.
    Photo {
        /// Item id.
        id: String,

        /// Destination file, or a directory to write `<id>.<ext>` into.
        #[arg(long, short)]
        output: PathBuf,
    },

    /// Delete every item. Locations are kept.
    Clear {
        /// Confirm that all items should be deleted.
        #[arg(long)]
        yes: bool,
    },

    /// Manage storage locations.
    Location {
        #[command(subcommand)]
        action: LocationAction,
    },

    /// Export a table as pretty-printed JSON.
    ///
    /// Writes to stdout unless `--output` is given. If `--output` is a
    /// directory, the file is named `home-inventory-YYYY-MM-DD.json` for
    /// items and `locations.json` for locations.
    Export {
        table: TableKind,

        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Replace a table with the contents of a JSON export.
    ///
    /// The existing table is cleared before the new records are written.
    Import {
        table: TableKind,

        /// JSON file containing an array of records.
        file: PathBuf,
    },

    /// Show inventory statistics.
    Stats,
}

#[derive(Subcommand)]
enum LocationAction {
    /// Add a storage location.
    Add { area: String, place: String },
    /// List storage locations.
    List,
    /// Delete a storage location. Items are not affected.
    Delete { id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum TableKind {
    Items,
    Locations,
}

impl TableKind {
    fn name(self) -> &'static str {
        match self {
            TableKind::Items => "items",
            TableKind::Locations => "locations",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = resolve_config(cli.config.as_deref())?;
    logging::init(&cfg.log.filter, cli.verbose)?;

    let inventory = Inventory::open(&cfg)
        .await
        .with_context(|| format!("Failed to open database: {}", cfg.db.path.display()))?;

    let result = run(&cli.command, &cfg, &inventory).await;
    inventory.close().await;
    result
}

fn resolve_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => config::load_config(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.exists() {
                config::load_config(default)
            } else {
                Ok(Config::minimal())
            }
        }
    }
}

async fn run(command: &Commands, cfg: &Config, inventory: &Inventory) -> Result<()> {
    let items = inventory.items();
    let locations = inventory.locations();

    match command {
        Commands::Init => {
            println!(
                "Database initialized successfully (schema v{}).",
                inventory.schema_version().await?
            );
        }
        Commands::Add {
            name,
            area,
            place,
            category,
            note,
            photo: photo_path,
        } => {
            let mut data = NewItem::new(name.clone(), ItemLocation::new(area.clone(), place.clone()))
                .with_category(category.clone())
                .with_note(note.clone());
            if let Some(path) = photo_path {
                data = data.with_photo_url(photo::encode_file(path, cfg.photos.max_bytes)?);
            }
            data.validate()?;

            let item = items.add(data).await?;
            println!("Added item {}", item.id);
        }
        Commands::List { category } => {
            let listed = match category {
                Some(category) => items.by_category(category).await?,
                None => items.list().await?,
            };
            print_item_table(&listed);
        }
        Commands::Get { id } => {
            let item = items
                .get(id)
                .await?
                .with_context(|| format!("item not found: {}", id))?;
            print_item(&item);
        }
        Commands::Update {
            id,
            name,
            area,
            place,
            category,
            note,
            photo: photo_path,
            remove_photo,
        } => {
            let photo_url = match (photo_path, *remove_photo) {
                (Some(path), _) => Some(photo::encode_file(path, cfg.photos.max_bytes)?),
                (None, true) => Some(String::new()),
                (None, false) => None,
            };
            let location = match (area, place) {
                (Some(area), Some(place)) => Some(ItemLocation::new(area.clone(), place.clone())),
                _ => None,
            };
            let patch = ItemPatch {
                name: name.clone(),
                location,
                category: category.clone(),
                note: note.clone(),
                photo_url,
            };
            if patch.is_empty() {
                bail!("nothing to update: pass at least one field");
            }
            patch.validate()?;

            let item = items.update(id, patch).await?;
            println!("Updated item {}", item.id);
        }
        Commands::Delete { id } => {
            items.delete(id).await?;
            println!("Deleted item {}", id);
        }
        Commands::Search { query } => {
            let found = items.search(query).await?;
            print_item_table(&found);
        }
        Commands::Categories => {
            for category in items.categories().await? {
                println!("{}", category);
            }
        }
        Commands::Photo { id, output } => {
            let item = items
                .get(id)
                .await?
                .with_context(|| format!("item not found: {}", id))?;
            if item.photo_url.is_empty() {
                bail!("item {} has no photo", id);
            }
            let (mime, bytes) = photo::decode_data_uri(&item.photo_url)?;
            let path = if output.is_dir() {
                output.join(format!("{}.{}", item.id, photo::extension_for(&mime)))
            } else {
                output.clone()
            };
            std::fs::write(&path, &bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Saved photo to {}", path.display());
        }
        Commands::Clear { yes } => {
            if !yes {
                bail!("refusing to delete every item without --yes");
            }
            items.clear().await?;
            println!("All items deleted.");
        }
        Commands::Location { action } => match action {
            LocationAction::Add { area, place } => {
                let data = NewLocation::new(area.clone(), place.clone());
                data.validate()?;
                let location = locations.add(data).await?;
                println!("Added location {}", location.id);
            }
            LocationAction::List => {
                let all = locations.list().await?;
                if all.is_empty() {
                    println!("No locations.");
                }
                for location in &all {
                    println!("{}  {} / {}", location.id, location.area, location.place);
                }
            }
            LocationAction::Delete { id } => {
                locations.delete(id).await?;
                println!("Deleted location {}", id);
            }
        },
        Commands::Export { table, output } => {
            let (json, count) = match table {
                TableKind::Items => (items.export().await?, items.count().await?),
                TableKind::Locations => (locations.export().await?, locations.count().await?),
            };
            match output {
                Some(path) => {
                    let path = if path.is_dir() {
                        let today = chrono::Local::now().date_naive();
                        path.join(codec::default_export_filename(table.name(), today))
                    } else {
                        path.clone()
                    };
                    if let Some(parent) = path.parent() {
                        if !parent.as_os_str().is_empty() {
                            std::fs::create_dir_all(parent)?;
                        }
                    }
                    std::fs::write(&path, &json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    eprintln!("Exported {} {} to {}", count, table.name(), path.display());
                }
                None => {
                    println!("{}", json);
                }
            }
        }
        Commands::Import { table, file } => {
            if file.extension().and_then(|e| e.to_str()) != Some("json") {
                bail!("import file must be a .json file: {}", file.display());
            }
            let json = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let count = match table {
                TableKind::Items => items.import(&json).await?,
                TableKind::Locations => locations.import(&json).await?,
            };
            println!("Imported {} {}.", count, table.name());
        }
        Commands::Stats => {
            let summary = stats::inventory_stats(inventory).await?;
            let db_size = std::fs::metadata(&cfg.db.path)
                .map(|m| m.len())
                .unwrap_or(0);

            println!("Home Inventory Stats");
            println!("====================");
            println!();
            println!("  Database:      {}", cfg.db.path.display());
            println!("  Size:          {}", stats::format_bytes(db_size));
            println!("  Schema:        v{}", summary.schema_version);
            println!();
            println!("  Items:         {}", summary.items);
            println!("  Locations:     {}", summary.locations);
            println!("  Categories:    {}", summary.categories);
            println!("  With photo:    {}", summary.items_with_photo);
            println!("  Uncategorized: {}", summary.uncategorized_items);
            println!("  No location:   {}", summary.items_without_location);

            let breakdown = stats::category_breakdown(inventory).await?;
            if !breakdown.is_empty() {
                println!();
                println!("  {:<32} {:>6}", "CATEGORY", "ITEMS");
                println!("  {}", "-".repeat(39));
                for entry in &breakdown {
                    println!("  {:<32} {:>6}", entry.category, entry.items);
                }
            }
            println!();
        }
    }

    Ok(())
}

fn print_item_table(items: &[Item]) {
    if items.is_empty() {
        println!("No items found.");
        return;
    }
    for item in items {
        let category = if item.category.is_empty() {
            String::new()
        } else {
            format!("  [{}]", item.category)
        };
        println!("{}  {}  @ {}{}", item.id, item.name, item.location, category);
    }
    println!();
    println!("{} item{}", items.len(), if items.len() == 1 { "" } else { "s" });
}

fn print_item(item: &Item) {
    println!("id:          {}", item.id);
    println!("name:        {}", item.name);
    println!("area:        {}", item.location.area);
    println!("place:       {}", item.location.place);
    if !item.category.is_empty() {
        println!("category:    {}", item.category);
    }
    if !item.note.is_empty() {
        println!("note:        {}", item.note);
    }
    let photo = match photo::decode_data_uri(&item.photo_url) {
        Ok((mime, bytes)) => format!("{} ({})", mime, stats::format_bytes(bytes.len() as u64)),
        Err(_) if item.photo_url.is_empty() => "none".to_string(),
        Err(_) => "unreadable".to_string(),
    };
    println!("photo:       {}", photo);
    println!("created_at:  {}", item.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("updated_at:  {}", item.updated_at.format("%Y-%m-%d %H:%M:%S"));
}
