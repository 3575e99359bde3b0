// Restaurant Catalog - Core Library
// Exposes the store, parameter parsing and HTTP API for the server binary,
// the provisioning tool, and tests

pub mod config;
pub mod db;
pub mod entities;
pub mod params;
pub mod store;

// HTTP API is only compiled with the server feature
#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::ServerConfig;
pub use db::{
    CatalogCounts, ImportSummary,
    setup_database, load_restaurants_csv, load_dishes_csv,
    insert_restaurants, insert_dishes, count_rows,
};
pub use entities::{Dish, Flag, Restaurant};
pub use params::{ParamError, RestaurantFilter, DishFilter, parse_flag, parse_id};
pub use store::{CatalogStore, QueryError, SqliteStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
