//! SERMAC Inventory - purchase registers and stock lines in a local SQLite file
//!
//! The desktop shell talks to [`InventoryService`]; each call opens its own
//! connection and runs one parameterized statement.

pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod service;

pub use config::{default_db_path, DatabaseConfig};
pub use error::{InventoryError, Result};
pub use models::{InventoryItem, NewInventoryItem, PurchaseRecord};
pub use service::InventoryService;
