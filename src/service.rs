//! Async data service over the local SQLite file
//!
//! Each call opens its own connection, runs one operation from
//! [`crate::database`] on the blocking thread pool, and drops the connection.
//! Nothing is pooled or cached; every read goes back to the file.

use crate::config::DatabaseConfig;
use crate::database::{self, INVENTORY_TABLE, PURCHASE_TABLE};
use crate::error::{InventoryError, Result};
use crate::models::{InventoryItem, NewInventoryItem, PurchaseRecord};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Inventory and purchase register operations for the application shell
#[derive(Debug, Clone)]
pub struct InventoryService {
    db_path: Arc<PathBuf>,
}

impl InventoryService {
    /// Prepares the database file and makes sure both tables exist
    ///
    /// Runs once per service; the schema is not re-validated afterwards.
    pub fn new(config: &DatabaseConfig) -> Result<Self> {
        let path = config.path().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
                log::info!("Created directory: {}", parent.display());
            }
        }

        log::info!("Inventory DB: {}", path.display());
        let conn = open_connection(&path)?;
        database::init_schema(&conn)?;

        Ok(Self {
            db_path: Arc::new(path),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Runs `op` on a fresh connection inside the blocking pool
    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let path = Arc::clone(&self.db_path);
        tokio::task::spawn_blocking(move || {
            let conn = open_connection(&path)?;
            op(&conn)
        })
        .await?
    }

    // ── Purchase registers ─────────────────────────────────────────────────

    /// All purchase registers; callers must not rely on the order
    pub async fn get_all_purchases(&self) -> Result<Vec<PurchaseRecord>> {
        self.run(|conn| Ok(database::get_all_purchases(conn)?)).await
    }

    /// Inserts a purchase register and returns the id SQLite assigned to it
    pub async fn add_purchase(&self, record: &PurchaseRecord) -> Result<i64> {
        let record = record.clone();
        self.run(move |conn| Ok(database::insert_purchase(conn, &record)?))
            .await
    }

    /// Fails with [`InventoryError::NotFound`] when no register has this id
    pub async fn get_purchase(&self, id: i64) -> Result<PurchaseRecord> {
        self.run(move |conn| {
            database::get_purchase_by_id(conn, id)?.ok_or(InventoryError::NotFound {
                table: PURCHASE_TABLE,
                id,
            })
        })
        .await
    }

    /// Overwrites the register with `record.id`; a missing id is a silent no-op
    pub async fn update_purchase(&self, record: &PurchaseRecord) -> Result<()> {
        let record = record.clone();
        self.run(move |conn| {
            if database::update_purchase(conn, &record)? == 0 {
                log::warn!("Update skipped: purchase register #{} does not exist", record.id);
            }
            Ok(())
        })
        .await
    }

    /// Deletes a register; a missing id is a silent no-op
    pub async fn delete_purchase(&self, id: i64) -> Result<()> {
        self.run(move |conn| {
            let removed = database::delete_purchase(conn, id)?;
            log::debug!("Deleted purchase register #{} ({} row(s))", id, removed);
            Ok(())
        })
        .await
    }

    /// Flags a register as processed into inventory
    ///
    /// Idempotent, and accepts ids that do not exist.
    pub async fn mark_processed(&self, id: i64) -> Result<()> {
        self.run(move |conn| {
            if database::mark_purchase_processed(conn, id)? == 0 {
                log::warn!("Process skipped: purchase register #{} does not exist", id);
            } else {
                log::info!("Purchase register #{} marked as processed", id);
            }
            Ok(())
        })
        .await
    }

    // ── Inventory lines ────────────────────────────────────────────────────

    /// All inventory lines; callers must not rely on the order
    pub async fn get_inventory(&self) -> Result<Vec<InventoryItem>> {
        self.run(|conn| Ok(database::get_inventory(conn)?)).await
    }

    /// Inventory lines carrying product code `codigo`
    pub async fn get_inventory_by_code(&self, codigo: &str) -> Result<Vec<InventoryItem>> {
        let codigo = codigo.to_string();
        self.run(move |conn| Ok(database::get_inventory_by_code(conn, &codigo)?))
            .await
    }

    /// Fails with [`InventoryError::NotFound`] when no line has this id
    pub async fn get_inventory_item(&self, id: i64) -> Result<InventoryItem> {
        self.run(move |conn| {
            database::get_inventory_item_by_id(conn, id)?.ok_or(InventoryError::NotFound {
                table: INVENTORY_TABLE,
                id,
            })
        })
        .await
    }

    /// Inserts an inventory line and returns its id
    pub async fn add_product(&self, item: &NewInventoryItem) -> Result<i64> {
        let item = item.clone();
        self.run(move |conn| Ok(database::insert_inventory_item(conn, &item)?))
            .await
    }

    /// Overwrites the line with `item.id`; a missing id is a silent no-op
    pub async fn update_inventory_item(&self, item: &InventoryItem) -> Result<()> {
        let item = item.clone();
        self.run(move |conn| {
            if database::update_inventory_item(conn, &item)? == 0 {
                log::warn!("Update skipped: inventory line #{} does not exist", item.id);
            }
            Ok(())
        })
        .await
    }

    /// Deletes an inventory line; a missing id is a silent no-op
    pub async fn delete_inventory_item(&self, id: i64) -> Result<()> {
        self.run(move |conn| {
            database::delete_inventory_item(conn, id)?;
            Ok(())
        })
        .await
    }

    /// Records a sale against the lines with `codigo`, oldest stock first
    ///
    /// Returns `false`, changing nothing, when the amounts are negative, no
    /// line has the code, or the lines together hold less than the sale.
    pub async fn update_stock(
        &self,
        codigo: &str,
        unidades_vendidas: i64,
        kilos_vendidos: f64,
    ) -> Result<bool> {
        let codigo = codigo.to_string();
        self.run(move |conn| {
            let sold =
                database::decrement_stock(conn, &codigo, unidades_vendidas, kilos_vendidos)?;
            if !sold {
                log::warn!(
                    "Stock for {} not updated ({} units, {} kg requested)",
                    codigo,
                    unidades_vendidas,
                    kilos_vendidos
                );
            }
            Ok(sold)
        })
        .await
    }

    /// Extends the stock date range of the lines with `codigo` to cover `fecha`
    pub async fn update_inventory_dates(&self, codigo: &str, fecha: NaiveDate) -> Result<bool> {
        let codigo = codigo.to_string();
        self.run(move |conn| Ok(database::widen_stock_dates(conn, &codigo, fecha)? > 0))
            .await
    }

    /// Distinct categories in use, alphabetically
    pub async fn get_categories(&self) -> Result<Vec<String>> {
        self.run(|conn| Ok(database::get_categories(conn)?)).await
    }

    /// Distinct subcategories within `categoria`, alphabetically
    pub async fn get_subcategories(&self, categoria: &str) -> Result<Vec<String>> {
        let categoria = categoria.to_string();
        self.run(move |conn| Ok(database::get_subcategories(conn, &categoria)?))
            .await
    }
}

fn open_connection(path: &Path) -> Result<Connection> {
    Ok(Connection::open(path)?)
}
