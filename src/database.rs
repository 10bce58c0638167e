//! SQL statements for the inventory and purchase register tables
//!
//! Every function runs one parameterized statement against the given
//! connection, except [`decrement_stock`], which spreads a sale over several
//! lines inside one transaction. Values are always bound, never formatted into
//! SQL. Callers own the connection's lifetime; the async service opens a fresh
//! one per call.

use crate::models::{InventoryItem, NewInventoryItem, PurchaseRecord, DATE_FORMAT};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Result type for database operations
pub type DbResult<T> = rusqlite::Result<T>;

pub const INVENTORY_TABLE: &str = "Inventario";
pub const PURCHASE_TABLE: &str = "CompraRegistros";

/// Rounding slack when comparing summed kilos against a sale
const KILO_TOLERANCE: f64 = 1e-9;

const INVENTORY_COLUMNS: &str = "Id, Codigo, Producto, Unidades, Kilos, FechaMasAntigua, \
     FechaMasNueva, FechaVencimiento, Categoria, SubCategoria";

const PURCHASE_COLUMNS: &str = "Id, Proveedor, Producto, Cantidad, PrecioUnitario, Total, \
     Observaciones, FechaCompra, EstaProcesado";

/// Initialize the database schema
///
/// Creates both tables if they don't exist. An existing schema is left as is.
pub fn init_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS Inventario (
            Id INTEGER PRIMARY KEY AUTOINCREMENT,
            Codigo TEXT NOT NULL,
            Producto TEXT NOT NULL,
            Unidades INTEGER NOT NULL,
            Kilos REAL NOT NULL,
            FechaMasAntigua TEXT NOT NULL,
            FechaMasNueva TEXT NOT NULL,
            FechaVencimiento TEXT,
            Categoria TEXT,
            SubCategoria TEXT
        );

        CREATE TABLE IF NOT EXISTS CompraRegistros (
            Id INTEGER PRIMARY KEY AUTOINCREMENT,
            Proveedor TEXT NOT NULL,
            Producto TEXT NOT NULL,
            Cantidad INTEGER NOT NULL,
            PrecioUnitario REAL NOT NULL,
            Total REAL NOT NULL,
            Observaciones TEXT,
            FechaCompra TEXT NOT NULL,
            EstaProcesado INTEGER NOT NULL DEFAULT 0
        );
        ",
    )?;

    log::info!("Database schema initialized");
    Ok(())
}

/// Format a date the way it is stored (`yyyy-MM-dd`)
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Read a stored date column
///
/// Only the leading `yyyy-MM-dd` is considered, so values carrying a time
/// suffix still load.
fn date_column(row: &Row<'_>, idx: usize) -> DbResult<NaiveDate> {
    let raw: String = row.get(idx)?;
    parse_stored_date(&raw, idx)
}

fn optional_date_column(row: &Row<'_>, idx: usize) -> DbResult<Option<NaiveDate>> {
    let raw: Option<String> = row.get(idx)?;
    match raw {
        Some(raw) if !raw.trim().is_empty() => parse_stored_date(&raw, idx).map(Some),
        _ => Ok(None),
    }
}

fn parse_stored_date(raw: &str, idx: usize) -> DbResult<NaiveDate> {
    let day: String = raw.trim().chars().take(10).collect();
    NaiveDate::parse_from_str(&day, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn purchase_from_row(row: &Row<'_>) -> DbResult<PurchaseRecord> {
    Ok(PurchaseRecord {
        id: row.get(0)?,
        proveedor: row.get(1)?,
        producto: row.get(2)?,
        cantidad: row.get(3)?,
        precio_unitario: row.get(4)?,
        total: row.get(5)?,
        observaciones: row.get(6)?,
        fecha_compra: date_column(row, 7)?,
        esta_procesado: row.get::<_, i64>(8)? == 1,
    })
}

fn inventory_from_row(row: &Row<'_>) -> DbResult<InventoryItem> {
    Ok(InventoryItem {
        id: row.get(0)?,
        codigo: row.get(1)?,
        producto: row.get(2)?,
        unidades: row.get(3)?,
        kilos: row.get(4)?,
        fecha_mas_antigua: date_column(row, 5)?,
        fecha_mas_nueva: date_column(row, 6)?,
        fecha_vencimiento: optional_date_column(row, 7)?,
        categoria: row.get(8)?,
        sub_categoria: row.get(9)?,
    })
}

// ── Purchase registers ─────────────────────────────────────────────────────

/// Get every purchase register (no ordering guaranteed)
pub fn get_all_purchases(conn: &Connection) -> DbResult<Vec<PurchaseRecord>> {
    let mut stmt = conn.prepare(&format!("SELECT {PURCHASE_COLUMNS} FROM CompraRegistros"))?;
    let results: DbResult<Vec<PurchaseRecord>> =
        stmt.query_map([], purchase_from_row)?.collect();
    results
}

/// Insert a purchase register and return its new id
///
/// `record.id` is ignored. `observaciones` is stored as NULL when absent.
pub fn insert_purchase(conn: &Connection, record: &PurchaseRecord) -> DbResult<i64> {
    conn.execute(
        "INSERT INTO CompraRegistros
         (Proveedor, Producto, Cantidad, PrecioUnitario, Total, Observaciones, FechaCompra, EstaProcesado)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            &record.proveedor,
            &record.producto,
            record.cantidad,
            record.precio_unitario,
            record.total,
            &record.observaciones,
            format_date(record.fecha_compra),
            record.esta_procesado,
        ],
    )?;
    let id = conn.last_insert_rowid();
    log::debug!("Inserted purchase register #{} ({})", id, record.producto);
    Ok(id)
}

/// Get a purchase register by id
pub fn get_purchase_by_id(conn: &Connection, id: i64) -> DbResult<Option<PurchaseRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PURCHASE_COLUMNS} FROM CompraRegistros WHERE Id = ?1"
    ))?;

    stmt.query_row(params![id], purchase_from_row).optional()
}

/// Overwrite every column of the register with `record.id`
///
/// Returns the number of rows changed (0 when the id does not exist).
pub fn update_purchase(conn: &Connection, record: &PurchaseRecord) -> DbResult<usize> {
    conn.execute(
        "UPDATE CompraRegistros
         SET Proveedor = ?2, Producto = ?3, Cantidad = ?4,
             PrecioUnitario = ?5, Total = ?6, Observaciones = ?7,
             FechaCompra = ?8, EstaProcesado = ?9
         WHERE Id = ?1",
        params![
            record.id,
            &record.proveedor,
            &record.producto,
            record.cantidad,
            record.precio_unitario,
            record.total,
            &record.observaciones,
            format_date(record.fecha_compra),
            record.esta_procesado,
        ],
    )
}

/// Delete a purchase register; returns the number of rows removed
pub fn delete_purchase(conn: &Connection, id: i64) -> DbResult<usize> {
    conn.execute("DELETE FROM CompraRegistros WHERE Id = ?1", params![id])
}

/// Set the processed flag on a purchase register
///
/// No statement clears the flag.
pub fn mark_purchase_processed(conn: &Connection, id: i64) -> DbResult<usize> {
    conn.execute(
        "UPDATE CompraRegistros SET EstaProcesado = 1 WHERE Id = ?1",
        params![id],
    )
}

// ── Inventory lines ────────────────────────────────────────────────────────

/// Get every inventory line (no ordering guaranteed)
pub fn get_inventory(conn: &Connection) -> DbResult<Vec<InventoryItem>> {
    let mut stmt = conn.prepare(&format!("SELECT {INVENTORY_COLUMNS} FROM Inventario"))?;
    let results: DbResult<Vec<InventoryItem>> =
        stmt.query_map([], inventory_from_row)?.collect();
    results
}

/// Get all inventory lines for a product code
pub fn get_inventory_by_code(conn: &Connection, codigo: &str) -> DbResult<Vec<InventoryItem>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {INVENTORY_COLUMNS} FROM Inventario WHERE Codigo = ?1"
    ))?;
    let results: DbResult<Vec<InventoryItem>> = stmt
        .query_map(params![codigo], inventory_from_row)?
        .collect();
    results
}

/// Get an inventory line by id
pub fn get_inventory_item_by_id(conn: &Connection, id: i64) -> DbResult<Option<InventoryItem>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {INVENTORY_COLUMNS} FROM Inventario WHERE Id = ?1"
    ))?;

    stmt.query_row(params![id], inventory_from_row).optional()
}

/// Insert an inventory line and return its new id
pub fn insert_inventory_item(conn: &Connection, item: &NewInventoryItem) -> DbResult<i64> {
    conn.execute(
        "INSERT INTO Inventario
         (Codigo, Producto, Unidades, Kilos, FechaMasAntigua, FechaMasNueva,
          FechaVencimiento, Categoria, SubCategoria)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            &item.codigo,
            &item.producto,
            item.unidades,
            item.kilos,
            format_date(item.fecha_mas_antigua),
            format_date(item.fecha_mas_nueva),
            item.fecha_vencimiento.map(format_date),
            &item.categoria,
            &item.sub_categoria,
        ],
    )?;
    let id = conn.last_insert_rowid();
    log::debug!("Inserted inventory line #{} ({})", id, item.codigo);
    Ok(id)
}

/// Overwrite every column of the inventory line with `item.id`
pub fn update_inventory_item(conn: &Connection, item: &InventoryItem) -> DbResult<usize> {
    conn.execute(
        "UPDATE Inventario
         SET Codigo = ?2, Producto = ?3, Unidades = ?4, Kilos = ?5,
             FechaMasAntigua = ?6, FechaMasNueva = ?7, FechaVencimiento = ?8,
             Categoria = ?9, SubCategoria = ?10
         WHERE Id = ?1",
        params![
            item.id,
            &item.codigo,
            &item.producto,
            item.unidades,
            item.kilos,
            format_date(item.fecha_mas_antigua),
            format_date(item.fecha_mas_nueva),
            item.fecha_vencimiento.map(format_date),
            &item.categoria,
            &item.sub_categoria,
        ],
    )
}

/// Delete an inventory line; returns the number of rows removed
pub fn delete_inventory_item(conn: &Connection, id: i64) -> DbResult<usize> {
    conn.execute("DELETE FROM Inventario WHERE Id = ?1", params![id])
}

/// Take a sale out of the lines with the given code, oldest stock first
///
/// The whole sale is applied inside one transaction, or not at all: negative
/// amounts, an unknown code, or lines that together hold less than the sale
/// return `false` and leave every line untouched.
pub fn decrement_stock(
    conn: &Connection,
    codigo: &str,
    unidades: i64,
    kilos: f64,
) -> DbResult<bool> {
    if unidades < 0 || kilos.is_nan() || kilos < 0.0 {
        log::debug!("Rejected sale of {} units, {} kg for {}", unidades, kilos, codigo);
        return Ok(false);
    }

    let tx = conn.unchecked_transaction()?;

    let lines: Vec<(i64, i64, f64)> = tx
        .prepare(
            "SELECT Id, Unidades, Kilos FROM Inventario
             WHERE Codigo = ?1
             ORDER BY FechaMasAntigua, Id",
        )?
        .query_map(params![codigo], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<DbResult<Vec<_>>>()?;

    let held_units: i64 = lines.iter().map(|(_, u, _)| *u).sum();
    let held_kilos: f64 = lines.iter().map(|(_, _, k)| *k).sum();
    if lines.is_empty() || held_units < unidades || held_kilos + KILO_TOLERANCE < kilos {
        log::debug!(
            "Not enough stock for {}: {} units, {} kg held",
            codigo,
            held_units,
            held_kilos
        );
        return Ok(false);
    }

    let mut units_left = unidades;
    let mut kilos_left = kilos;
    {
        let mut stmt =
            tx.prepare_cached("UPDATE Inventario SET Unidades = ?2, Kilos = ?3 WHERE Id = ?1")?;
        for (id, line_units, line_kilos) in lines {
            if units_left == 0 && kilos_left <= KILO_TOLERANCE {
                break;
            }
            let take_units = units_left.min(line_units.max(0));
            let take_kilos = kilos_left.min(line_kilos.max(0.0));
            if take_units == 0 && take_kilos <= 0.0 {
                continue;
            }
            stmt.execute(params![
                id,
                line_units - take_units,
                (line_kilos - take_kilos).max(0.0)
            ])?;
            units_left -= take_units;
            kilos_left -= take_kilos;
        }
    }

    tx.commit()?;
    log::debug!("Sold {} units, {} kg of {}", unidades, kilos, codigo);
    Ok(true)
}

/// Widen the stock date range of every line with the given code to include `fecha`
///
/// Stored dates are `yyyy-MM-dd`, so text comparison orders them correctly.
pub fn widen_stock_dates(conn: &Connection, codigo: &str, fecha: NaiveDate) -> DbResult<usize> {
    conn.execute(
        "UPDATE Inventario
         SET FechaMasAntigua = MIN(FechaMasAntigua, ?2),
             FechaMasNueva = MAX(FechaMasNueva, ?2)
         WHERE Codigo = ?1",
        params![codigo, format_date(fecha)],
    )
}

/// Distinct non-empty categories, alphabetically
pub fn get_categories(conn: &Connection) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT Categoria FROM Inventario
         WHERE Categoria IS NOT NULL AND Categoria <> ''
         ORDER BY Categoria",
    )?;
    let results: DbResult<Vec<String>> = stmt.query_map([], |row| row.get(0))?.collect();
    results
}

/// Distinct non-empty subcategories within a category, alphabetically
pub fn get_subcategories(conn: &Connection, categoria: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT SubCategoria FROM Inventario
         WHERE Categoria = ?1 AND SubCategoria IS NOT NULL AND SubCategoria <> ''
         ORDER BY SubCategoria",
    )?;
    let results: DbResult<Vec<String>> = stmt
        .query_map(params![categoria], |row| row.get(0))?
        .collect();
    results
}
