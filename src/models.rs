use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Storage format for every date column (`yyyy-MM-dd`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One stock line in the `Inventario` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,
    pub codigo: String,
    pub producto: String,
    pub unidades: i64,
    pub kilos: f64,
    /// Date of the oldest stock still on hand
    pub fecha_mas_antigua: NaiveDate,
    /// Date of the most recent stock intake
    pub fecha_mas_nueva: NaiveDate,
    pub fecha_vencimiento: Option<NaiveDate>,
    pub categoria: Option<String>,
    pub sub_categoria: Option<String>,
}

/// Inventory line to insert; the id is assigned by the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInventoryItem {
    pub codigo: String,
    pub producto: String,
    pub unidades: i64,
    pub kilos: f64,
    pub fecha_mas_antigua: NaiveDate,
    pub fecha_mas_nueva: NaiveDate,
    pub fecha_vencimiento: Option<NaiveDate>,
    pub categoria: Option<String>,
    pub sub_categoria: Option<String>,
}

impl NewInventoryItem {
    /// A line whose oldest and newest stock both arrived on `fecha`
    pub fn received_on(
        codigo: impl Into<String>,
        producto: impl Into<String>,
        unidades: i64,
        kilos: f64,
        fecha: NaiveDate,
    ) -> Self {
        Self {
            codigo: codigo.into(),
            producto: producto.into(),
            unidades,
            kilos,
            fecha_mas_antigua: fecha,
            fecha_mas_nueva: fecha,
            fecha_vencimiento: None,
            categoria: None,
            sub_categoria: None,
        }
    }
}

/// A purchase register in the `CompraRegistros` table
///
/// `total` is stored as given. It is expected to equal
/// `cantidad * precio_unitario`, but nothing enforces that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Ignored on insert
    pub id: i64,
    pub proveedor: String,
    pub producto: String,
    pub cantidad: i64,
    pub precio_unitario: f64,
    pub total: f64,
    pub observaciones: Option<String>,
    pub fecha_compra: NaiveDate,
    pub esta_procesado: bool,
}

impl PurchaseRecord {
    /// Builds an unprocessed register with `total` computed from quantity and unit price
    pub fn new(
        proveedor: impl Into<String>,
        producto: impl Into<String>,
        cantidad: i64,
        precio_unitario: f64,
        fecha_compra: NaiveDate,
    ) -> Self {
        Self {
            id: 0,
            proveedor: proveedor.into(),
            producto: producto.into(),
            cantidad,
            precio_unitario,
            total: cantidad as f64 * precio_unitario,
            observaciones: None,
            fecha_compra,
            esta_procesado: false,
        }
    }

    pub fn with_observaciones(mut self, observaciones: impl Into<String>) -> Self {
        self.observaciones = Some(observaciones.into());
        self
    }

    /// `cantidad * precio_unitario`, for callers that want to check `total`
    pub fn expected_total(&self) -> f64 {
        self.cantidad as f64 * self.precio_unitario
    }
}
