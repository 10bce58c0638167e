//! Error types for the inventory data service

/// Unified error type for inventory and purchase register operations
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// No row with the requested id exists
    #[error("Record not found: {table} #{id}")]
    NotFound { table: &'static str, id: i64 },
    /// SQLite reported an error (constraint violation, bad stored value, etc.)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Failed to prepare the database location on disk
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The blocking worker running a statement panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl InventoryError {
    /// Whether this is the "record not found" condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, InventoryError::NotFound { .. })
    }
}

/// Result alias for inventory operations
pub type Result<T> = std::result::Result<T, InventoryError>;
