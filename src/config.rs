//! Location of the local database file

use std::path::{Path, PathBuf};

/// File name used by the desktop application
pub const DB_FILE_NAME: &str = "AdminSERMAC.db";

/// Where the SQLite database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl DatabaseConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new(default_db_path())
    }
}

/// Returns the default database path: ~/.local/share/sermac_inventory/AdminSERMAC.db
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sermac_inventory")
        .join(DB_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_ends_with_db_file() {
        let config = DatabaseConfig::default();
        assert!(config.path().ends_with(Path::new("sermac_inventory").join(DB_FILE_NAME)));
    }

    #[test]
    fn new_keeps_given_path() {
        let config = DatabaseConfig::new("/tmp/test.db");
        assert_eq!(config.path(), Path::new("/tmp/test.db"));
    }
}
