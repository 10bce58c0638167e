//! SERMAC Inventory - database bootstrap
//!
//! Initializes logging, makes sure the local database and its tables exist,
//! and reports what is stored. The desktop shell builds on the same service.

use clap::Parser;
use sermac_inventory::{default_db_path, DatabaseConfig, InventoryService};

/// Prepare the SERMAC inventory database
#[derive(Parser, Debug)]
#[command(name = "sermac_inventory")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    #[arg(short, long, default_value_t = default_db_path().to_string_lossy().to_string())]
    database: String,
}

#[tokio::main]
async fn main() {
    // Set RUST_LOG to control the level, e.g. RUST_LOG=sermac_inventory=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = DatabaseConfig::new(&args.database);

    log::info!("Starting sermac_inventory...");

    let service = match InventoryService::new(&config) {
        Ok(service) => {
            log::info!("Database initialized: {}", service.db_path().display());
            service
        }
        Err(e) => {
            log::error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = report(&service).await {
        log::error!("Failed to read database: {}", e);
        std::process::exit(1);
    }
}

/// Log a short summary of the stored inventory and purchase registers
async fn report(service: &InventoryService) -> sermac_inventory::Result<()> {
    let inventory = service.get_inventory().await?;
    let purchases = service.get_all_purchases().await?;
    let pending = purchases.iter().filter(|p| !p.esta_procesado).count();
    let categories = service.get_categories().await?;

    log::info!(
        "{} inventory line(s) in {} categor(ies)",
        inventory.len(),
        categories.len()
    );
    log::info!(
        "{} purchase register(s), {} pending processing",
        purchases.len(),
        pending
    );
    Ok(())
}
