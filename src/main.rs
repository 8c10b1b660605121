//! ecomdb CLI - bootstrap and serve the e-commerce dataset store

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use ecomdb::config::{self, StoreConfig};
use ecomdb::storage::Store;
use ecomdb::ui;
use ecomdb::{ensure_ready, BootstrapStatus};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "ecomdb")]
#[command(version)]
#[command(about = "Load the e-commerce CSV dataset into SQLite once and query it")]
#[command(long_about = r#"
ecomdb creates a SQLite store from five CSV files on first run:
  distribution_centers.csv, users.csv, products.csv, orders.csv, order_items.csv

Later runs find the store file and use it as is.

Example usage:
  ecomdb bootstrap --database ecommerce.db --import-dir ./archive
  ecomdb stats
  ecomdb serve --port 3001
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (defaults to ecomdb.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create and load the store if it does not exist yet
    Bootstrap {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Directory containing the source CSV files
        #[arg(short, long)]
        import_dir: Option<PathBuf>,
    },

    /// Show row counts of an existing store
    Stats {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Count rows whose foreign-key values point at missing rows
    Check {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Bootstrap if needed, then serve the query API
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Directory containing the source CSV files
        #[arg(short, long)]
        import_dir: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let file = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Bootstrap { database, import_dir } => {
            let config = StoreConfig::resolve(file.as_ref(), database, import_dir);
            bootstrap(&config)?;
        }

        Commands::Stats { database } => {
            let config = StoreConfig::resolve(file.as_ref(), database, None);
            let store = Store::open_existing(&config.store_location)?;
            let stats = store.stats()?;

            ui::heading("Store statistics", &config.store_location);
            ui::print_stats(&stats);
        }

        Commands::Check { database } => {
            let config = StoreConfig::resolve(file.as_ref(), database, None);
            let store = Store::open_existing(&config.store_location)?;
            let checks = store.check_references()?;

            ui::heading("Reference check", &config.store_location);
            ui::print_references(&checks);
        }

        Commands::Serve { port, database, import_dir } => {
            let config = StoreConfig::resolve(file.as_ref(), database, import_dir);
            let store = bootstrap(&config)?;

            println!("Server running at http://0.0.0.0:{}", port);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(ecomdb::server::start_server(port, store))?;
        }
    }

    Ok(())
}

fn bootstrap(config: &StoreConfig) -> anyhow::Result<Store> {
    ui::heading("ecomdb bootstrap", &config.store_location);

    let started = Instant::now();
    let spinner = ui::Spinner::new("Preparing store...");
    let ready = ensure_ready(config);
    spinner.clear();
    let ready = ready?;

    match &ready.status {
        BootstrapStatus::Initialized(report) => {
            ui::print_import(report, &config.import_directory, started.elapsed());
        }
        BootstrapStatus::AlreadyInitialized => {
            ui::print_already_initialized(&config.store_location);
        }
    }

    Ok(ready.store)
}
