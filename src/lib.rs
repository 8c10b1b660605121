//! # ecomdb - e-commerce dataset store
//!
//! Loads a fixed relational dataset (distribution centers, users, products,
//! orders, order items) from CSV files into a SQLite database exactly once,
//! then hands the open store to a read-only query layer.
//!
//! ecomdb provides:
//! - A static catalog of the five tables and their logical references
//! - Schema creation from the catalog
//! - Transactional, all-or-nothing bulk import of one CSV file per table
//! - Import orchestration in foreign-key dependency order
//! - First-run detection keyed on the store file's presence
//! - A small JSON query API over the loaded store

pub mod catalog;
pub mod storage;
pub mod import;
pub mod bootstrap;
pub mod config;
pub mod server;
pub mod ui;

// Re-exports for convenient access
pub use bootstrap::{ensure_ready, BootstrapStatus, Ready};
pub use catalog::TableSchema;
pub use config::StoreConfig;
pub use import::{ImportOutcome, ImportReport};
pub use storage::{Row, Store};

use std::path::PathBuf;

/// Result type alias for ecomdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for ecomdb operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot open store: {0}")]
    StoreAccess(#[source] AccessError),

    #[error("Schema creation failed: {0}")]
    Schema(#[source] rusqlite::Error),

    #[error("Query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Store not found at {}", .0.display())]
    StoreMissing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Why the store file could not be opened or created
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error(transparent)]
    Open(#[from] rusqlite::Error),

    #[error("cannot create store directory: {0}")]
    Directory(#[from] std::io::Error),
}
