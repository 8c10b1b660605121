//! First-run bootstrap
//!
//! The store file's presence is the only "already initialized" signal. When
//! it is missing, the file is created, the schema laid down and every CSV
//! imported, once. Afterwards the file is simply opened.

use crate::config::{self, StoreConfig};
use crate::import::{self, ImportReport};
use crate::storage::{self, Store};
use crate::{AccessError, Error, Result};

/// What [`ensure_ready`] had to do
#[derive(Debug)]
pub enum BootstrapStatus {
    /// The store was created and loaded during this call
    Initialized(ImportReport),
    /// The store file already existed; nothing was touched
    AlreadyInitialized,
}

impl BootstrapStatus {
    pub fn is_fresh(&self) -> bool {
        matches!(self, BootstrapStatus::Initialized(_))
    }

    pub fn report(&self) -> Option<&ImportReport> {
        match self {
            BootstrapStatus::Initialized(report) => Some(report),
            BootstrapStatus::AlreadyInitialized => None,
        }
    }
}

/// A store ready for queries
pub struct Ready {
    pub store: Store,
    pub status: BootstrapStatus,
}

/// Open the store at `config.store_location`, creating and loading it first
/// if the file does not exist yet.
///
/// Store access and schema failures are fatal. A failure after the file was
/// created leaves it partially initialized and later calls will not retry.
/// Per-file import failures are not fatal; they are in the returned report.
///
/// Not safe against another process bootstrapping the same file at once.
pub fn ensure_ready(config: &StoreConfig) -> Result<Ready> {
    let path = &config.store_location;

    if path.exists() {
        tracing::info!("Database already exists at {}. Skipping setup.", path.display());
        let store = Store::open(path)?;
        return Ok(Ready {
            store,
            status: BootstrapStatus::AlreadyInitialized,
        });
    }

    tracing::info!(
        "First time setup: creating {} and importing from {}",
        path.display(),
        config.import_directory.display()
    );
    config::ensure_db_dir(path).map_err(|e| Error::StoreAccess(AccessError::Directory(e)))?;
    let mut store = Store::open(path)?;
    storage::create_schema(&store)?;
    let report = import::import_all(&mut store, &config.import_directory);
    tracing::info!("Database setup complete.");

    Ok(Ready {
        store,
        status: BootstrapStatus::Initialized(report),
    })
}
