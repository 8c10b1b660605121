use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::{Error, Result};

pub const DEFAULT_STORE_LOCATION: &str = "ecommerce.db";
pub const DEFAULT_IMPORT_DIRECTORY: &str = "archive";

/// Contents of `ecomdb.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    pub store_location: Option<String>,
    pub import_directory: Option<String>,
}

/// Where the store lives and where its source files come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub store_location: PathBuf,
    pub import_directory: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_location: PathBuf::from(DEFAULT_STORE_LOCATION),
            import_directory: PathBuf::from(DEFAULT_IMPORT_DIRECTORY),
        }
    }
}

impl StoreConfig {
    pub fn new(store_location: impl Into<PathBuf>, import_directory: impl Into<PathBuf>) -> Self {
        Self {
            store_location: store_location.into(),
            import_directory: import_directory.into(),
        }
    }

    /// Resolve each option: explicit override, then config file, then default
    pub fn resolve(
        file: Option<&ConfigFile>,
        store_location: Option<PathBuf>,
        import_directory: Option<PathBuf>,
    ) -> Self {
        let defaults = Self::default();
        let file_store = file.and_then(|f| f.store_location.as_deref()).map(PathBuf::from);
        let file_import = file.and_then(|f| f.import_directory.as_deref()).map(PathBuf::from);

        Self {
            store_location: store_location
                .or(file_store)
                .unwrap_or(defaults.store_location),
            import_directory: import_directory
                .or(file_import)
                .unwrap_or(defaults.import_directory),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("ecomdb.toml")
}

/// Load the config file; a missing file is not an error
pub fn load_config(path: Option<&Path>) -> Result<Option<ConfigFile>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: ConfigFile = toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    Ok(Some(config))
}

pub fn ensure_db_dir(db_path: &Path) -> std::io::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
