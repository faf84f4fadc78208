pub mod config;
pub mod counter;
pub mod run;

use std::path::PathBuf;

use tules_core::storage::{defaults, STORE_FILE_NAME};
use tules_core::{ConfigError, ConfigStore};

/// Open the store in `data_dir`, or in the default data directory.
pub fn open_store(data_dir: Option<PathBuf>) -> Result<ConfigStore, ConfigError> {
    match data_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)
                .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
            Ok(ConfigStore::open_at(dir.join(STORE_FILE_NAME), defaults::table()))
        }
        None => ConfigStore::open(),
    }
}
