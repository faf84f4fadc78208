//! TOML-backed key/value settings store.
//!
//! Holds a fixed default table and the user's overrides. Reads merge the
//! two, overrides winning. Every `set` rewrites the full override table to
//! disk before returning, so a later read can never observe a state that
//! was not first handed to the filesystem.
//!
//! Configuration is stored at `~/.config/tules/user-preferences.toml`.

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{as_flag, as_number, data_dir, defaults};
use crate::error::ConfigError;

pub const STORE_FILE_NAME: &str = "user-preferences.toml";

/// Owned view of every setting at one point in time.
pub type Snapshot = BTreeMap<String, Value>;

/// Settings store: defaults plus persisted overrides.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    /// `None` keeps everything in memory (tests, dry runs).
    path: Option<PathBuf>,
    defaults: BTreeMap<String, Value>,
    overrides: BTreeMap<String, Value>,
    /// False after a failed write, until the next successful one.
    durable: bool,
}

impl ConfigStore {
    /// Open the store in the data directory with the standard default table.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn open() -> Result<Self, ConfigError> {
        let path = data_dir()?.join(STORE_FILE_NAME);
        Ok(Self::open_at(path, defaults::table()))
    }

    /// Open a store backed by `path`.
    ///
    /// A missing file means "no overrides yet". An unreadable or unparseable
    /// file is logged and treated the same way; it will be replaced by the
    /// next successful `set`.
    pub fn open_at(path: impl Into<PathBuf>, defaults: BTreeMap<String, Value>) -> Self {
        let path = path.into();
        let overrides = match read_overrides(&path) {
            Ok(overrides) => overrides,
            Err(e) => {
                warn!("{e}; starting from defaults");
                BTreeMap::new()
            }
        };
        debug!(path = %path.display(), overrides = overrides.len(), "config store opened");
        Self {
            path: Some(path),
            defaults,
            overrides,
            durable: true,
        }
    }

    /// A store that never touches the filesystem.
    pub fn in_memory(defaults: BTreeMap<String, Value>) -> Self {
        Self {
            path: None,
            defaults,
            overrides: BTreeMap::new(),
            durable: true,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether the last write reached disk.
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    /// Override if present, else the default, else `None`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.overrides.get(key).or_else(|| self.defaults.get(key))
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(as_number)
    }

    pub fn get_flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(as_flag)
    }

    pub fn has_override(&self, key: &str) -> bool {
        self.overrides.contains_key(key)
    }

    /// Write an override and persist the whole override table.
    ///
    /// `Value::Null` removes the override. Arrays and objects are rejected
    /// without touching the store.
    ///
    /// # Errors
    ///
    /// `InvalidValue` leaves the store unchanged. `SaveFailed` means the
    /// in-memory value was updated but is not durable across a restart.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        if key.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: "config key is empty".to_string(),
            });
        }

        match value {
            Value::Null => {
                self.overrides.remove(key);
            }
            Value::Array(_) | Value::Object(_) => {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "only bool, number and string values are supported".to_string(),
                });
            }
            scalar => {
                self.overrides.insert(key.to_string(), scalar);
            }
        }

        self.save()
    }

    /// Drop every override.
    ///
    /// # Errors
    ///
    /// Returns an error if the emptied table cannot be written.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        self.overrides.clear();
        self.save()
    }

    /// Defaults merged with overrides, as an owned snapshot.
    pub fn get_all_data(&self) -> Snapshot {
        let mut merged = self.defaults.clone();
        merged.extend(
            self.overrides
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        merged
    }

    fn save(&mut self) -> Result<(), ConfigError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        match write_overrides(path, &self.overrides) {
            Ok(()) => {
                self.durable = true;
                Ok(())
            }
            Err(message) => {
                self.durable = false;
                Err(ConfigError::SaveFailed {
                    path: path.to_path_buf(),
                    message,
                })
            }
        }
    }
}

fn read_overrides(path: &Path) -> Result<BTreeMap<String, Value>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => {
            return Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
    };

    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Write to a sibling temp file, then rename over the target.
fn write_overrides(path: &Path, overrides: &BTreeMap<String, Value>) -> Result<(), String> {
    let content = toml::to_string_pretty(overrides).map_err(|e| e.to_string())?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, content).map_err(|e| e.to_string())?;
    std::fs::rename(&tmp, path).map_err(|e| e.to_string())
}
