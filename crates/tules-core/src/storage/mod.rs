mod schedule_config;
mod store;

pub mod defaults;

pub use schedule_config::ScheduleConfig;
pub use store::{ConfigStore, Snapshot, STORE_FILE_NAME};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/tules[-dev]/` based on TULES_ENV.
///
/// Set TULES_ENV=dev to use the development data directory, or
/// TULES_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("TULES_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("TULES_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("tules-dev")
            } else {
                base_dir.join("tules")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Loose numeric reading of a setting.
///
/// The foreground surface sometimes sends numbers as strings ("50"), so
/// numeric strings count as numbers. Booleans and everything else do not.
pub fn as_number(value: &serde_json::Value) -> Option<f64> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Loose boolean reading of a setting.
pub fn as_flag(value: &serde_json::Value) -> Option<bool> {
    match value {
        serde_json::Value::Bool(b) => Some(*b),
        serde_json::Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "on" => Some(true),
            "false" | "0" | "off" | "" => Some(false),
            _ => None,
        },
        serde_json::Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        _ => None,
    }
}
