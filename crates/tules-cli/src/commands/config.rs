use clap::Subcommand;
use serde_json::Value;
use std::path::PathBuf;
use tules_core::error::{CoreError, Result};

use super::open_store;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "pomodoro_frequency", "dictionary_shortcut")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value; JSON scalars (50, true) keep their type, anything else is a string
        value: String,
    },
    /// Remove an override so the default applies again
    Unset {
        /// Config key
        key: String,
    },
    /// List all config values, defaults included
    List,
    /// Reset config to defaults
    Reset,
}

/// `50` -> number, `true` -> bool, `null` -> unset, `Alt+D` -> string.
fn parse_value(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(v @ (Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Null)) => v,
        _ => Value::String(raw.to_string()),
    }
}

pub fn run(data_dir: Option<PathBuf>, action: ConfigAction) -> Result<()> {
    let mut store = open_store(data_dir)?;
    match action {
        ConfigAction::Get { key } => match store.get(&key) {
            Some(Value::String(s)) => println!("{s}"),
            Some(other) => println!("{other}"),
            None => return Err(CoreError::Custom(format!("unknown key: {key}"))),
        },
        ConfigAction::Set { key, value } => {
            store.set(&key, parse_value(&value))?;
            println!("ok");
        }
        ConfigAction::Unset { key } => {
            store.set(&key, Value::Null)?;
            println!("ok");
        }
        ConfigAction::List => {
            let json = serde_json::to_string_pretty(&store.get_all_data())?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            store.reset()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
