//! Setting keys and the default table.
//!
//! Only the defaults listed in [`table`] are seeded; every other documented
//! key is absent until something writes it.

use serde_json::{json, Value};
use std::collections::BTreeMap;

pub const POMODORO_FREQUENCY: &str = "pomodoro_frequency";
pub const POMODORO_BREAK_TIME: &str = "pomodoro_breakTime";
pub const POMODORO_START_HOUR: &str = "pomodoro_startHour";
pub const POMODORO_END_HOUR: &str = "pomodoro_endHour";
pub const POMODORO_ENABLED: &str = "pomodoro_enabled";

pub const DICTIONARY_SHORTCUT: &str = "dictionary_shortcut";
pub const SPOTIFY_SHORTCUT: &str = "spotify_shortcut";

pub const DICTIONARY_API_CALLS: &str = "dictionary_apicalls";
pub const DICTIONARY_API_DATE: &str = "date";

pub const SPOTIFY_CLIENT_ID: &str = "spotify_client_id";
pub const SPOTIFY_CLIENT_SECRET: &str = "spotify_client_secret";
pub const SPOTIFY_ACCESS_TOKEN: &str = "spotify_access_token";
pub const SPOTIFY_ACCESS_TOKEN_SET_AT: &str = "spotify_access_token_set_at";

/// The default table merged under every read.
pub fn table() -> BTreeMap<String, Value> {
    BTreeMap::from([
        (POMODORO_FREQUENCY.to_string(), json!(25)),
        (POMODORO_BREAK_TIME.to_string(), json!(5)),
        (POMODORO_START_HOUR.to_string(), json!(8)),
        (POMODORO_END_HOUR.to_string(), json!(17)),
        (POMODORO_ENABLED.to_string(), json!(true)),
        (DICTIONARY_SHORTCUT.to_string(), json!("Alt+D")),
    ])
}
