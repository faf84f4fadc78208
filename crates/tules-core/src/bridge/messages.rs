use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{key, val}` payload of the settings update channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingUpdate {
    pub key: String,
    /// `null` (or missing) clears the override.
    #[serde(default)]
    pub val: Value,
}

/// `{title, body}` payload of `pomoNotification`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// Everything the foreground surface (or the window system) can ask for.
///
/// Wire shape: `{"channel": "<name>", "payload": ...}`; channels without a
/// payload may omit it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "channel", content = "payload")]
pub enum Request {
    #[serde(rename = "config-request")]
    ConfigRequest,
    #[serde(rename = "spotify-auth")]
    SpotifyAuth,
    #[serde(rename = "pomoUpdate")]
    PomoUpdate(SettingUpdate),
    #[serde(rename = "dictionaryUpdate")]
    DictionaryUpdate(SettingUpdate),
    #[serde(rename = "spotifyConfigUpdate")]
    SpotifyConfigUpdate(SettingUpdate),
    #[serde(rename = "dictionaryApiCall")]
    DictionaryApiCall,
    #[serde(rename = "pomoNotification")]
    PomoNotification(NotificationRequest),
    /// A registered chord was pressed.
    #[serde(rename = "shortcut")]
    Shortcut { combo: String },
    #[serde(rename = "quit")]
    Quit,
}

impl Request {
    pub fn channel(&self) -> &'static str {
        match self {
            Request::ConfigRequest => "config-request",
            Request::SpotifyAuth => "spotify-auth",
            Request::PomoUpdate(_) => "pomoUpdate",
            Request::DictionaryUpdate(_) => "dictionaryUpdate",
            Request::SpotifyConfigUpdate(_) => "spotifyConfigUpdate",
            Request::DictionaryApiCall => "dictionaryApiCall",
            Request::PomoNotification(_) => "pomoNotification",
            Request::Shortcut { .. } => "shortcut",
            Request::Quit => "quit",
        }
    }
}
