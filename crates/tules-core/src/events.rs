use serde::{Deserialize, Serialize};

use crate::scheduler::Reminder;
use crate::shortcuts::ShortcutAction;
use crate::storage::Snapshot;

/// Everything the companion process sends to the foreground surface.
///
/// Serialized as `{"channel": "...", "payload": ...}`, one object per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "channel", content = "payload")]
pub enum Outbound {
    /// Reply to `config-request`: every setting, defaults merged in.
    #[serde(rename = "config-reply")]
    ConfigReply(Snapshot),
    /// Completion of `spotify-auth`, carrying the access token.
    #[serde(rename = "spotify-auth-done")]
    SpotifyAuthDone(String),
    /// A reminder fired by the scheduler.
    #[serde(rename = "reminder")]
    Reminder(Reminder),
    /// A global shortcut was pressed.
    #[serde(rename = "launch")]
    Launch { surface: ShortcutAction },
}
