//! Global keyboard shortcuts.
//!
//! The registrar never diffs: every apply is unregister-all followed by a
//! register pass over the current settings. Binding sets are tiny and
//! change rarely, and a full pass can't leave stale bindings behind.
//!
//! Combos use the `global-hotkey` grammar (`Alt+D`, `CmdOrCtrl+Shift+F5`).
//! A [`HotKey`]'s id is derived from its modifiers and key, so two
//! spellings of one chord share an id.

mod backend;
mod global;
mod registrar;

pub use backend::{BindingTable, ShortcutBackend};
pub use global::GlobalShortcuts;
pub use global_hotkey::hotkey::HotKey;
pub use registrar::ShortcutRegistrar;

use serde::{Deserialize, Serialize};

use crate::error::ShortcutError;
use crate::storage::defaults;

/// What a shortcut launches in the foreground surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShortcutAction {
    DictionarySearch,
    SpotifyUi,
}

impl ShortcutAction {
    pub const ALL: [ShortcutAction; 2] = [ShortcutAction::DictionarySearch, ShortcutAction::SpotifyUi];

    /// Setting that holds this action's combo.
    pub fn setting_key(self) -> &'static str {
        match self {
            ShortcutAction::DictionarySearch => defaults::DICTIONARY_SHORTCUT,
            ShortcutAction::SpotifyUi => defaults::SPOTIFY_SHORTCUT,
        }
    }

    /// Whether writing `key` requires shortcuts to be re-applied.
    pub fn is_shortcut_key(key: &str) -> bool {
        Self::ALL.iter().any(|a| a.setting_key() == key)
    }
}

/// Parse a combo string such as `Alt+D`.
pub fn parse_combo(combo: &str) -> Result<HotKey, ShortcutError> {
    combo
        .trim()
        .parse::<HotKey>()
        .map_err(|e| ShortcutError::InvalidAccelerator {
            combo: combo.to_string(),
            message: e.to_string(),
        })
}
