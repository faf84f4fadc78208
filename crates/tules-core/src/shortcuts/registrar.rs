use tracing::{info, warn};

use super::{parse_combo, HotKey, ShortcutAction, ShortcutBackend};
use crate::storage::ConfigStore;

/// Keeps the backend's binding set equal to the shortcut settings.
#[derive(Debug)]
pub struct ShortcutRegistrar<B> {
    backend: B,
}

impl<B: ShortcutBackend> ShortcutRegistrar<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Unregister everything, then register each configured, parseable
    /// shortcut. Returns what ended up bound.
    ///
    /// Empty or missing settings are ignored. Malformed combos and backend
    /// refusals are logged and skipped; the remaining shortcuts still bind.
    pub fn apply_shortcuts(&mut self, store: &ConfigStore) -> Vec<(HotKey, ShortcutAction)> {
        self.backend.unregister_all();

        let mut bound = Vec::new();
        for action in ShortcutAction::ALL {
            let Some(combo) = store
                .get_str(action.setting_key())
                .map(str::trim)
                .filter(|c| !c.is_empty())
            else {
                continue;
            };

            let hotkey = match parse_combo(combo) {
                Ok(hotkey) => hotkey,
                Err(e) => {
                    warn!(?action, "skipping shortcut: {e}");
                    continue;
                }
            };

            match self.backend.register(hotkey, action) {
                Ok(()) => bound.push((hotkey, action)),
                Err(e) => warn!(?action, "skipping shortcut: {e}"),
            }
        }

        info!(count = bound.len(), "shortcuts applied");
        bound
    }

    /// Look up the action for a chord reported as a combo string.
    pub fn resolve(&self, combo: &str) -> Option<ShortcutAction> {
        let hotkey = parse_combo(combo).ok()?;
        self.backend.action_for(hotkey.id())
    }

    /// Look up the action for a press reported by the hotkey service.
    pub fn pressed(&self, id: u32) -> Option<ShortcutAction> {
        self.backend.action_for(id)
    }

    /// Drop every binding. Used on process exit.
    pub fn clear(&mut self) {
        self.backend.unregister_all();
    }
}
