use std::collections::BTreeMap;

use super::{HotKey, ShortcutAction};
use crate::error::ShortcutError;

/// OS-level shortcut table.
///
/// The registrar only ever calls `unregister_all` followed by `register`.
/// Key presses are reported by hotkey id.
pub trait ShortcutBackend {
    /// Bind `hotkey` to `action`. Fails if the chord is already taken.
    fn register(&mut self, hotkey: HotKey, action: ShortcutAction) -> Result<(), ShortcutError>;

    /// Remove every binding. Must be a no-op when nothing is registered.
    fn unregister_all(&mut self);

    /// Action bound to the hotkey with this id, if any.
    fn action_for(&self, id: u32) -> Option<ShortcutAction>;
}

impl<T: ShortcutBackend + ?Sized> ShortcutBackend for Box<T> {
    fn register(&mut self, hotkey: HotKey, action: ShortcutAction) -> Result<(), ShortcutError> {
        (**self).register(hotkey, action)
    }

    fn unregister_all(&mut self) {
        (**self).unregister_all()
    }

    fn action_for(&self, id: u32) -> Option<ShortcutAction> {
        (**self).action_for(id)
    }
}

/// In-process binding table.
///
/// Bookkeeping for [`GlobalShortcuts`](super::GlobalShortcuts), and the
/// whole backend when no hotkey service is available (presses then arrive
/// as `shortcut` requests) or in tests.
#[derive(Debug, Default, Clone)]
pub struct BindingTable {
    bindings: BTreeMap<u32, (HotKey, ShortcutAction)>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bindings(&self) -> &BTreeMap<u32, (HotKey, ShortcutAction)> {
        &self.bindings
    }

    pub fn hotkeys(&self) -> Vec<HotKey> {
        self.bindings.values().map(|(hotkey, _)| *hotkey).collect()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl ShortcutBackend for BindingTable {
    fn register(&mut self, hotkey: HotKey, action: ShortcutAction) -> Result<(), ShortcutError> {
        if self.bindings.contains_key(&hotkey.id()) {
            return Err(ShortcutError::RegistrationFailed {
                combo: format!("{hotkey:?}"),
                message: "already registered".to_string(),
            });
        }
        self.bindings.insert(hotkey.id(), (hotkey, action));
        Ok(())
    }

    fn unregister_all(&mut self) {
        self.bindings.clear();
    }

    fn action_for(&self, id: u32) -> Option<ShortcutAction> {
        self.bindings.get(&id).map(|(_, action)| *action)
    }
}
