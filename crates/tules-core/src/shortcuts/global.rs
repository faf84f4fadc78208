use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{BindingTable, HotKey, ShortcutAction, ShortcutBackend};
use crate::error::ShortcutError;

/// Desktop-wide shortcuts through the OS hotkey service.
///
/// On Linux the hotkey service runs its own X11 thread. Windows and macOS
/// deliver hotkeys through the creating thread's event loop, which a
/// headless process doesn't run; there presses arrive as `shortcut`
/// requests instead.
pub struct GlobalShortcuts {
    manager: GlobalHotKeyManager,
    table: BindingTable,
}

impl GlobalShortcuts {
    pub fn new() -> Result<Self, ShortcutError> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| ShortcutError::Unavailable(e.to_string()))?;
        Ok(Self {
            manager,
            table: BindingTable::new(),
        })
    }

    /// Route key-down events from the hotkey service into a channel of
    /// hotkey ids. Replaces any previously installed handler.
    pub fn pressed_events() -> mpsc::UnboundedReceiver<u32> {
        let (tx, rx) = mpsc::unbounded_channel();
        GlobalHotKeyEvent::set_event_handler(Some(move |event: GlobalHotKeyEvent| {
            if matches!(event.state, HotKeyState::Pressed) && tx.send(event.id).is_err() {
                debug!(id = event.id, "hotkey press dropped, bridge gone");
            }
        }));
        rx
    }
}

impl ShortcutBackend for GlobalShortcuts {
    fn register(&mut self, hotkey: HotKey, action: ShortcutAction) -> Result<(), ShortcutError> {
        if self.table.action_for(hotkey.id()).is_some() {
            // Already bound here; the table reports the conflict.
            return self.table.register(hotkey, action);
        }
        self.manager
            .register(hotkey)
            .map_err(|e| ShortcutError::RegistrationFailed {
                combo: format!("{hotkey:?}"),
                message: e.to_string(),
            })?;
        self.table.register(hotkey, action)
    }

    fn unregister_all(&mut self) {
        if self.table.is_empty() {
            return;
        }
        if let Err(e) = self.manager.unregister_all(&self.table.hotkeys()) {
            warn!("failed to release global shortcuts: {e}");
        }
        self.table.unregister_all();
    }

    fn action_for(&self, id: u32) -> Option<ShortcutAction> {
        self.table.action_for(id)
    }
}
