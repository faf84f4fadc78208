//! # tules Core Library
//!
//! Background logic for the tules desktop companion: a persisted settings
//! store, a work/break reminder scheduler gated to an hour-of-day window,
//! global shortcut registration, a daily API call counter, and the message
//! bridge that ties them to the foreground surface.
//!
//! ## Architecture
//!
//! - **Config Store**: defaults merged with TOML-persisted overrides
//! - **Scheduler**: single live timer, re-armed on every reconfiguration
//! - **Shortcut Registrar**: unregister-all then register on every change
//! - **Message Bridge**: typed requests in, typed events out, one task
//!
//! ## Key Components
//!
//! - [`ConfigStore`]: settings persistence
//! - [`Scheduler`]: reminder state machine
//! - [`ShortcutRegistrar`]: binding lifecycle
//! - [`Bridge`]: request dispatch and event loop

pub mod auth;
pub mod bridge;
pub mod clock;
pub mod counter;
pub mod error;
pub mod events;
pub mod notify;
pub mod scheduler;
pub mod shortcuts;
pub mod storage;

pub use auth::{AccessToken, AuthProvider, SpotifyAuth};
pub use bridge::{AuthCompletion, Bridge, Flow, Request, SettingUpdate};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AuthError, ConfigError, CoreError, NotifyError, ShortcutError};
pub use events::Outbound;
pub use notify::{BackgroundNotifier, LogNotifier, Notifier};
pub use scheduler::{Reminder, Scheduler, SchedulerState, TickOutcome, TimerHandle};
pub use shortcuts::{
    BindingTable, GlobalShortcuts, HotKey, ShortcutAction, ShortcutBackend, ShortcutRegistrar,
};
pub use storage::{ConfigStore, ScheduleConfig};
