//! Message bridge between the foreground surface and the background process.
//!
//! The bridge is the composition root's single owner of the config store,
//! the scheduler and the shortcut registrar. Each request applies its store
//! mutation and the matching refresh in one synchronous step, so a
//! scheduler rearm can never interleave with a tick. The only suspension
//! point is the access token exchange, which runs as a spawned task and
//! comes back through [`AuthCompletion`].

mod event_loop;
mod messages;

pub use messages::{NotificationRequest, Request, SettingUpdate};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::auth::{AccessToken, AuthProvider};
use crate::clock::Clock;
use crate::counter;
use crate::error::{AuthError, ConfigError};
use crate::events::Outbound;
use crate::notify::Notifier;
use crate::scheduler::{Scheduler, TickOutcome};
use crate::shortcuts::{BindingTable, ShortcutAction, ShortcutBackend, ShortcutRegistrar};
use crate::storage::{defaults, ConfigStore};

/// Whether the event loop should keep going after a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Result of one `spotify-auth` exchange, delivered back to the bridge.
#[derive(Debug)]
pub struct AuthCompletion {
    pub result: Result<AccessToken, AuthError>,
}

/// Owns the store, scheduler and shortcuts, and applies requests to them.
pub struct Bridge<B = BindingTable> {
    store: ConfigStore,
    scheduler: Scheduler,
    shortcuts: ShortcutRegistrar<B>,
    notifier: Box<dyn Notifier>,
    auth: Arc<dyn AuthProvider>,
    clock: Box<dyn Clock>,
    outbound: mpsc::UnboundedSender<Outbound>,
    auth_tx: mpsc::UnboundedSender<AuthCompletion>,
    auth_rx: mpsc::UnboundedReceiver<AuthCompletion>,
}

impl<B: ShortcutBackend> Bridge<B> {
    pub fn new(
        store: ConfigStore,
        backend: B,
        notifier: Box<dyn Notifier>,
        auth: Arc<dyn AuthProvider>,
        clock: Box<dyn Clock>,
        outbound: mpsc::UnboundedSender<Outbound>,
    ) -> Self {
        let (auth_tx, auth_rx) = mpsc::unbounded_channel();
        Self {
            store,
            scheduler: Scheduler::new(),
            shortcuts: ShortcutRegistrar::new(backend),
            notifier,
            auth,
            clock,
            outbound,
            auth_tx,
            auth_rx,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn shortcuts(&self) -> &ShortcutRegistrar<B> {
        &self.shortcuts
    }

    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.scheduler.next_due()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Process start: arm the scheduler and bind shortcuts.
    pub fn start(&mut self) {
        let now = self.clock.now();
        self.scheduler.init(&self.store, now);
        self.shortcuts.apply_shortcuts(&self.store);
        info!("bridge started");
    }

    /// Process exit: drop the timer and every binding.
    pub fn shutdown(&mut self) {
        self.scheduler.shutdown();
        self.shortcuts.clear();
        info!("bridge shut down");
    }

    // ── Requests ─────────────────────────────────────────────────────

    /// Apply one request. Must run inside a tokio runtime: `spotify-auth`
    /// spawns its exchange.
    pub fn handle(&mut self, request: Request) -> Flow {
        debug!(channel = request.channel(), "request");
        match request {
            Request::ConfigRequest => {
                self.emit(Outbound::ConfigReply(self.store.get_all_data()));
            }
            Request::SpotifyAuth => self.begin_auth(),
            Request::PomoUpdate(update) => {
                let key = self.apply_update(update);
                self.scheduler
                    .refresh_config(&self.store, self.clock.now());
                if ShortcutAction::is_shortcut_key(&key) {
                    self.shortcuts.apply_shortcuts(&self.store);
                }
            }
            Request::DictionaryUpdate(update) => {
                self.apply_update(update);
                self.shortcuts.apply_shortcuts(&self.store);
            }
            Request::SpotifyConfigUpdate(update) => {
                let key = self.apply_update(update);
                if ShortcutAction::is_shortcut_key(&key) {
                    self.shortcuts.apply_shortcuts(&self.store);
                }
            }
            Request::DictionaryApiCall => {
                let today = self.clock.now().date_naive();
                match counter::record_call(&mut self.store, today) {
                    Ok(count) => debug!(count, "dictionary api call recorded"),
                    Err(e) => warn_config("dictionary api call", &e),
                }
            }
            Request::PomoNotification(n) => {
                if let Err(e) = self.notifier.notify(&n.title, &n.body) {
                    warn!("notification failed: {e}");
                }
            }
            Request::Shortcut { combo } => match self.shortcuts.resolve(&combo) {
                Some(surface) => self.launch(surface),
                None => debug!(combo = %combo, "no binding for shortcut"),
            },
            Request::Quit => {
                self.shutdown();
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    /// Store an access token exchange result and answer `spotify-auth`.
    ///
    /// Failures are logged and produce no event; nothing is retried.
    pub fn complete_auth(&mut self, completion: AuthCompletion) {
        let token = match completion.result {
            Ok(token) => token,
            Err(e) => {
                warn!("spotify auth failed: {e}");
                return;
            }
        };

        let set_at = self.clock.epoch_ms();
        for (key, value) in [
            (defaults::SPOTIFY_ACCESS_TOKEN, json!(token.access_token)),
            (defaults::SPOTIFY_ACCESS_TOKEN_SET_AT, json!(set_at)),
        ] {
            if let Err(e) = self.store.set(key, value) {
                warn_config(key, &e);
            }
        }
        info!("spotify access token refreshed");
        self.emit(Outbound::SpotifyAuthDone(token.access_token));
    }

    /// A global hotkey with this id was pressed.
    pub fn hotkey_pressed(&mut self, id: u32) {
        match self.shortcuts.pressed(id) {
            Some(surface) => self.launch(surface),
            None => debug!(id, "no binding for hotkey"),
        }
    }

    /// Wait for the next finished exchange.
    pub async fn next_auth_completion(&mut self) -> Option<AuthCompletion> {
        self.auth_rx.recv().await
    }

    // ── Timer ────────────────────────────────────────────────────────

    /// Let the scheduler fire if its deadline has passed.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.scheduler.tick(&self.store, self.clock.now());
        if let TickOutcome::Fired(reminder) = &outcome {
            if let Err(e) = self.notifier.notify(&reminder.title, &reminder.body) {
                warn!("reminder notification failed: {e}");
            }
            self.emit(Outbound::Reminder(reminder.clone()));
        }
        outcome
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin_auth(&self) {
        let credential = |key| {
            self.store
                .get_str(key)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let (Some(client_id), Some(client_secret)) = (
            credential(defaults::SPOTIFY_CLIENT_ID),
            credential(defaults::SPOTIFY_CLIENT_SECRET),
        ) else {
            warn!(
                "{}",
                AuthError::CredentialsNotConfigured {
                    service: "spotify".into()
                }
            );
            return;
        };

        let auth = Arc::clone(&self.auth);
        let done = self.auth_tx.clone();
        tokio::spawn(async move {
            let result = auth.access_token(&client_id, &client_secret).await;
            let _ = done.send(AuthCompletion { result });
        });
    }

    /// Write one setting. Returns the key so callers can decide on refreshes.
    fn apply_update(&mut self, update: SettingUpdate) -> String {
        let SettingUpdate { key, val } = update;
        if let Err(e) = self.store.set(&key, val) {
            warn_config(&key, &e);
        }
        key
    }

    fn launch(&self, surface: ShortcutAction) {
        info!(?surface, "shortcut pressed");
        self.emit(Outbound::Launch { surface });
    }

    fn emit(&self, event: Outbound) {
        if self.outbound.send(event).is_err() {
            debug!("outbound channel closed, event dropped");
        }
    }
}

fn warn_config(context: &str, e: &ConfigError) {
    match e {
        ConfigError::SaveFailed { .. } => {
            warn!("{context}: {e}; value kept in memory only")
        }
        _ => warn!("{context}: {e}"),
    }
}
