//! Integration tests for the message bridge.
//!
//! Drives the bridge with a manual clock and checks the end-to-end effect of
//! each channel on the store, the scheduler, the shortcut table and the
//! outbound event stream.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde_json::json;
use tempfile::TempDir;
use tokio::sync::mpsc;

use tules_core::counter::DailyCount;
use tules_core::storage::{defaults, STORE_FILE_NAME};
use tules_core::{
    AccessToken, AuthError, AuthProvider, BindingTable, Bridge, ConfigStore, ManualClock,
    Notifier, NotifyError, Outbound, Request, SchedulerState, SettingUpdate, ShortcutAction,
    TickOutcome,
};

#[derive(Clone, Default)]
struct RecordingNotifier {
    shown: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    fn shown(&self) -> Vec<(String, String)> {
        self.shown.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        self.shown
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
        Ok(())
    }
}

struct StaticAuth {
    token: Option<&'static str>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn access_token(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<AccessToken, AuthError> {
        self.calls
            .lock()
            .unwrap()
            .push((client_id.to_string(), client_secret.to_string()));
        match self.token {
            Some(token) => Ok(AccessToken {
                access_token: token.to_string(),
                token_type: "Bearer".to_string(),
                expires_in: Some(3600),
            }),
            None => Err(AuthError::TokenExchangeFailed("rejected".into())),
        }
    }
}

struct Harness {
    bridge: Bridge,
    clock: ManualClock,
    notifier: RecordingNotifier,
    outbound: mpsc::UnboundedReceiver<Outbound>,
    auth_calls: Arc<Mutex<Vec<(String, String)>>>,
}

fn utc(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2024, 5, day)
        .unwrap()
        .and_hms_opt(hour, min, 0)
        .unwrap()
        .and_utc()
}

/// Clock reading on a desktop running at UTC+0.
fn at(day: u32, hour: u32, min: u32) -> DateTime<FixedOffset> {
    utc(day, hour, min).fixed_offset()
}

fn harness_with(
    store: ConfigStore,
    start: DateTime<FixedOffset>,
    token: Option<&'static str>,
) -> Harness {
    let clock = ManualClock::new(start);
    let notifier = RecordingNotifier::default();
    let auth_calls = Arc::new(Mutex::new(Vec::new()));
    let (tx, outbound) = mpsc::unbounded_channel();
    let mut bridge = Bridge::new(
        store,
        BindingTable::new(),
        Box::new(notifier.clone()),
        Arc::new(StaticAuth {
            token,
            calls: Arc::clone(&auth_calls),
        }),
        Box::new(clock.clone()),
        tx,
    );
    bridge.start();
    Harness {
        bridge,
        clock,
        notifier,
        outbound,
        auth_calls,
    }
}

fn harness(start: DateTime<FixedOffset>) -> Harness {
    harness_with(ConfigStore::in_memory(defaults::table()), start, Some("tok-1"))
}

fn update(key: &str, val: serde_json::Value) -> SettingUpdate {
    SettingUpdate {
        key: key.to_string(),
        val,
    }
}

#[test]
fn break_reminder_fires_inside_window() {
    let mut h = harness(at(1, 10, 0));
    h.clock.advance(Duration::minutes(25));

    match h.bridge.tick() {
        TickOutcome::Fired(reminder) => assert!(reminder.body.contains("5 minute")),
        other => panic!("expected reminder, got {other:?}"),
    }
    let shown = h.notifier.shown();
    assert_eq!(shown.len(), 1);
    assert!(shown[0].1.contains("5 minute"));
    assert!(matches!(h.outbound.try_recv(), Ok(Outbound::Reminder(_))));
}

#[test]
fn identical_tick_outside_window_is_silent() {
    let mut h = harness(at(1, 19, 0));
    h.clock.advance(Duration::minutes(25));

    assert!(matches!(h.bridge.tick(), TickOutcome::Skipped(_)));
    assert!(h.notifier.shown().is_empty());
    assert_eq!(h.bridge.scheduler().state(), SchedulerState::Armed);
    assert!(h.outbound.try_recv().is_err());
}

#[test]
fn frequency_update_cancels_old_timer() {
    let mut h = harness(at(1, 9, 0));
    h.bridge
        .handle(Request::PomoUpdate(update(defaults::POMODORO_FREQUENCY, json!(50))));

    h.clock.set(at(1, 9, 25));
    assert_eq!(h.bridge.tick(), TickOutcome::NotDue);
    assert_eq!(h.bridge.tick(), TickOutcome::NotDue);
    assert!(h.notifier.shown().is_empty());

    h.clock.set(at(1, 9, 50));
    assert!(matches!(h.bridge.tick(), TickOutcome::Fired(_)));
    assert_eq!(h.notifier.shown().len(), 1);
}

#[test]
fn repeated_refreshes_never_double_fire() {
    let mut h = harness(at(1, 9, 0));
    for minutes in [30, 30, 20, 25] {
        h.bridge
            .handle(Request::PomoUpdate(update(defaults::POMODORO_FREQUENCY, json!(minutes))));
    }
    assert_eq!(h.bridge.scheduler().state(), SchedulerState::Armed);
    assert_eq!(h.bridge.next_due(), Some(utc(1, 9, 25)));

    h.clock.set(at(1, 9, 25));
    assert!(matches!(h.bridge.tick(), TickOutcome::Fired(_)));
    assert_eq!(h.bridge.tick(), TickOutcome::NotDue);
    assert_eq!(h.notifier.shown().len(), 1);
}

#[test]
fn disabling_through_bridge_disarms() {
    let mut h = harness(at(1, 9, 0));
    h.bridge
        .handle(Request::PomoUpdate(update(defaults::POMODORO_ENABLED, json!(false))));
    assert_eq!(h.bridge.scheduler().state(), SchedulerState::Disarmed);

    for hours in 1..10 {
        h.clock.set(at(1, 9, 0) + Duration::hours(hours));
        assert_eq!(h.bridge.tick(), TickOutcome::NotDue);
    }
    assert!(h.notifier.shown().is_empty());

    h.bridge
        .handle(Request::PomoUpdate(update(defaults::POMODORO_ENABLED, json!(true))));
    assert_eq!(h.bridge.scheduler().state(), SchedulerState::Armed);
}

#[test]
fn window_change_applies_on_next_tick_without_rearm() {
    let mut h = harness(at(1, 18, 0));
    // Written through the store-only channel: no rearm happens.
    h.bridge.handle(Request::SpotifyConfigUpdate(update(
        defaults::POMODORO_END_HOUR,
        json!(20),
    )));
    h.clock.advance(Duration::minutes(25));
    assert!(matches!(h.bridge.tick(), TickOutcome::Fired(_)));
}

#[test]
fn config_request_replies_with_merged_snapshot() {
    let mut h = harness(at(1, 9, 0));
    h.bridge
        .handle(Request::SpotifyConfigUpdate(update(defaults::SPOTIFY_CLIENT_ID, json!("cid"))));
    h.bridge.handle(Request::ConfigRequest);

    match h.outbound.try_recv() {
        Ok(Outbound::ConfigReply(snapshot)) => {
            assert_eq!(snapshot[defaults::SPOTIFY_CLIENT_ID], json!("cid"));
            assert_eq!(snapshot[defaults::POMODORO_BREAK_TIME], json!(5));
        }
        other => panic!("expected config reply, got {other:?}"),
    }
    assert!(h.outbound.try_recv().is_err());
}

#[test]
fn dictionary_update_rebinds_shortcuts() {
    let mut h = harness(at(1, 9, 0));
    h.bridge
        .handle(Request::DictionaryUpdate(update(defaults::DICTIONARY_SHORTCUT, json!("Alt+Q"))));

    assert_eq!(h.bridge.shortcuts().resolve("Alt+D"), None);
    assert_eq!(
        h.bridge.shortcuts().resolve("Alt+Q"),
        Some(ShortcutAction::DictionarySearch)
    );

    h.bridge.handle(Request::Shortcut {
        combo: "alt+q".into(),
    });
    assert_eq!(
        h.outbound.try_recv().ok(),
        Some(Outbound::Launch {
            surface: ShortcutAction::DictionarySearch
        })
    );
}

#[test]
fn global_hotkey_press_launches_after_rebind() {
    let mut h = harness(at(1, 9, 0));
    let old = tules_core::shortcuts::parse_combo("Alt+D").unwrap();
    let new = tules_core::shortcuts::parse_combo("Ctrl+Shift+K").unwrap();

    h.bridge
        .handle(Request::DictionaryUpdate(update(defaults::DICTIONARY_SHORTCUT, json!("Ctrl+Shift+K"))));
    h.bridge.hotkey_pressed(old.id());
    assert!(h.outbound.try_recv().is_err());

    h.bridge.hotkey_pressed(new.id());
    assert_eq!(
        h.outbound.try_recv().ok(),
        Some(Outbound::Launch {
            surface: ShortcutAction::DictionarySearch
        })
    );
}

#[test]
fn reminder_period_survives_dst_fall_back() {
    let edt = FixedOffset::west_opt(4 * 3600).unwrap();
    let est = FixedOffset::west_opt(5 * 3600).unwrap();
    let mut store = ConfigStore::in_memory(defaults::table());
    store.set(defaults::POMODORO_START_HOUR, json!(0)).unwrap();

    let armed = NaiveDate::from_ymd_opt(2024, 11, 3)
        .unwrap()
        .and_hms_opt(5, 50, 0)
        .unwrap()
        .and_utc();
    let mut h = harness_with(store, armed.with_timezone(&edt), None);

    // 25 real minutes later the wall clock has gone from 01:50 back to 01:15.
    h.clock.set((armed + Duration::minutes(25)).with_timezone(&est));
    assert!(matches!(h.bridge.tick(), TickOutcome::Fired(_)));
    assert_eq!(h.notifier.shown().len(), 1);
}

#[test]
fn spotify_shortcut_binds_through_config_update() {
    let mut h = harness(at(1, 9, 0));
    h.bridge
        .handle(Request::SpotifyConfigUpdate(update(defaults::SPOTIFY_SHORTCUT, json!("Alt+S"))));
    assert_eq!(h.bridge.shortcuts().backend().len(), 2);
    assert_eq!(
        h.bridge.shortcuts().resolve("Alt+S"),
        Some(ShortcutAction::SpotifyUi)
    );
}

#[test]
fn api_calls_bucket_by_day() {
    let mut h = harness(at(1, 9, 0));
    for _ in 0..3 {
        h.bridge.handle(Request::DictionaryApiCall);
    }
    assert_eq!(DailyCount::read(h.bridge.store()).count_on(at(1, 0, 0).date_naive()), 3);

    h.clock.set(at(2, 9, 0));
    h.bridge.handle(Request::DictionaryApiCall);
    let count = DailyCount::read(h.bridge.store());
    assert_eq!(count.count, 1);
    assert_eq!(count.date_key.as_deref(), Some("5_2_2024"));
}

#[test]
fn pomo_notification_is_forwarded() {
    let mut h = harness(at(1, 9, 0));
    h.bridge.handle(Request::PomoNotification(
        tules_core::bridge::NotificationRequest {
            title: "Hi".into(),
            body: "there".into(),
        },
    ));
    assert_eq!(h.notifier.shown(), vec![("Hi".to_string(), "there".to_string())]);
}

#[test]
fn quit_shuts_everything_down() {
    let mut h = harness(at(1, 9, 0));
    assert_eq!(h.bridge.handle(Request::Quit), tules_core::Flow::Quit);
    assert_eq!(h.bridge.scheduler().state(), SchedulerState::Disarmed);
    assert!(h.bridge.shortcuts().backend().is_empty());
}

#[test]
fn updates_persist_across_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(STORE_FILE_NAME);
    {
        let mut h = harness_with(
            ConfigStore::open_at(&path, defaults::table()),
            at(1, 9, 0),
            None,
        );
        h.bridge
            .handle(Request::PomoUpdate(update(defaults::POMODORO_FREQUENCY, json!(40))));
    }
    let h = harness_with(ConfigStore::open_at(&path, defaults::table()), at(1, 9, 0), None);
    assert_eq!(h.bridge.next_due(), Some(utc(1, 9, 40)));
}

#[tokio::test]
async fn spotify_auth_stores_token_and_replies_once() {
    let mut store = ConfigStore::in_memory(defaults::table());
    store.set(defaults::SPOTIFY_CLIENT_ID, json!("cid")).unwrap();
    store.set(defaults::SPOTIFY_CLIENT_SECRET, json!("secret")).unwrap();
    let mut h = harness_with(store, at(1, 9, 0), Some("tok-1"));

    h.bridge.handle(Request::SpotifyAuth);
    let done = h.bridge.next_auth_completion().await.unwrap();
    h.bridge.complete_auth(done);

    assert_eq!(
        h.auth_calls.lock().unwrap().clone(),
        vec![("cid".to_string(), "secret".to_string())]
    );
    assert_eq!(
        h.bridge.store().get_str(defaults::SPOTIFY_ACCESS_TOKEN),
        Some("tok-1")
    );
    assert_eq!(
        h.bridge
            .store()
            .get_number(defaults::SPOTIFY_ACCESS_TOKEN_SET_AT),
        Some(at(1, 9, 0).timestamp_millis() as f64)
    );
    assert_eq!(
        h.outbound.try_recv().ok(),
        Some(Outbound::SpotifyAuthDone("tok-1".into()))
    );
    assert!(h.outbound.try_recv().is_err());
}

#[tokio::test]
async fn failed_auth_sends_nothing() {
    let mut store = ConfigStore::in_memory(defaults::table());
    store.set(defaults::SPOTIFY_CLIENT_ID, json!("cid")).unwrap();
    store.set(defaults::SPOTIFY_CLIENT_SECRET, json!("secret")).unwrap();
    let mut h = harness_with(store, at(1, 9, 0), None);

    h.bridge.handle(Request::SpotifyAuth);
    let done = h.bridge.next_auth_completion().await.unwrap();
    assert!(done.result.is_err());
    h.bridge.complete_auth(done);

    assert_eq!(h.auth_calls.lock().unwrap().len(), 1);
    assert!(h.bridge.store().get(defaults::SPOTIFY_ACCESS_TOKEN).is_none());
    assert!(h.outbound.try_recv().is_err());
}

#[tokio::test]
async fn spotify_auth_without_credentials_is_skipped() {
    let mut h = harness(at(1, 9, 0));
    h.bridge.handle(Request::SpotifyAuth);
    assert!(h.auth_calls.lock().unwrap().is_empty());
    assert!(h.outbound.try_recv().is_err());
}
