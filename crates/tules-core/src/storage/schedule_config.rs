use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::{defaults, ConfigStore};

/// Reminder settings, read fresh from the store every time.
///
/// Values the store cannot interpret come through as `None` instead of an
/// error; the scheduler treats those as "don't run" / "never inside window".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub enabled: bool,
    pub frequency_minutes: Option<f64>,
    pub break_minutes: Option<f64>,
    pub start_hour: Option<u32>,
    pub end_hour: Option<u32>,
}

impl ScheduleConfig {
    pub fn from_store(store: &ConfigStore) -> Self {
        Self {
            enabled: store.get_flag(defaults::POMODORO_ENABLED).unwrap_or(false),
            frequency_minutes: store.get_number(defaults::POMODORO_FREQUENCY),
            break_minutes: store.get_number(defaults::POMODORO_BREAK_TIME),
            start_hour: store.get_number(defaults::POMODORO_START_HOUR).and_then(hour),
            end_hour: store.get_number(defaults::POMODORO_END_HOUR).and_then(hour),
        }
    }

    pub fn work_period(&self) -> Option<Duration> {
        self.frequency_minutes.and_then(minutes_to_duration)
    }

    pub fn break_period(&self) -> Option<Duration> {
        self.break_minutes.and_then(minutes_to_duration)
    }
}

fn hour(n: f64) -> Option<u32> {
    (n.fract() == 0.0 && (0.0..=23.0).contains(&n)).then_some(n as u32)
}

/// Positive, finite, representable minute counts only.
fn minutes_to_duration(minutes: f64) -> Option<Duration> {
    if !(minutes.is_finite() && minutes > 0.0) {
        return None;
    }
    let ms = (minutes * 60_000.0).round();
    if ms < 1.0 || ms >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(ms as i64)
}
