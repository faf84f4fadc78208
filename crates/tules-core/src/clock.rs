//! Time source for the bridge.
//!
//! Readings carry both the instant and the local UTC offset in effect at
//! that instant: deadlines are compared as instants, while the active
//! window looks at the local hour. Tests swap in [`ManualClock`].

use chrono::{DateTime, Duration, FixedOffset, Local};
use std::sync::{Arc, Mutex};

pub trait Clock: Send {
    /// Current instant, expressed in the local offset.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Milliseconds since the Unix epoch.
    fn epoch_ms(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<FixedOffset>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<FixedOffset>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Jump to `to`. The offset may differ from the previous reading, which
    /// is how tests model a DST or timezone change.
    pub fn set(&self, to: DateTime<FixedOffset>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
