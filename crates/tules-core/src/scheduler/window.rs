use serde::{Deserialize, Serialize};

use crate::storage::ScheduleConfig;

/// Hour-of-day range `[start, end)` in which reminders may fire.
///
/// No wraparound: `start >= end` is an empty window, as is a missing or
/// out-of-range bound. Ticks outside the window are silent but keep the
/// cycle going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveWindow {
    pub start: Option<u32>,
    pub end: Option<u32>,
}

impl ActiveWindow {
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn from_config(cfg: &ScheduleConfig) -> Self {
        Self {
            start: cfg.start_hour,
            end: cfg.end_hour,
        }
    }

    pub fn contains(&self, hour: u32) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= hour && hour < end,
            _ => false,
        }
    }

    /// True when no hour can ever match.
    pub fn is_empty(&self) -> bool {
        !matches!((self.start, self.end), (Some(s), Some(e)) if s < e)
    }
}
