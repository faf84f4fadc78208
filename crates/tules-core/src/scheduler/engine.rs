use chrono::{DateTime, Duration, FixedOffset, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::window::ActiveWindow;
use crate::storage::{ConfigStore, ScheduleConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    fn next(self) -> Self {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerState {
    Disarmed,
    Armed,
}

/// Title/body pair handed to the notification dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    /// Phase whose end produced this reminder.
    pub phase_ended: Phase,
    pub title: String,
    pub body: String,
}

impl Reminder {
    fn for_phase_end(ended: Phase, work: Duration, rest: Duration) -> Self {
        match ended {
            Phase::Work => Self {
                phase_ended: ended,
                title: "Time for a break".to_string(),
                body: format!("Take a {} minute break.", format_minutes(rest)),
            },
            Phase::Break => Self {
                phase_ended: ended,
                title: "Back to work".to_string(),
                body: format!(
                    "Your {} minute break is over. Next break in {} minutes.",
                    format_minutes(rest),
                    format_minutes(work)
                ),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    OutsideWindow { hour: u32 },
}

/// Result of a single [`Scheduler::tick`].
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Disarmed, or the deadline has not passed yet.
    NotDue,
    /// Deadline passed and a reminder should be shown.
    Fired(Reminder),
    /// Deadline passed but the reminder was suppressed. The cycle advanced anyway.
    Skipped(SkipReason),
}

/// The one outstanding recurring timer.
///
/// Not `Clone`: the scheduler holds the only instance and replaces it
/// wholesale on every rearm. The deadline is an instant, so local clock
/// jumps (DST, timezone changes) don't stretch or shrink a period.
#[derive(Debug, PartialEq, Eq)]
pub struct TimerHandle {
    generation: u64,
    phase: Phase,
    work: Duration,
    rest: Duration,
    due_at: DateTime<Utc>,
}

impl TimerHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }

    /// Length of the phase currently being timed.
    pub fn period(&self) -> Duration {
        self.period_of(self.phase)
    }

    fn period_of(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Work => self.work,
            Phase::Break => self.rest,
        }
    }
}

/// Work/break reminder scheduler.
///
/// Time is always passed in by the caller, which keeps the state machine
/// free of threads and easy to drive in tests. Deadlines are kept in UTC;
/// the offset on `now` is only used for the active window's hour check.
#[derive(Debug, Default)]
pub struct Scheduler {
    timer: Option<TimerHandle>,
    generations: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SchedulerState {
        if self.timer.is_some() {
            SchedulerState::Armed
        } else {
            SchedulerState::Disarmed
        }
    }

    pub fn timer(&self) -> Option<&TimerHandle> {
        self.timer.as_ref()
    }

    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.timer.as_ref().map(TimerHandle::due_at)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Arm from the current configuration.
    ///
    /// Calling this on an armed scheduler behaves like [`refresh_config`](Self::refresh_config).
    pub fn init(&mut self, store: &ConfigStore, now: DateTime<FixedOffset>) -> SchedulerState {
        self.refresh_config(store, now)
    }

    /// Cancel the live timer, then arm a fresh one from the current
    /// configuration. The only reconfiguration path.
    pub fn refresh_config(
        &mut self,
        store: &ConfigStore,
        now: DateTime<FixedOffset>,
    ) -> SchedulerState {
        if let Some(old) = self.timer.take() {
            debug!(generation = old.generation, "timer canceled");
        }

        let cfg = ScheduleConfig::from_store(store);
        if !cfg.enabled {
            info!("reminders disabled, scheduler disarmed");
            return SchedulerState::Disarmed;
        }

        let (Some(work), Some(rest)) = (cfg.work_period(), cfg.break_period()) else {
            warn!(
                frequency = ?cfg.frequency_minutes,
                break_minutes = ?cfg.break_minutes,
                "invalid reminder periods, scheduler disarmed"
            );
            return SchedulerState::Disarmed;
        };

        let Some(due_at) = now.to_utc().checked_add_signed(work) else {
            warn!("reminder period out of range, scheduler disarmed");
            return SchedulerState::Disarmed;
        };

        self.generations += 1;
        let window = ActiveWindow::from_config(&cfg);
        if window.is_empty() {
            warn!(
                start = ?cfg.start_hour,
                end = ?cfg.end_hour,
                "active window is empty; reminders will stay silent"
            );
        }
        info!(
            generation = self.generations,
            work_min = work.num_minutes(),
            break_min = rest.num_minutes(),
            %due_at,
            "timer armed"
        );
        self.timer = Some(TimerHandle {
            generation: self.generations,
            phase: Phase::Work,
            work,
            rest,
            due_at,
        });
        SchedulerState::Armed
    }

    /// Advance the cycle if the deadline has passed.
    ///
    /// `enabled` and the active window are read from `store` here, at fire
    /// time. A suppressed reminder still moves the cycle to the next phase.
    pub fn tick(&mut self, store: &ConfigStore, now: DateTime<FixedOffset>) -> TickOutcome {
        let Some(timer) = self.timer.as_mut() else {
            return TickOutcome::NotDue;
        };
        let instant = now.to_utc();
        if instant < timer.due_at {
            return TickOutcome::NotDue;
        }

        let ended = timer.phase;
        let next_phase = ended.next();
        let next_period = timer.period_of(next_phase);
        let reminder = Reminder::for_phase_end(ended, timer.work, timer.rest);

        // Anchor on the previous deadline to avoid drift; re-anchor on `now`
        // if we slept through the whole next period.
        let next_due = timer
            .due_at
            .checked_add_signed(next_period)
            .filter(|due| *due > instant)
            .or_else(|| instant.checked_add_signed(next_period));

        match next_due {
            Some(due_at) => {
                timer.phase = next_phase;
                timer.due_at = due_at;
                debug!(generation = timer.generation, phase = ?next_phase, %due_at, "timer rescheduled");
            }
            None => {
                warn!("next deadline out of range, scheduler disarmed");
                self.timer = None;
            }
        }

        let cfg = ScheduleConfig::from_store(store);
        if !cfg.enabled {
            debug!("tick while disabled, reminder skipped");
            return TickOutcome::Skipped(SkipReason::Disabled);
        }

        // Local hour at the instant of firing, in whatever offset is current.
        let hour = now.hour();
        if !ActiveWindow::from_config(&cfg).contains(hour) {
            debug!(hour, "tick outside active window, reminder skipped");
            return TickOutcome::Skipped(SkipReason::OutsideWindow { hour });
        }

        TickOutcome::Fired(reminder)
    }

    /// Drop the live timer. Used on process exit.
    pub fn shutdown(&mut self) {
        if let Some(old) = self.timer.take() {
            info!(generation = old.generation, "scheduler shut down");
        }
    }
}

fn format_minutes(d: Duration) -> String {
    let ms = d.num_milliseconds();
    if ms % 60_000 == 0 {
        (ms / 60_000).to_string()
    } else {
        format!("{:.1}", ms as f64 / 60_000.0)
    }
}
