//! Reminder scheduler.
//!
//! The scheduler owns at most one live [`TimerHandle`]. It has no thread of
//! its own: the event loop asks for [`Scheduler::next_due`], sleeps until
//! then, and calls [`Scheduler::tick`]. Every tick re-reads the config store,
//! so `enabled` and the active window take effect without a rearm. The
//! period is captured at arm time and only changes through
//! [`Scheduler::refresh_config`].
//!
//! ## State Transitions
//!
//! ```text
//! Disarmed -> Armed(Work) -> tick -> Armed(Break) -> tick -> Armed(Work) ...
//!     ^                                                           |
//!     +--------------------- refresh_config ----------------------+
//! ```

mod engine;
mod window;

pub use engine::{Phase, Reminder, Scheduler, SchedulerState, SkipReason, TickOutcome, TimerHandle};
pub use window::ActiveWindow;
