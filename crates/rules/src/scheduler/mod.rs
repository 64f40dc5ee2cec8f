//! Time-of-day triggers evaluated in a civil timezone.
//!
//! Each configured time becomes a daily cron expression. The
//! [`TriggerScheduler`] tracks when each trigger last fired and reports which
//! ones are due; the polling loop that drives it lives in the runner.
//!
//! Triggers start "fired" at process start, so nothing that was due before
//! the process came up fires retroactively.

mod core;
pub(crate) mod cron;
mod entry;

#[cfg(test)]
mod tests;

pub use self::core::{ScheduleError, TriggerScheduler};
pub use self::entry::TriggerEntry;
