//! Per-trigger schedule entry.

use chrono::{DateTime, NaiveTime, Utc};
use cron::Schedule;

/// Scheduling state for one time-of-day trigger.
#[derive(Debug, Clone)]
pub struct TriggerEntry {
    /// `HH:MM` label, also the lookup key.
    pub label: String,
    pub time_of_day: NaiveTime,
    /// 6-field cron expression derived from `time_of_day`.
    pub cron_expression: String,
    pub(crate) schedule: Schedule,
    /// Last fire, or process start if it never fired.
    pub last_triggered: DateTime<Utc>,
}
