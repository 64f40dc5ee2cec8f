//! Cron expression building and due-check helpers.

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use cron::Schedule;

/// Daily 6-field expression (`sec min hour dom month dow`) for a time of day.
pub(crate) fn daily_cron(time: NaiveTime) -> String {
    format!("0 {} {} * * *", time.minute(), time.hour())
}

/// First scheduled instant strictly after `after`, evaluated in `tz`.
pub(crate) fn next_fire(schedule: &Schedule, tz: Tz, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
    schedule
        .after(&after.with_timezone(&tz))
        .next()
        .map(|t| t.with_timezone(&Utc))
}

/// A trigger is due when its first tick after `last_run` is at or before `now`.
pub(crate) fn is_cron_due(
    schedule: &Schedule,
    tz: Tz,
    now: DateTime<Utc>,
    last_run: DateTime<Utc>,
) -> bool {
    match next_fire(schedule, tz, last_run) {
        Some(next) => next <= now,
        None => false,
    }
}
