//! [`TriggerScheduler`]: due-tracking for the configured trigger times.

use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use tracing::debug;

use super::cron::{daily_cron, is_cron_due, next_fire};
use super::entry::TriggerEntry;

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("invalid cron expression '{expression}': {source}")]
    InvalidCron {
        expression: String,
        #[source]
        source: cron::error::Error,
    },

    #[error("no trigger times configured")]
    Empty,
}

/// Fixed list of daily triggers in one timezone.
///
/// The list never changes after construction; only `last_triggered` moves.
#[derive(Debug, Clone)]
pub struct TriggerScheduler {
    timezone: Tz,
    entries: Vec<TriggerEntry>,
}

impl TriggerScheduler {
    /// Build one entry per time of day. `started_at` seeds every
    /// `last_triggered`.
    pub fn new(
        times: &[NaiveTime],
        timezone: Tz,
        started_at: DateTime<Utc>,
    ) -> Result<Self, ScheduleError> {
        if times.is_empty() {
            return Err(ScheduleError::Empty);
        }
        let entries = times
            .iter()
            .map(|&time| {
                let expression = daily_cron(time);
                let schedule = Schedule::from_str(&expression).map_err(|source| {
                    ScheduleError::InvalidCron {
                        expression: expression.clone(),
                        source,
                    }
                })?;
                Ok(TriggerEntry {
                    label: time.format("%H:%M").to_string(),
                    time_of_day: time,
                    cron_expression: expression,
                    schedule,
                    last_triggered: started_at,
                })
            })
            .collect::<Result<Vec<_>, ScheduleError>>()?;
        Ok(Self { timezone, entries })
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Whether the trigger with `label` should fire at `now`.
    pub fn is_due(&self, label: &str, now: DateTime<Utc>) -> bool {
        self.get(label)
            .is_some_and(|e| is_cron_due(&e.schedule, self.timezone, now, e.last_triggered))
    }

    /// Labels of all triggers due at `now`, in time-of-day order.
    pub fn due(&self, now: DateTime<Utc>) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| is_cron_due(&e.schedule, self.timezone, now, e.last_triggered))
            .map(|e| e.label.as_str())
            .collect()
    }

    /// Record every due trigger as fired at `now` and return their labels.
    ///
    /// Triggers that became due together (after a slow run, say) coalesce:
    /// the caller runs once for all of them.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<String> {
        let due: Vec<String> = self.due(now).into_iter().map(String::from).collect();
        for label in &due {
            self.record_trigger_at(label, now);
        }
        if due.len() > 1 {
            debug!(triggers = ?due, "coalescing due triggers into one run");
        }
        due
    }

    pub fn record_trigger_at(&mut self, label: &str, at: DateTime<Utc>) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.label == label) {
            entry.last_triggered = at;
        }
    }

    /// Earliest upcoming fire across all triggers.
    pub fn next_fire(&self) -> Option<DateTime<Utc>> {
        self.entries
            .iter()
            .filter_map(|e| next_fire(&e.schedule, self.timezone, e.last_triggered))
            .min()
    }

    pub fn get(&self, label: &str) -> Option<&TriggerEntry> {
        self.entries.iter().find(|e| e.label == label)
    }

    pub fn entries(&self) -> &[TriggerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
