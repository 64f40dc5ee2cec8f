//! Run gate: weekends and holidays in the configured civil timezone.
//!
//! The holiday set covers a three-year window around process start and is
//! never rebuilt while the process is up. A process that stays alive across
//! a year boundary keeps using the window it started with.

pub mod brazil;

use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

use comunica_core::config::CalendarConfig;

/// Name given to caller-supplied dates.
pub const CUSTOM_HOLIDAY: &str = "Feriado (customizado)";

/// Dated, named holidays for a window of years plus extra dates.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    days: BTreeMap<NaiveDate, String>,
}

impl HolidayCalendar {
    /// National holidays for `years`, the region's table when one exists,
    /// and `extras` regardless of year.
    pub fn build(years: RangeInclusive<i32>, region: Option<&str>, extras: &[NaiveDate]) -> Self {
        let mut cal = Self::default();
        let region = region.map(str::trim).filter(|r| !r.is_empty());

        if let Some(code) = region {
            if !brazil::KNOWN_REGIONS.contains(&code) {
                tracing::warn!(region = code, "no regional holiday table; using national holidays only");
            }
        }

        for year in years {
            for (date, name) in brazil::national(year) {
                cal.insert(date, name);
            }
            if let Some(days) = region.and_then(|code| brazil::regional(code, year)) {
                for (date, name) in days {
                    cal.insert(date, name);
                }
            }
        }
        for date in extras {
            cal.insert(*date, CUSTOM_HOLIDAY);
        }
        cal
    }

    /// Previous, current and next year around `year`.
    pub fn around(year: i32, region: Option<&str>, extras: &[NaiveDate]) -> Self {
        Self::build(year - 1..=year + 1, region, extras)
    }

    // Same-day holidays from different tables share one entry.
    fn insert(&mut self, date: NaiveDate, name: &str) {
        self.days
            .entry(date)
            .and_modify(|existing| {
                if !existing.split(", ").any(|n| n == name) {
                    existing.push_str(", ");
                    existing.push_str(name);
                }
            })
            .or_insert_with(|| name.to_string());
    }

    pub fn name(&self, date: NaiveDate) -> Option<&str> {
        self.days.get(&date).map(String::as_str)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &str)> {
        self.days.iter().map(|(d, n)| (*d, n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Parse `YYYY-MM-DD` entries, skipping (and logging) malformed ones.
pub fn parse_extra_holidays<S: AsRef<str>>(raw: &[S]) -> Vec<NaiveDate> {
    raw.iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(e) => {
                tracing::warn!(value = s, error = %e, "invalid extra holiday date, ignoring");
                None
            }
        })
        .collect()
}

/// Why a day is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Weekend,
    Holiday(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Weekend => write!(f, "fim de semana"),
            SkipReason::Holiday(name) => write!(f, "{name}"),
        }
    }
}

/// Calendar verdict for one civil date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipDecision {
    pub date: NaiveDate,
    pub reason: Option<SkipReason>,
}

impl SkipDecision {
    pub fn skip(&self) -> bool {
        self.reason.is_some()
    }
}

/// Decides whether a scheduled run may proceed on a given day.
#[derive(Debug, Clone)]
pub struct CalendarEvaluator {
    timezone: Tz,
    holidays: HolidayCalendar,
}

impl CalendarEvaluator {
    pub fn new(timezone: Tz, holidays: HolidayCalendar) -> Self {
        Self { timezone, holidays }
    }

    /// Build the three-year window around `now` (in `timezone`) from config.
    pub fn from_config(config: &CalendarConfig, timezone: Tz, now: DateTime<Utc>) -> Self {
        let year = now.with_timezone(&timezone).year();
        let extras = parse_extra_holidays(config.extra_holidays.as_slice());
        let holidays = HolidayCalendar::around(year, config.region.as_deref(), &extras);
        tracing::info!(
            window = %format!("{}..={}", year - 1, year + 1),
            region = config.region.as_deref().unwrap_or("-"),
            extra = extras.len(),
            holidays = holidays.len(),
            "holiday calendar built"
        );
        Self::new(timezone, holidays)
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn holidays(&self) -> &HolidayCalendar {
        &self.holidays
    }

    /// Civil date of `instant` in the configured timezone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.timezone).date_naive()
    }

    /// Weekend first, then holidays.
    pub fn should_skip(&self, date: NaiveDate) -> SkipDecision {
        let reason = if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            Some(SkipReason::Weekend)
        } else {
            self.holidays
                .name(date)
                .map(|name| SkipReason::Holiday(name.to_string()))
        };
        SkipDecision { date, reason }
    }

    pub fn should_skip_at(&self, instant: DateTime<Utc>) -> SkipDecision {
        self.should_skip(self.local_date(instant))
    }
}
