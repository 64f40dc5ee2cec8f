use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveTime;
use chrono_tz::Tz;

use crate::error::CoreError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Values accepted as "on" for boolean toggles.
const TRUTHY: &[&str] = &["1", "true", "on", "yes"];

const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";
const DEFAULT_TRIGGER_TIMES: &str = "09:00,11:00,13:00,15:00,17:00";

/// Key lookup used while building a [`Config`].
///
/// Reads `{PROFILE}_{KEY}` first when a profile is active, falling back to
/// `{KEY}`. Tests build configs from plain maps through the same path.
struct Vars<'a> {
    profile: String,
    lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl<'a> Vars<'a> {
    fn opt(&self, key: &str) -> Option<String> {
        if !self.profile.is_empty() {
            if let Some(v) = (self.lookup)(&format!("{}_{}", self.profile, key)) {
                return Some(v);
            }
        }
        (self.lookup)(key)
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.opt(key).unwrap_or_else(|| default.to_string())
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        match self.opt(key) {
            Some(v) => TRUTHY.contains(&v.to_lowercase().as_str()),
            None => default,
        }
    }

    fn parsed<T: std::str::FromStr>(&self, key: &str, default: T) -> Result<T, CoreError> {
        match self.opt(key) {
            Some(v) => v.parse().map_err(|_| CoreError::InvalidValue {
                key: key.to_string(),
                value: v,
            }),
            None => Ok(default),
        }
    }
}

// ── Top-level config ──────────────────────────────────────────

/// Process-wide configuration, read once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub delivery: DeliveryConfig,
    pub source: SourceConfig,
    pub schedule: ScheduleConfig,
    pub calendar: CalendarConfig,
    pub capture: CaptureConfig,
    pub run: RunConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `COMUNICA_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(&env_opt)
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, CoreError> {
        let profile = lookup("COMUNICA_PROFILE")
            .unwrap_or_default()
            .to_uppercase();
        let vars = Vars { profile, lookup };
        Ok(Self {
            delivery: DeliveryConfig::from_vars(&vars)?,
            source: SourceConfig::from_vars(&vars),
            schedule: ScheduleConfig::from_vars(&vars)?,
            calendar: CalendarConfig::from_vars(&vars),
            capture: CaptureConfig::from_vars(&vars),
            run: RunConfig::from_vars(&vars)?,
            profile: vars.profile,
        })
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  delivery:  smtp={}:{}, sender={}, recipients={}",
            self.delivery.smtp_host,
            self.delivery.smtp_port,
            self.delivery.sender.as_deref().unwrap_or("(none)"),
            self.delivery.recipient_list().len()
        );
        tracing::info!(
            "  source:    spool_dir={}, credentials={}",
            self.source.spool_dir.display(),
            if self.source.has_credentials() { "set" } else { "(none)" }
        );
        tracing::info!(
            "  schedule:  tz={}, times={}, poll={}s",
            self.schedule.timezone_name,
            self.schedule.times_label(),
            self.schedule.poll_interval.as_secs()
        );
        tracing::info!(
            "  calendar:  region={}, extra_dates={}",
            self.calendar.region.as_deref().unwrap_or("(national only)"),
            self.calendar.extra_holidays.len()
        );
        tracing::info!(
            "  capture:   enabled={}, dir={}",
            self.capture.enabled,
            self.capture.dir.display()
        );
        tracing::info!("  run:       max_notices={}", self.run.max_notices);
    }

    /// Return a redacted view safe for printing (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "delivery": {
                "smtp_host": self.delivery.smtp_host,
                "smtp_port": self.delivery.smtp_port,
                "smtp_tls": self.delivery.smtp_tls,
                "sender": self.delivery.sender,
                "recipients": self.delivery.recipient_list(),
                "configured": self.delivery.is_configured(),
            },
            "source": {
                "spool_dir": self.source.spool_dir,
                "credentials": self.source.has_credentials(),
            },
            "schedule": {
                "timezone": self.schedule.timezone_name,
                "times": self.schedule.times_label(),
                "poll_interval_secs": self.schedule.poll_interval.as_secs(),
                "log_file": self.schedule.log_file,
            },
            "calendar": {
                "region": self.calendar.region,
                "extra_holidays": self.calendar.extra_holidays,
            },
            "capture": { "enabled": self.capture.enabled, "dir": self.capture.dir },
            "run": { "max_notices": self.run.max_notices },
        })
    }
}

// ── Delivery (SMTP) ───────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Raw semicolon-delimited recipient list.
    pub recipients: String,
    pub sender: Option<String>,
    pub sender_password: Option<String>,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_tls: bool,
}

impl DeliveryConfig {
    fn from_vars(v: &Vars<'_>) -> Result<Self, CoreError> {
        Ok(Self {
            recipients: v.or("DESTINATARIOS", ""),
            sender: v.opt("EMAIL_REMETENTE"),
            sender_password: v.opt("SENHA_REMETENTE"),
            smtp_host: v.or("SMTP_HOST", "smtp.gmail.com"),
            smtp_port: v.parsed("SMTP_PORT", 587)?,
            smtp_tls: v.flag("SMTP_TLS", true),
        })
    }

    /// Individual addresses from the semicolon-delimited list.
    pub fn recipient_list(&self) -> Vec<String> {
        split_recipients(&self.recipients)
    }

    pub fn is_configured(&self) -> bool {
        self.sender.is_some() && !self.recipient_list().is_empty()
    }
}

/// Split a `a@x; b@y;` style list into trimmed, non-empty addresses.
pub fn split_recipients(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

// ── Retrieval source ──────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub spool_dir: PathBuf,
}

impl SourceConfig {
    fn from_vars(v: &Vars<'_>) -> Self {
        Self {
            username: v.opt("USUARIO"),
            password: v.opt("SENHA"),
            spool_dir: PathBuf::from(v.or("SPOOL_DIR", "data/spool")),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

// ── Schedule ──────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    pub timezone: Tz,
    pub timezone_name: String,
    /// Trigger times of day, in `timezone`.
    pub times: Vec<NaiveTime>,
    pub poll_interval: Duration,
    pub log_file: Option<PathBuf>,
}

impl ScheduleConfig {
    fn from_vars(v: &Vars<'_>) -> Result<Self, CoreError> {
        let timezone_name = v.or("SCHEDULER_TZ", DEFAULT_TIMEZONE);
        let timezone = parse_timezone(&timezone_name)?;
        let times = parse_trigger_times(&v.or("SCHEDULE_TIMES", DEFAULT_TRIGGER_TIMES))?;
        let poll_secs: u64 = v.parsed("SCHEDULER_POLL_SECS", 60)?;
        Ok(Self {
            timezone,
            timezone_name,
            times,
            poll_interval: Duration::from_secs(poll_secs.max(1)),
            log_file: v.opt("SCHEDULER_LOG_FILE").map(PathBuf::from),
        })
    }

    /// `"09:00, 11:00, ..."` for log lines.
    pub fn times_label(&self) -> String {
        self.times
            .iter()
            .map(|t| t.format("%H:%M").to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz, CoreError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| CoreError::InvalidTimezone(name.to_string()))
}

/// Parse a comma-separated `HH:MM` list. Duplicates are collapsed and the
/// result is sorted.
pub fn parse_trigger_times(raw: &str) -> Result<Vec<NaiveTime>, CoreError> {
    let mut times = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let t = NaiveTime::parse_from_str(part, "%H:%M")
            .map_err(|_| CoreError::InvalidTriggerTime(part.to_string()))?;
        times.push(t);
    }
    times.sort();
    times.dedup();
    if times.is_empty() {
        return Err(CoreError::InvalidTriggerTime(raw.to_string()));
    }
    Ok(times)
}

// ── Holiday calendar ──────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CalendarConfig {
    /// Optional state code for regional holidays (e.g. "RJ").
    pub region: Option<String>,
    /// Raw `YYYY-MM-DD` entries; validated when the calendar is built.
    pub extra_holidays: Vec<String>,
}

impl CalendarConfig {
    fn from_vars(v: &Vars<'_>) -> Self {
        Self {
            region: v.opt("FERIADOS_UF").map(|s| s.to_uppercase()),
            extra_holidays: v
                .or("FERIADOS_CUSTOM", "")
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

// ── Debug capture ─────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub enabled: bool,
    pub dir: PathBuf,
}

impl CaptureConfig {
    fn from_vars(v: &Vars<'_>) -> Self {
        Self {
            enabled: v.flag("DEBUG_CAPTURE", false),
            dir: PathBuf::from(v.or("DEBUG_CAPTURE_DIR", "debug")),
        }
    }
}

// ── Run limits ────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Maximum notices handled in one run (0 = unlimited).
    pub max_notices: usize,
}

impl RunConfig {
    fn from_vars(v: &Vars<'_>) -> Result<Self, CoreError> {
        Ok(Self {
            max_notices: v.parsed("MAX_NOTICES_PER_RUN", 500)?,
        })
    }
}
