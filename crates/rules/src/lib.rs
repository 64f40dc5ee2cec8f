//! Notice classification and run gating.
//!
//! This crate provides:
//! - Accent/case normalization for matching
//! - Ordered pattern registries compiled from literal tables
//! - The three-tier decision resolver (priority, block, default)
//! - Weekend/holiday calendar for the configured timezone
//! - Time-of-day trigger scheduling
//! - The per-run report log

pub mod calendar;
pub mod normalize;
pub mod patterns;
pub mod registry;
pub mod resolver;
pub mod run_log;
pub mod scheduler;

pub use calendar::{CalendarEvaluator, HolidayCalendar, SkipDecision, SkipReason};
pub use normalize::{normalize, NoticeText};
pub use registry::{KeywordList, PatternRegistry, RegistryError, RegistryKind};
pub use resolver::{Decision, DecisionResolver, Outcome};
pub use run_log::RunLog;
pub use scheduler::TriggerScheduler;
