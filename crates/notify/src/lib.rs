//! Outbound messages for the notice triage run.
//!
//! This crate provides:
//! - `Notifier` trait for pluggable delivery channels
//! - SMTP email notifier
//! - Report-log formatting to HTML
//! - Minijinja templates for forwarded notices, run summaries and failure alerts

pub mod email;
pub mod report;
pub mod templating;
pub mod traits;

pub use email::EmailNotifier;
pub use report::LogFormatter;
pub use templating::{ForwardContext, ReportRenderer};
pub use traits::{Notification, Notifier, NotifyError};
