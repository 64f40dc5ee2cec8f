//! Scheduled notice triage.
//!
//! This crate provides:
//! - `NoticeSource` retrieval trait and the spool-directory adapter
//! - The run orchestrator (classify, forward, report, alert)
//! - Debug capture of notices and rendered reports
//! - The scheduler loop and the command-line surface

pub mod capture;
pub mod cli;
pub mod orchestrator;
pub mod service;
pub mod source;

pub use capture::DebugCapture;
pub use orchestrator::{RunError, RunOrchestrator, RunReport};
pub use service::{evaluate_tick, Service, TickAction};
pub use source::{NoticeSource, SourceError, SpoolSource};
