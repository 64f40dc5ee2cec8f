//! Per-run report log.
//!
//! An append-only list of plain lines owned by one run. Nothing is dropped or
//! reordered here; blank lines are filtered only when the report is rendered.
//! Every appended line is mirrored to `tracing` at info level.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RunLog {
    run_id: String,
    started_at: DateTime<Utc>,
    entries: Vec<String>,
}

impl RunLog {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            started_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    /// Append one line.
    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::info!(run_id = %self.run_id, "{}", line.trim());
        self.entries.push(line);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
