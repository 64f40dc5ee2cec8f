//! Retrieval side of a run.
//!
//! The orchestrator only sees [`NoticeSource`]. The bundled adapter reads a
//! spool directory: `pending/*.json` files are handed out in file-name order
//! and moved to `processed/` once acknowledged. Files that fail to decode are
//! moved to `rejected/` so a single bad file cannot wedge every later run.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use comunica_core::Notice;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed notice file {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No pending notice to fetch")]
    Empty,

    #[error("Notice '{0}' was not fetched from this source")]
    UnknownNotice(String),
}

/// Pending-notice queue as seen by a run.
#[async_trait]
pub trait NoticeSource: Send {
    /// Whether another notice is waiting.
    async fn has_next(&mut self) -> Result<bool, SourceError>;

    /// Take the next pending notice. It stays pending until acknowledged.
    async fn fetch_next(&mut self) -> Result<Notice, SourceError>;

    /// Mark a fetched notice as read.
    async fn acknowledge(&mut self, notice: &Notice) -> Result<(), SourceError>;

    /// Release whatever the source holds. Called once at the end of every run.
    async fn close(&mut self) -> Result<(), SourceError> {
        Ok(())
    }

    fn name(&self) -> &str;
}

/// Spool file shape. Every field is optional on disk; a missing id falls back
/// to the file stem.
#[derive(Debug, Deserialize)]
struct SpoolRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    body: String,
}

/// Directory-backed notice queue.
#[derive(Debug)]
pub struct SpoolSource {
    root: PathBuf,
    queue: VecDeque<PathBuf>,
    in_flight: Vec<(String, PathBuf)>,
}

impl SpoolSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            queue: VecDeque::new(),
            in_flight: Vec::new(),
        }
    }

    pub fn pending_dir(&self) -> PathBuf {
        self.root.join("pending")
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.root.join("processed")
    }

    pub fn rejected_dir(&self) -> PathBuf {
        self.root.join("rejected")
    }

    async fn rescan(&mut self) -> Result<(), SourceError> {
        let pending = self.pending_dir();
        tokio::fs::create_dir_all(&pending)
            .await
            .map_err(|source| SourceError::Io { path: pending.clone(), source })?;

        let mut entries = tokio::fs::read_dir(&pending)
            .await
            .map_err(|source| SourceError::Io { path: pending.clone(), source })?;
        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| SourceError::Io { path: pending.clone(), source })?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && !self.in_flight.iter().any(|(_, p)| p == &path)
            {
                files.push(path);
            }
        }
        files.sort();
        self.queue = files.into();
        Ok(())
    }

    async fn move_into(&self, path: &Path, dir: PathBuf) -> Result<(), SourceError> {
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| SourceError::Io { path: dir.clone(), source })?;
        let target = match path.file_name() {
            Some(name) => dir.join(name),
            None => return Err(SourceError::UnknownNotice(path.display().to_string())),
        };
        tokio::fs::rename(path, &target)
            .await
            .map_err(|source| SourceError::Io { path: path.to_path_buf(), source })
    }
}

#[async_trait]
impl NoticeSource for SpoolSource {
    async fn has_next(&mut self) -> Result<bool, SourceError> {
        self.rescan().await?;
        Ok(!self.queue.is_empty())
    }

    async fn fetch_next(&mut self) -> Result<Notice, SourceError> {
        if self.queue.is_empty() {
            self.rescan().await?;
        }
        let path = self.queue.pop_front().ok_or(SourceError::Empty)?;

        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| SourceError::Io { path: path.clone(), source })?;
        let record: SpoolRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(source) => {
                if let Err(e) = self.move_into(&path, self.rejected_dir()).await {
                    warn!(path = %path.display(), error = %e, "could not set malformed spool file aside");
                }
                return Err(SourceError::Decode { path, source });
            }
        };

        let fallback_id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let notice = Notice::new(
            record.id.unwrap_or(fallback_id),
            record.subject,
            record.body,
        );
        debug!(notice_id = %notice.id, path = %path.display(), "notice fetched from spool");
        self.in_flight.push((notice.id.clone(), path));
        Ok(notice)
    }

    async fn acknowledge(&mut self, notice: &Notice) -> Result<(), SourceError> {
        let idx = self
            .in_flight
            .iter()
            .position(|(id, _)| id == &notice.id)
            .ok_or_else(|| SourceError::UnknownNotice(notice.id.clone()))?;
        let (_, path) = self.in_flight.remove(idx);
        self.move_into(&path, self.processed_dir()).await?;
        debug!(notice_id = %notice.id, "notice acknowledged");
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SourceError> {
        if !self.in_flight.is_empty() {
            warn!(
                unacknowledged = self.in_flight.len(),
                "closing spool with notices still in flight"
            );
        }
        self.in_flight.clear();
        self.queue.clear();
        Ok(())
    }

    fn name(&self) -> &str {
        "spool"
    }
}
