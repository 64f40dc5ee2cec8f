//! Debug capture of retrieved notices and rendered reports.
//!
//! Off by default. Write failures are logged and swallowed.

use std::path::{Path, PathBuf};

use comunica_core::config::CaptureConfig;
use comunica_core::Notice;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct DebugCapture {
    dir: Option<PathBuf>,
}

impl DebugCapture {
    pub fn disabled() -> Self {
        Self { dir: None }
    }

    pub fn enabled_at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: Some(dir.into()) }
    }

    pub fn from_config(config: &CaptureConfig) -> Self {
        if config.enabled {
            Self::enabled_at(&config.dir)
        } else {
            Self::disabled()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub async fn notice(&self, notice: &Notice) {
        let contents = format!(
            "id: {}\nsubject: {}\n\n{}\n",
            notice.id, notice.subject, notice.body
        );
        self.write(&format!("notice-{}.txt", sanitize(&notice.id)), &contents)
            .await;
    }

    /// `kind` is `report` or `failure`.
    pub async fn report(&self, kind: &str, run_id: &str, html: &str) {
        self.write(&format!("{kind}-{run_id}.html"), html).await;
    }

    async fn write(&self, file_name: &str, contents: &str) {
        let Some(dir) = &self.dir else { return };
        if let Err(e) = tokio::fs::create_dir_all(dir).await {
            warn!(dir = %dir.display(), error = %e, "debug capture directory unavailable");
            return;
        }
        let path = dir.join(file_name);
        match tokio::fs::write(&path, contents).await {
            Ok(()) => debug!(path = %path.display(), "debug capture written"),
            Err(e) => warn!(path = %path.display(), error = %e, "debug capture failed"),
        }
    }
}

/// Keep capture file names inside the capture directory.
fn sanitize(id: &str) -> String {
    let cleaned: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() { "sem-id".to_string() } else { cleaned }
}
