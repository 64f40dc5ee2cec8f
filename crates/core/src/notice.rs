use serde::{Deserialize, Serialize};

/// A single inbound notice as handed over by the retrieval side.
///
/// The body is kept exactly as retrieved; matching works on a separately
/// normalized copy so the original text can be forwarded untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub id: String,
    pub subject: String,
    pub body: String,
}

impl Notice {
    pub fn new(id: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into().trim().to_string(),
            subject: subject.into().trim().to_string(),
            body: body.into().trim().to_string(),
        }
    }

    /// `"<id> - <subject>"`, the label used in subjects and log lines.
    pub fn label(&self) -> String {
        format!("{} - {}", self.id, self.subject)
    }

    /// Whether the identifier is purely numeric (the usual case for the
    /// upstream inbox).
    pub fn has_numeric_id(&self) -> bool {
        !self.id.is_empty() && self.id.chars().all(|c| c.is_ascii_digit())
    }
}
