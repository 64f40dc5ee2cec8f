//! Report-log formatting.
//!
//! Turns the plain lines of a run log into an HTML fragment:
//! - blank lines are dropped, the rest are escaped and trimmed
//! - `--- ID do comunica <n> ---` highlights only the number
//! - `--- Verificando a lista de comunicas... ---` opens a section (`<h4>`),
//!   preceded by a dashed rule unless it is the first section of the run
//! - bracketed status tags get a fixed color accent
//!
//! Lines are joined with `<br>`, in append order.

use minijinja::HtmlEscape;
use regex::Regex;

const ID_HIGHLIGHT: &str =
    "background-color: #fcf8e3; padding: 2px 5px; border-radius: 3px;";
const SECTION_MARKER: &str = "--- Verificando a lista de comunicas...";
const SECTION_SEPARATOR: &str =
    r#"<hr style="border: none; border-top: 1px dashed #ccc; margin: 20px 0;">"#;

/// Status tag to accent color, checked in this order.
const STATUS_ACCENTS: &[(&str, &str)] = &[
    ("[BLOQUEADO]", "#d9534f"),
    ("[ENVIO DE EMAIL PARA ANALISE]", "#5cb85c"),
    ("[INFORMATIVO]", "#5bc0de"),
    ("[ENVIO PRIORITÁRIO]", "#bc0ec7"),
    ("[ERRO]", "#a94442"),
];

/// Pure log-to-HTML formatter.
#[derive(Debug, Clone)]
pub struct LogFormatter {
    id_line: Regex,
}

impl LogFormatter {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            id_line: Regex::new(r"(--- ID do comunica )(\d+)( ---)")?,
        })
    }

    pub fn format<S: AsRef<str>>(&self, entries: &[S]) -> String {
        let mut html_lines: Vec<String> = Vec::with_capacity(entries.len());
        let mut seen_section = false;

        for entry in entries {
            let entry = entry.as_ref();
            if entry.trim().is_empty() {
                continue;
            }
            let line = escape(entry);
            let line = line.trim();

            let formatted = if let Some(caps) = self.id_line.captures(line) {
                format!(
                    r#"{}<b style="{ID_HIGHLIGHT}">{}</b>{}"#,
                    &caps[1], &caps[2], &caps[3]
                )
            } else if line.contains(SECTION_MARKER) {
                if seen_section {
                    html_lines.push(SECTION_SEPARATOR.to_string());
                }
                seen_section = true;
                format!("<h4>{line}</h4>")
            } else if let Some((_, color)) =
                STATUS_ACCENTS.iter().find(|(tag, _)| line.contains(tag))
            {
                format!(r#"<div style="color: {color}; font-weight: bold;">{line}</div>"#)
            } else {
                line.to_string()
            };
            html_lines.push(formatted);
        }

        html_lines.join("<br>")
    }
}

/// Escape markup-significant characters.
pub fn escape(text: &str) -> String {
    HtmlEscape(text).to_string()
}

/// Split a plain-text log (one entry per line) into entries.
pub fn entries_from_text(text: &str) -> Vec<&str> {
    text.lines().collect()
}
