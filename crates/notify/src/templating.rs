//! Minijinja templates for the outbound messages.
//!
//! Three messages exist: a forwarded notice, the end-of-run summary and the
//! failure alert. Templates are registered once with an `.html` name so
//! minijinja auto-escapes every interpolated value; pre-rendered fragments
//! (the formatted log) are passed in as safe strings.

use minijinja::{Environment, Value};
use serde::Serialize;

use crate::report::{escape, LogFormatter};
use crate::traits::{Notification, NotifyError};

const FORWARD_TEMPLATE: &str = r#"<p>Prezados,</p>
<p>Segue abaixo o comunica ({{ notice.id }} - {{ notice.subject }}) extraído da automação:</p>
<div style="border: 1px solid #ccc; padding: 10px; font-family: monospace; background-color: #f9f9f9;">
    {{ notice.body | nl2br }}
</div>
<p>---</p>
<p>Este é um e-mail automático.</p>
"#;

const SUMMARY_TEMPLATE: &str = r#"<div style="font-family: Arial, sans-serif; line-height: 1.6;">
    <h3>Log de Processamento do Robô</h3>
    <p>Análise só com Palavras Chave</p>
    <p>Execução finalizada em: {{ finished_at }}</p>
    <hr>
    <div style="border: 1px solid #ddd; padding: 15px; border-radius: 5px; background-color: #f9f9f9;">
        {{ log_html }}
    </div>
    <hr>
    <p>Este é um e-mail de resumo automático.</p>
</div>
"#;

const FAILURE_TEMPLATE: &str = r#"<div style="font-family:Arial, sans-serif; line-height:1.5">
  <h3>🛑 Falha na Automação</h3>
  <p><b>Host:</b> {{ host }}</p>
  <p><b>Erro:</b> <code>{{ error }}</code></p>
  {%- if causes %}
  <p><b>Causas:</b></p>
  <pre style="white-space:pre-wrap">{% for c in causes %}{{ c }}
{% endfor %}</pre>
  {%- endif %}
  <hr>
  <h4>Log parcial da execução</h4>
  <div style="border:1px solid #ddd; padding:10px; background:#f9f9f9">{{ log_html }}</div>
</div>
"#;

/// Stand-in when the partial log cannot be rendered inside an alert.
pub const LOG_UNAVAILABLE: &str = "<i>(Falha ao formatar log)</i>";

/// The notice fields a forwarded message shows.
#[derive(Debug, Clone, Serialize)]
pub struct ForwardContext<'a> {
    pub id: &'a str,
    pub subject: &'a str,
    pub body: &'a str,
}

/// Renders the three outbound messages.
#[derive(Debug)]
pub struct ReportRenderer {
    env: Environment<'static>,
    formatter: LogFormatter,
}

impl ReportRenderer {
    pub fn new() -> Result<Self, NotifyError> {
        let mut env = Environment::new();
        env.add_filter("nl2br", nl2br_filter);
        env.add_template("forward.html", FORWARD_TEMPLATE)?;
        env.add_template("summary.html", SUMMARY_TEMPLATE)?;
        env.add_template("failure.html", FAILURE_TEMPLATE)?;
        let formatter =
            LogFormatter::new().map_err(|e| NotifyError::Template(e.to_string()))?;
        Ok(Self { env, formatter })
    }

    pub fn formatter(&self) -> &LogFormatter {
        &self.formatter
    }

    /// Render the log entries as an HTML fragment.
    pub fn log_html<S: AsRef<str>>(&self, entries: &[S]) -> String {
        self.formatter.format(entries)
    }

    /// Message forwarding one notice. `date` is `dd/mm/YYYY`.
    pub fn forward(&self, notice: &ForwardContext<'_>, date: &str) -> Result<Notification, NotifyError> {
        let body = self
            .env
            .get_template("forward.html")?
            .render(minijinja::context! { notice => notice })?;
        let subject = format!(
            "Comunica ({} - {}) Processado Automaticamente - {}",
            notice.id, notice.subject, date
        );
        Ok(Notification::new(subject, body)
            .with_meta("kind", "forward")
            .with_meta("notice_id", notice.id))
    }

    /// End-of-run summary. `date` is `dd/mm/YYYY`, `time` is `HH:MM:SS`.
    pub fn summary<S: AsRef<str>>(
        &self,
        entries: &[S],
        date: &str,
        time: &str,
    ) -> Result<Notification, NotifyError> {
        let log_html = Value::from_safe_string(self.log_html(entries));
        let body = self
            .env
            .get_template("summary.html")?
            .render(minijinja::context! {
                log_html => log_html,
                finished_at => Value::from_safe_string(format!("{date} às {time}")),
            })?;
        let subject = format!("Log da Automação de Comunicas às {date} {time}");
        Ok(Notification::new(subject, body).with_meta("kind", "summary"))
    }

    /// Failure alert carrying the partial log.
    ///
    /// `log_html` is the pre-rendered log, or `None` when rendering failed.
    pub fn failure(
        &self,
        host: &str,
        error: &str,
        causes: &[String],
        log_html: Option<String>,
    ) -> Result<Notification, NotifyError> {
        let log_html = Value::from_safe_string(log_html.unwrap_or_else(|| LOG_UNAVAILABLE.to_string()));
        let body = self
            .env
            .get_template("failure.html")?
            .render(minijinja::context! {
                host => host,
                error => error,
                causes => causes,
                log_html => log_html,
            })?;
        let subject = format!("🛑 Falha na Automação (host {host})");
        Ok(Notification::new(subject, body).with_meta("kind", "failure"))
    }
}

/// Escape, then turn line breaks into `<br>`.
fn nl2br_filter(value: String) -> Value {
    Value::from_safe_string(escape(&value).replace("\r\n", "\n").replace('\n', "<br>"))
}
