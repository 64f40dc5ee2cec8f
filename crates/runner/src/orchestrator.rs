//! One run: drain the notice queue, classify, forward, report.
//!
//! Notices are handled strictly one at a time. Whatever happens inside the
//! loop, finalization runs: the source is closed, the summary is rendered
//! and a delivery attempt is made. A run-fatal error additionally produces a
//! failure alert before the summary goes out, then surfaces to the caller.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use comunica_core::Notice;
use comunica_notify::{ForwardContext, Notifier, NotifyError, ReportRenderer};
use comunica_rules::{DecisionResolver, RunLog};
use futures::FutureExt;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn, Instrument};

use crate::capture::DebugCapture;
use crate::source::{NoticeSource, SourceError};

pub const CYCLE_HEADER: &str = "\n--- Verificando a lista de comunicas... ---";
const QUEUE_EMPTY: &str =
    "[INFORMATIVO] Fim da lista detectado. Não há mais comunicas para processar.";
const NOTICE_PENDING: &str = "Comunica pendente encontrado na lista. Processando o primeiro...";
const FORWARDED_BANNER: &str =
    "################# E-mail do Comunica enviado ######################";
const NOT_FORWARDED_BANNER: &str =
    "################# E-mail Não enviado ######################";

#[derive(Error, Debug)]
pub enum RunError {
    #[error("notice retrieval failed: {0}")]
    Retrieval(#[from] SourceError),

    #[error("run panicked: {0}")]
    Panicked(String),

    #[error("report rendering failed: {0}")]
    Render(#[from] NotifyError),
}

/// Counters for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub processed: usize,
    pub forwarded: usize,
    pub blocked: usize,
    pub delivery_failures: usize,
}

pub struct RunOrchestrator {
    resolver: Arc<DecisionResolver>,
    renderer: ReportRenderer,
    notifier: Arc<dyn Notifier>,
    capture: DebugCapture,
    timezone: Tz,
    max_notices: usize,
    host: String,
}

impl RunOrchestrator {
    pub fn new(
        resolver: Arc<DecisionResolver>,
        renderer: ReportRenderer,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            resolver,
            renderer,
            notifier,
            capture: DebugCapture::disabled(),
            timezone: chrono_tz::America::Sao_Paulo,
            max_notices: 0,
            host: local_hostname(),
        }
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// 0 disables the cap.
    pub fn with_max_notices(mut self, max: usize) -> Self {
        self.max_notices = max;
        self
    }

    pub fn with_capture(mut self, capture: DebugCapture) -> Self {
        self.capture = capture;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Execute one run against `source`.
    pub async fn run(&self, source: &mut dyn NoticeSource) -> Result<RunReport, RunError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!("run", run_id = %run_id, source = source.name());
        self.run_inner(run_id, source).instrument(span).await
    }

    async fn run_inner(
        &self,
        run_id: String,
        source: &mut dyn NoticeSource,
    ) -> Result<RunReport, RunError> {
        let mut log = RunLog::new(run_id.clone());
        let mut report = RunReport {
            run_id,
            ..RunReport::default()
        };

        let outcome = AssertUnwindSafe(self.drain(&mut *source, &mut log, &mut report))
            .catch_unwind()
            .await;
        let result = match outcome {
            Ok(result) => result,
            Err(payload) => Err(RunError::Panicked(panic_message(payload.as_ref()))),
        };

        if let Err(e) = &result {
            error!(error = %e, "run aborted");
            log.push(format!("[ERRO] Execução interrompida: {e}"));
            self.send_failure_alert(e, &log).await;
        }

        let finalized = self.finalize(source, &mut log).await;

        info!(
            processed = report.processed,
            forwarded = report.forwarded,
            blocked = report.blocked,
            delivery_failures = report.delivery_failures,
            "run finished"
        );
        result.and(finalized).map(|()| report)
    }

    async fn drain(
        &self,
        source: &mut dyn NoticeSource,
        log: &mut RunLog,
        report: &mut RunReport,
    ) -> Result<(), RunError> {
        loop {
            if self.max_notices > 0 && report.processed >= self.max_notices {
                log.push(format!(
                    "[INFORMATIVO] Limite de {} comunicas por execução atingido.",
                    self.max_notices
                ));
                break;
            }

            log.push(CYCLE_HEADER);
            if !source.has_next().await? {
                log.push(QUEUE_EMPTY);
                break;
            }
            log.push(NOTICE_PENDING);

            let notice = source.fetch_next().await?;
            report.processed += 1;
            self.capture.notice(&notice).await;
            self.handle(&notice, log, report).await;
            source.acknowledge(&notice).await?;
        }
        Ok(())
    }

    async fn handle(&self, notice: &Notice, log: &mut RunLog, report: &mut RunReport) {
        if notice.has_numeric_id() {
            log.push(format!("--- ID do comunica {} ---", notice.id));
        }
        log.push(format!("--- Análise do Comunica ID '{}' ---", notice.label()));

        let decision = self.resolver.resolve(&notice.body);
        info!(
            notice_id = %notice.id,
            outcome = %decision.outcome,
            concept = decision.matched_concept.as_deref().unwrap_or("-"),
            "notice classified"
        );
        log.push(decision.reason.clone());

        if !decision.outcome.forwards() {
            log.push(NOT_FORWARDED_BANNER);
            report.blocked += 1;
            return;
        }

        log.push(FORWARDED_BANNER);
        match self.forward(notice).await {
            Ok(()) => report.forwarded += 1,
            Err(e) => {
                warn!(notice_id = %notice.id, error = %e, "forward failed");
                log.push(format!(
                    "[ERRO] Falha ao enviar e-mail do comunica {}: {e}",
                    notice.id
                ));
                report.delivery_failures += 1;
            }
        }
    }

    async fn forward(&self, notice: &Notice) -> Result<(), NotifyError> {
        let date = Utc::now()
            .with_timezone(&self.timezone)
            .format("%d/%m/%Y")
            .to_string();
        let message = self.renderer.forward(
            &ForwardContext {
                id: &notice.id,
                subject: &notice.subject,
                body: &notice.body,
            },
            &date,
        )?;
        self.notifier.send(&message).await
    }

    async fn send_failure_alert(&self, err: &RunError, log: &RunLog) {
        let causes = cause_chain(err);
        let log_html = std::panic::catch_unwind(AssertUnwindSafe(|| {
            self.renderer.log_html(log.entries())
        }))
        .ok();

        let alert = match self
            .renderer
            .failure(&self.host, &err.to_string(), &causes, log_html)
        {
            Ok(alert) => alert,
            Err(e) => {
                error!(error = %e, "failure alert could not be rendered");
                return;
            }
        };
        self.capture.report("failure", log.run_id(), &alert.body).await;
        match self.notifier.send(&alert).await {
            Ok(()) => info!(channel = self.notifier.channel_name(), "failure alert sent"),
            Err(e) => error!(error = %e, "failure alert delivery failed"),
        }
    }

    async fn finalize(
        &self,
        source: &mut dyn NoticeSource,
        log: &mut RunLog,
    ) -> Result<(), RunError> {
        log.push("\n--- Finalizando ciclo ---");
        match source.close().await {
            Ok(()) => log.push("Fonte de comunicas fechada."),
            Err(e) => log.push(format!("Erro ao fechar fonte: {e}")),
        }
        log.push("\n--- Fim do processamento de todos os comunicas ---");

        let now = Utc::now().with_timezone(&self.timezone);
        let date = now.format("%d/%m/%Y").to_string();
        let time = now.format("%H:%M:%S").to_string();
        let summary = self.renderer.summary(log.entries(), &date, &time)?;

        self.capture.report("report", log.run_id(), &summary.body).await;
        match self.notifier.send(&summary).await {
            Ok(()) => info!(channel = self.notifier.channel_name(), "run summary sent"),
            Err(e) => error!(error = %e, "run summary delivery failed"),
        }
        Ok(())
    }
}

/// Display strings of every error below `err` in its source chain.
pub fn cause_chain(err: &(dyn std::error::Error + 'static)) -> Vec<String> {
    let mut causes = Vec::new();
    let mut current = err.source();
    while let Some(cause) = current {
        causes.push(cause.to_string());
        current = cause.source();
    }
    causes
}

pub fn local_hostname() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "desconhecido".to_string())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cause_chain_walks_sources() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "socket timeout");
        let err = RunError::Retrieval(SourceError::Io {
            path: "spool/pending".into(),
            source: io,
        });
        let causes = cause_chain(&err);
        assert_eq!(causes.len(), 2);
        assert!(causes[0].starts_with("I/O error on spool/pending"));
        assert_eq!(causes[1], "socket timeout");
    }

    #[test]
    fn panic_payloads_become_messages() {
        assert_eq!(panic_message(&"boom"), "boom");
        assert_eq!(panic_message(&String::from("bang")), "bang");
        assert_eq!(panic_message(&42_u8), "unknown panic payload");
    }
}
