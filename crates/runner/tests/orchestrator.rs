//! Orchestrator runs against in-memory collaborators.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use comunica_core::Notice;
use comunica_notify::{Notification, Notifier, NotifyError, ReportRenderer};
use comunica_rules::DecisionResolver;
use comunica_runner::{DebugCapture, NoticeSource, RunError, RunOrchestrator, SourceError};

// ── Mocks ───────────────────────────────────────────────────────────

#[derive(Default)]
struct MockSource {
    queue: VecDeque<Notice>,
    acked: Arc<Mutex<Vec<String>>>,
    close_count: Arc<AtomicUsize>,
    fetches: usize,
    /// Fetch number (1-based) that fails with an I/O error.
    fail_on_fetch: Option<usize>,
    panic_on_fetch: Option<usize>,
}

impl MockSource {
    fn with(notices: &[(&str, &str, &str)]) -> Self {
        Self {
            queue: notices
                .iter()
                .map(|(id, subject, body)| Notice::new(*id, *subject, *body))
                .collect(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl NoticeSource for MockSource {
    async fn has_next(&mut self) -> Result<bool, SourceError> {
        Ok(!self.queue.is_empty())
    }

    async fn fetch_next(&mut self) -> Result<Notice, SourceError> {
        self.fetches += 1;
        if self.fail_on_fetch == Some(self.fetches) {
            return Err(SourceError::Io {
                path: "remote/inbox".into(),
                source: std::io::Error::new(std::io::ErrorKind::TimedOut, "page load timed out"),
            });
        }
        if self.panic_on_fetch == Some(self.fetches) {
            panic!("selector vanished");
        }
        self.queue.front().cloned().ok_or(SourceError::Empty)
    }

    async fn acknowledge(&mut self, notice: &Notice) -> Result<(), SourceError> {
        self.queue.pop_front();
        self.acked.lock().unwrap().push(notice.id.clone());
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SourceError> {
        self.close_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[derive(Default)]
struct MockNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
    attempts: Arc<AtomicUsize>,
    /// Forwards for this notice id fail.
    fail_notice: Option<String>,
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_notice.is_some() && notification.meta("notice_id") == self.fail_notice.as_deref() {
            return Err(NotifyError::Smtp("mailbox unavailable".into()));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "mock"
    }
}

fn orchestrator(notifier: MockNotifier) -> RunOrchestrator {
    RunOrchestrator::new(
        Arc::new(DecisionResolver::standard().unwrap()),
        ReportRenderer::new().unwrap(),
        Arc::new(notifier),
    )
    .with_host("test-host")
}

fn kinds(sent: &Arc<Mutex<Vec<Notification>>>) -> Vec<String> {
    sent.lock()
        .unwrap()
        .iter()
        .map(|n| n.meta("kind").unwrap_or("?").to_string())
        .collect()
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn blocked_notices_are_not_forwarded() {
    let notifier = MockNotifier::default();
    let sent = notifier.sent.clone();
    let mut source = MockSource::with(&[
        ("101", "Queda", "SIAFERIO fora do ar desde as 9h"),
        ("102", "Fornecedor", "Boleto vencido"),
        ("103", "Reunião", "Reunião sobre novos procedimentos"),
    ]);
    let acked = source.acked.clone();
    let closed = source.close_count.clone();

    let report = orchestrator(notifier).run(&mut source).await.unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!(report.forwarded, 2);
    assert_eq!(report.blocked, 1);
    assert_eq!(report.delivery_failures, 0);
    assert_eq!(*acked.lock().unwrap(), vec!["101", "102", "103"]);
    assert_eq!(closed.load(Ordering::SeqCst), 1);

    assert_eq!(kinds(&sent), vec!["forward", "forward", "summary"]);
    let sent = sent.lock().unwrap();
    assert!(sent[0].subject.starts_with("Comunica (101 - Queda) Processado Automaticamente - "));
    assert_eq!(sent[1].meta("notice_id"), Some("103"));

    let summary = &sent[2].body;
    assert!(summary.contains("[ENVIO PRIORITÁRIO] Problemas SIAFERIO detectado"));
    assert!(summary.contains("Assunto impeditivo: &#x27;Boleto&#x2f;Credor&#x27;"));
    assert!(summary.contains("[ENVIO DE EMAIL PARA ANALISE]"));
    assert!(summary.contains("Fim da lista detectado"));
    assert!(summary.contains("Fim do processamento de todos os comunicas"));
    assert!(summary.contains(">101</b>"));
}

#[tokio::test]
async fn failed_forward_is_logged_and_run_continues() {
    let notifier = MockNotifier {
        fail_notice: Some("1".into()),
        ..MockNotifier::default()
    };
    let sent = notifier.sent.clone();
    let attempts = notifier.attempts.clone();
    let mut source = MockSource::with(&[
        ("1", "A", "Erro crítico no sistema"),
        ("2", "B", "Nova versão do manual"),
    ]);

    let report = orchestrator(notifier).run(&mut source).await.unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(report.forwarded, 1);
    assert_eq!(report.delivery_failures, 1);
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert_eq!(kinds(&sent), vec!["forward", "summary"]);
    let summary = sent.lock().unwrap()[1].body.clone();
    assert!(summary.contains("[ERRO] Falha ao enviar e-mail do comunica 1: SMTP delivery failed: mailbox unavailable"));
}

#[tokio::test]
async fn retrieval_failure_alerts_then_summarizes() {
    let notifier = MockNotifier::default();
    let sent = notifier.sent.clone();
    let mut source = MockSource::with(&[
        ("1", "A", "Reunião geral"),
        ("2", "B", "Outra reunião"),
    ]);
    source.fail_on_fetch = Some(2);
    let closed = source.close_count.clone();

    let err = orchestrator(notifier).run(&mut source).await.unwrap_err();

    assert!(matches!(err, RunError::Retrieval(SourceError::Io { .. })));
    assert_eq!(closed.load(Ordering::SeqCst), 1);
    assert_eq!(kinds(&sent), vec!["forward", "failure", "summary"]);

    let sent = sent.lock().unwrap();
    let alert = &sent[1];
    assert_eq!(alert.subject, "🛑 Falha na Automação (host test-host)");
    assert!(alert.body.contains("page load timed out"));
    assert!(alert.body.contains("Análise do Comunica ID"));
    assert!(sent[2].body.contains("Execução interrompida"));
}

#[tokio::test]
async fn panic_inside_run_still_finalizes() {
    let notifier = MockNotifier::default();
    let sent = notifier.sent.clone();
    let mut source = MockSource::with(&[("1", "A", "x")]);
    source.panic_on_fetch = Some(1);
    let closed = source.close_count.clone();

    let err = orchestrator(notifier).run(&mut source).await.unwrap_err();

    assert!(matches!(&err, RunError::Panicked(msg) if msg == "selector vanished"));
    assert_eq!(closed.load(Ordering::SeqCst), 1);
    assert_eq!(kinds(&sent), vec!["failure", "summary"]);
}

#[tokio::test]
async fn cap_stops_after_n_notices() {
    let notifier = MockNotifier::default();
    let sent = notifier.sent.clone();
    let mut source = MockSource::with(&[
        ("1", "A", "Boleto"),
        ("2", "B", "Boleto"),
        ("3", "C", "Boleto"),
    ]);
    let acked = source.acked.clone();

    let report = orchestrator(notifier)
        .with_max_notices(2)
        .run(&mut source)
        .await
        .unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(report.blocked, 2);
    assert_eq!(*acked.lock().unwrap(), vec!["1", "2"]);
    assert_eq!(source.queue.len(), 1);
    let summary = sent.lock().unwrap()[0].body.clone();
    assert!(summary.contains("Limite de 2 comunicas"));
}

#[tokio::test]
async fn empty_queue_still_sends_summary() {
    let notifier = MockNotifier::default();
    let sent = notifier.sent.clone();
    let mut source = MockSource::default();

    let report = orchestrator(notifier).run(&mut source).await.unwrap();

    assert_eq!(report.processed, 0);
    assert_eq!(kinds(&sent), vec!["summary"]);
    let summary = &sent.lock().unwrap()[0];
    assert!(summary.subject.starts_with("Log da Automação de Comunicas às "));
    // A single cycle: no separator before the only heading.
    assert_eq!(summary.body.matches("<h4>").count(), 1);
    assert!(!summary.body.contains("dashed"));
}

#[tokio::test]
async fn capture_writes_notice_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let notifier = MockNotifier::default();
    let mut source = MockSource::with(&[("55", "A", "Boleto")]);

    let report = orchestrator(notifier)
        .with_capture(DebugCapture::enabled_at(dir.path()))
        .run(&mut source)
        .await
        .unwrap();

    assert!(dir.path().join("notice-55.txt").exists());
    assert!(dir.path().join(format!("report-{}.html", report.run_id)).exists());
}
