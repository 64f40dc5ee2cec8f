//! Scheduler loop driving the orchestrator.
//!
//! 1. Wakes every poll interval (missed ticks are delayed, never bunched).
//! 2. Collects the triggers that came due since they last fired.
//! 3. Consults the calendar; weekends and holidays are logged and skipped.
//! 4. Otherwise runs the orchestrator inline, so runs never overlap.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use comunica_rules::{CalendarEvaluator, SkipDecision, TriggerScheduler};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::orchestrator::{RunError, RunOrchestrator, RunReport};
use crate::source::SpoolSource;

/// What a scheduler tick resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickAction {
    Idle,
    Skipped {
        triggers: Vec<String>,
        verdict: SkipDecision,
    },
    Run {
        triggers: Vec<String>,
    },
}

/// Record due triggers and gate them through the calendar.
///
/// Triggers are recorded as fired whether or not the day is skipped.
pub fn evaluate_tick(
    scheduler: &mut TriggerScheduler,
    calendar: &CalendarEvaluator,
    now: DateTime<Utc>,
) -> TickAction {
    let triggers = scheduler.take_due(now);
    if triggers.is_empty() {
        return TickAction::Idle;
    }
    let verdict = calendar.should_skip_at(now);
    if verdict.skip() {
        TickAction::Skipped { triggers, verdict }
    } else {
        TickAction::Run { triggers }
    }
}

pub struct Service {
    orchestrator: RunOrchestrator,
    calendar: CalendarEvaluator,
    scheduler: TriggerScheduler,
    spool_dir: PathBuf,
    poll_interval: Duration,
}

impl Service {
    pub fn new(
        orchestrator: RunOrchestrator,
        calendar: CalendarEvaluator,
        scheduler: TriggerScheduler,
        spool_dir: impl Into<PathBuf>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            orchestrator,
            calendar,
            scheduler,
            spool_dir: spool_dir.into(),
            poll_interval,
        }
    }

    pub fn calendar(&self) -> &CalendarEvaluator {
        &self.calendar
    }

    /// Run once now against the spool directory, without calendar gating.
    pub async fn run_now(&self) -> Result<RunReport, RunError> {
        let mut source = SpoolSource::new(&self.spool_dir);
        self.orchestrator.run(&mut source).await
    }

    /// Run once now unless today is a weekend or holiday.
    ///
    /// Returns `Ok(None)` when the calendar skipped the run.
    pub async fn run_gated(&self, now: DateTime<Utc>) -> Result<Option<RunReport>, RunError> {
        let verdict = self.calendar.should_skip_at(now);
        if let Some(reason) = &verdict.reason {
            info!(date = %verdict.date, %reason, "run skipped");
            return Ok(None);
        }
        self.run_now().await.map(Some)
    }

    /// Tick until Ctrl-C.
    pub async fn serve(mut self) -> anyhow::Result<()> {
        info!(
            triggers = self.scheduler.len(),
            timezone = %self.scheduler.timezone(),
            poll_secs = self.poll_interval.as_secs(),
            "Scheduler started"
        );
        if let Some(next) = self.scheduler.next_fire() {
            info!(
                next = %next.with_timezone(&self.scheduler.timezone()),
                "next trigger"
            );
        }

        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = &mut shutdown => {
                    info!("Scheduler stopped by user");
                    return Ok(());
                }
            }

            let now = Utc::now();
            match evaluate_tick(&mut self.scheduler, &self.calendar, now) {
                TickAction::Idle => {
                    debug!("Scheduler tick: nothing due at {}", now);
                }
                TickAction::Skipped { triggers, verdict } => {
                    let reason = verdict
                        .reason
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    info!(
                        ?triggers,
                        date = %verdict.date.format("%Y-%m-%d"),
                        "Hoje é {reason}. Execução ignorada."
                    );
                }
                TickAction::Run { triggers } => {
                    info!(?triggers, "Scheduler tick: starting run");
                    match self.run_now().await {
                        Ok(report) => info!(
                            run_id = %report.run_id,
                            processed = report.processed,
                            "run completed"
                        ),
                        Err(e) => error!(error = %e, "run failed"),
                    }
                    if let Some(next) = self.scheduler.next_fire() {
                        debug!(next = %next.with_timezone(&self.scheduler.timezone()), "next trigger");
                    }
                }
            }
        }
    }
}
