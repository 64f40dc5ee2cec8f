//! CLI argument parsing and subcommand dispatch.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use comunica_core::Config;
use comunica_notify::report::entries_from_text;
use comunica_notify::{EmailNotifier, LogFormatter, ReportRenderer};
use comunica_rules::{CalendarEvaluator, DecisionResolver, TriggerScheduler};
use tracing::info;

use crate::capture::DebugCapture;
use crate::orchestrator::RunOrchestrator;
use crate::service::Service;

// ── CLI ─────────────────────────────────────────────────────────────

/// Notice triage runner: classifies pending notices on a schedule and mails
/// the ones that need a human.
#[derive(Parser, Debug)]
#[command(name = "comunica-runner", version, about)]
pub struct Cli {
    /// Path to a .env file loaded before the environment is read.
    #[arg(long, env = "COMUNICA_ENV_FILE")]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the scheduler loop (default).
    Serve,
    /// Run once now.
    RunOnce {
        /// Ignore the weekend/holiday calendar.
        #[arg(long)]
        force: bool,
    },
    /// Classify TEXT (or stdin) and print the decision. Nothing is sent.
    Classify { text: Option<String> },
    /// Print the calendar verdict for a date (today by default).
    CheckDate { date: Option<NaiveDate> },
    /// Render a plain-text log (one entry per line) to the HTML fragment.
    RenderLog { file: Option<PathBuf> },
    /// Print the redacted configuration as JSON.
    ShowConfig,
}

/// Run the selected subcommand.
pub async fn dispatch(config: &Config, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Serve => build_service(config)?.serve().await,
        Command::RunOnce { force } => {
            let service = build_service(config)?;
            let report = if force {
                Some(service.run_now().await?)
            } else {
                service.run_gated(Utc::now()).await?
            };
            match report {
                Some(report) => println!("{}", serde_json::to_string_pretty(&report)?),
                None => println!("skipped"),
            }
            Ok(())
        }
        Command::Classify { text } => {
            let text = match text {
                Some(text) => text,
                None => read_stdin()?,
            };
            let resolver = DecisionResolver::standard().context("pattern tables failed to compile")?;
            let decision = resolver.resolve(&text);
            println!("{}", serde_json::to_string_pretty(&decision)?);
            Ok(())
        }
        Command::CheckDate { date } => {
            let tz = config.schedule.timezone;
            let now = Utc::now();
            let calendar = CalendarEvaluator::from_config(&config.calendar, tz, now);
            let date = date.unwrap_or_else(|| calendar.local_date(now));
            let verdict = calendar.should_skip(date);
            match verdict.reason {
                Some(reason) => println!("{}: ignorado ({reason})", date.format("%Y-%m-%d")),
                None => println!("{}: executa", date.format("%Y-%m-%d")),
            }
            Ok(())
        }
        Command::RenderLog { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                None => read_stdin()?,
            };
            let formatter = LogFormatter::new()?;
            println!("{}", formatter.format(&entries_from_text(&text)));
            Ok(())
        }
        Command::ShowConfig => {
            println!("{}", serde_json::to_string_pretty(&config.redacted_summary())?);
            Ok(())
        }
    }
}

/// Wire config into a ready-to-serve [`Service`].
pub fn build_service(config: &Config) -> anyhow::Result<Service> {
    let now = Utc::now();
    let tz = config.schedule.timezone;

    let resolver = DecisionResolver::standard().context("pattern tables failed to compile")?;
    info!(
        priority = resolver.priority().len(),
        block = resolver.block().len(),
        "pattern registries compiled"
    );
    let renderer = ReportRenderer::new().context("report templates failed to load")?;
    let notifier = EmailNotifier::from_delivery(&config.delivery)
        .context("email delivery is not configured")?;

    let orchestrator = RunOrchestrator::new(Arc::new(resolver), renderer, Arc::new(notifier))
        .with_timezone(tz)
        .with_max_notices(config.run.max_notices)
        .with_capture(DebugCapture::from_config(&config.capture));

    let calendar = CalendarEvaluator::from_config(&config.calendar, tz, now);
    let scheduler = TriggerScheduler::new(&config.schedule.times, tz, now)
        .context("invalid trigger schedule")?;

    Ok(Service::new(
        orchestrator,
        calendar,
        scheduler,
        &config.source.spool_dir,
        config.schedule.poll_interval,
    ))
}

fn read_stdin() -> anyhow::Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("reading stdin")?;
    Ok(buf)
}
