//! adr-sync entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse inputs** from flags or the GitHub Actions environment and
//!    validate them into [`reconcile::SyncSettings`].
//! 2. **Wire observability** with a JSON `tracing-subscriber` layer and, when
//!    configured, an OpenTelemetry OTLP exporter.
//! 3. **Decode the triggering event** through the [`listener`] crate.
//! 4. **Construct infrastructure** (one [`github::GithubClient`] serving as
//!    both stores) and run a single [`reconcile::SyncEngine`] pass.
//!
//! A failed run prints an `::error::` workflow command and exits with 1.

mod config;
mod telemetry;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::{error, info};

use github::GithubClient;
use reconcile::{RunSummary, SyncEngine};

use crate::config::Args;

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => return report_invalid_args(err),
    };

    let telemetry = match telemetry::init() {
        Ok(telemetry) => telemetry,
        Err(err) => {
            println!("{}", workflow_error(&format!("{err:#}")));
            return ExitCode::FAILURE;
        }
    };

    let outcome = run(&args).await;
    if let Err(err) = &outcome {
        let message = format!("{err:#}");
        error!(error = %message, "Synchronisation failed");
        println!("{}", workflow_error(&message));
    }

    telemetry.shutdown();
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

async fn run(args: &Args) -> Result<()> {
    let settings = args.settings()?;

    let event = listener::read_event(&args.event_name, &args.event_path)
        .await
        .context("Failed to read the triggering event")?;
    let Some(event) = event else {
        info!(event = %args.event_name, "Event does not require synchronisation");
        return Ok(());
    };

    let client = GithubClient::new(args.github_config(settings.repository.clone()))
        .context("Failed to construct the GitHub client")?;
    let summary = SyncEngine::new(&client, &client, &settings)
        .run(&event)
        .await?;

    match summary {
        RunSummary::Scanned(outcomes) => {
            let changed = outcomes.iter().filter(|o| !o.result.is_noop()).count();
            info!(documents = outcomes.len(), changed, "Synchronised ADRs to discussions");
        }
        RunSummary::Routed(Some(result)) => {
            info!(?result, "Synchronised discussion to ADR");
        }
        RunSummary::Routed(None) => {
            info!("Discussion is not an ADR discussion");
        }
    }
    Ok(())
}

/// Help and version requests print as usual; any other parse failure becomes
/// a workflow annotation.
fn report_invalid_args(err: clap::Error) -> ExitCode {
    if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        err.exit();
    }
    println!("{}", workflow_error(&invalid_args_message(&err)));
    ExitCode::FAILURE
}

fn invalid_args_message(err: &clap::Error) -> String {
    format!("Invalid action inputs: {}", err.render().to_string().trim_end())
}

/// An `::error::` workflow command; `%`, CR and LF are escaped so multi-line
/// error chains stay one annotation.
fn workflow_error(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{escaped}")
}
