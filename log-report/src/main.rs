mod analytics;
mod args;
mod error;
mod ingest;
mod invariants;
mod models;
mod report;

use analytics::Analytics;
use args::{CliArgs, OutputFormat};
use clap::Parser;
use error::ReportError;
use std::io;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ReportError> {
    init_logging();
    let args = CliArgs::parse();

    let body = ingest::load(&args.source(), args.timeout()).await?;
    let records = ingest::parse_csv(&body)?;

    let policy = args.policy();
    let report = Analytics::new(&records, &policy).report();

    let stdout = io::stdout().lock();
    match args.format() {
        OutputFormat::Text => report.write_text(stdout).map_err(ReportError::Output),
        OutputFormat::Json => report.write_json(stdout),
    }
}

/// Diagnostics go to stderr; stdout carries only the report.
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("log_report=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
