//! Liability Sweep Binary
//!
//! Runs the audit-probability sweep for every liability regime and writes
//! the efficiency-gap table for plotting.

mod config;
mod report;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use liability_common::VERSION;
use liability_darwinian::{AgentBasedSweep, SweepDriver, SweepMetrics, SweepResult};

use crate::config::{RunnerConfig, SweepMode};
use crate::report::SweepReport;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Liability Lab sweep v{}", VERSION);

    let config = RunnerConfig::load()?;
    info!(mode = %config.mode, concurrent = config.concurrent, "loaded configuration");

    let registry = prometheus::Registry::new();
    let metrics = Arc::new(SweepMetrics::new()?);
    metrics.register(&registry)?;

    let result = run(&config, metrics.clone()).await?;

    let report = SweepReport::new(&config, result);
    report::print_table(&config, &report);
    report.write_json(&config.output)?;
    info!(
        path = %config.output.display(),
        report_id = %report.report_id,
        "report written"
    );

    info!(
        runs = metrics.runs_total.get(),
        degenerate = metrics.degenerate_runs_total.get(),
        generations = metrics.generations_total.get(),
        "sweep metrics"
    );

    Ok(())
}

async fn run(config: &RunnerConfig, metrics: Arc<SweepMetrics>) -> Result<SweepResult> {
    match config.mode {
        SweepMode::MeanField => {
            let driver = SweepDriver::new(config.sweep.clone())?.with_metrics(metrics);
            let result = if config.concurrent {
                driver.run_concurrent().await?
            } else {
                driver.run()?
            };
            Ok(result)
        }
        SweepMode::AgentBased => {
            let sweep = AgentBasedSweep::new(
                config.sweep.payoff,
                config.agents,
                config.sweep.grid,
                config.sweep.regimes.clone(),
            )?;
            Ok(tokio::task::spawn_blocking(move || sweep.run()).await?)
        }
    }
}
