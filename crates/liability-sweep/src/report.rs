//! Human-readable table and JSON report for the plotting step

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use liability_common::{LiabilityRegime, SAFETY_TARGET};
use liability_darwinian::SweepResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{RunnerConfig, SweepMode};

/// Audit probability at which a regime first exceeds the safety target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crossing {
    pub regime: LiabilityRegime,
    pub audit_probability: Option<f64>,
}

/// Everything the plotting collaborator needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub mode: SweepMode,
    pub safety_target: f64,
    pub crossings: Vec<Crossing>,
    pub efficiency_gap: Option<f64>,
    pub config: RunnerConfig,
    pub result: SweepResult,
}

impl SweepReport {
    pub fn new(config: &RunnerConfig, result: SweepResult) -> Self {
        let crossings = regimes(config)
            .iter()
            .map(|regime| Crossing {
                regime: *regime,
                audit_probability: result.threshold_crossing(*regime, SAFETY_TARGET),
            })
            .collect();

        Self {
            report_id: Uuid::now_v7(),
            generated_at: Utc::now(),
            mode: config.mode,
            safety_target: SAFETY_TARGET,
            crossings,
            efficiency_gap: result.efficiency_gap(SAFETY_TARGET),
            config: config.clone(),
            result,
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?;
        Ok(())
    }
}

fn regimes(config: &RunnerConfig) -> &[LiabilityRegime] {
    &config.sweep.regimes
}

fn cell(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_nan() => "  undef ".to_string(),
        Some(v) => format!("  {v:0.3}  "),
        None => "    -   ".to_string(),
    }
}

/// Print the `AuditProb | <regime> | ...` table
pub fn print_table(config: &RunnerConfig, report: &SweepReport) {
    let regimes = regimes(config);
    let columns: Vec<Vec<f64>> = regimes
        .iter()
        .map(|r| report.result.safe_shares(*r))
        .collect();

    println!();
    println!(
        "Liability sweep ({}): {} agents, {} audit probabilities",
        report.mode, config.sweep.population_size, config.sweep.grid.points
    );
    let header: Vec<String> = regimes.iter().map(|r| format!("{:^8}", r.to_string())).collect();
    println!("AuditProb  |{}", header.join("|"));
    println!("{}", "-".repeat(11 + 9 * regimes.len()));

    for (i, p) in config.sweep.grid.values().iter().enumerate() {
        let row: Vec<String> = columns.iter().map(|col| cell(col.get(i).copied())).collect();
        println!("{p:0.2}       |{}", row.join("|"));
    }

    println!();
    for crossing in &report.crossings {
        match crossing.audit_probability {
            Some(p) => println!(
                "  {:<8} reaches {:.0}% safe at audit probability {:.1}%",
                crossing.regime.to_string(),
                SAFETY_TARGET * 100.0,
                p * 100.0
            ),
            None => println!(
                "  {:<8} never reaches {:.0}% safe",
                crossing.regime.to_string(),
                SAFETY_TARGET * 100.0
            ),
        }
    }
    if let Some(gap) = report.efficiency_gap {
        println!("  Efficiency gap: {:.1} percentage points of audit probability", gap * 100.0);
    }
    println!();
}
