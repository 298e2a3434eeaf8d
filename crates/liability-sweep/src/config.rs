//! Runner configuration

use std::path::PathBuf;

use anyhow::{bail, Result};
use liability_common::{AuditGrid, DEFAULT_GENERATIONS, DEFAULT_GRID_POINTS, DEFAULT_POPULATION_SIZE};
use liability_darwinian::{AgentBasedParams, ConvergencePolicy, EvolutionParams, SweepConfig};
use serde::{Deserialize, Serialize};

/// Which dynamics drive the sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SweepMode {
    /// Deterministic replicator dynamics over shares
    MeanField,
    /// Seeded individual agents with social learning
    AgentBased,
}

impl std::str::FromStr for SweepMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mean-field" | "mean_field" | "meanfield" => Ok(SweepMode::MeanField),
            "agent-based" | "agent_based" | "agents" => Ok(SweepMode::AgentBased),
            other => bail!("unknown sweep mode: {other}"),
        }
    }
}

impl std::fmt::Display for SweepMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SweepMode::MeanField => write!(f, "mean-field"),
            SweepMode::AgentBased => write!(f, "agent-based"),
        }
    }
}

/// Runner settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Dynamics to use
    pub mode: SweepMode,
    /// Sweep regimes on separate blocking tasks
    pub concurrent: bool,
    /// Where the JSON report is written
    pub output: PathBuf,
    /// Mean-field sweep settings
    pub sweep: SweepConfig,
    /// Agent-based settings
    pub agents: AgentBasedParams,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            mode: SweepMode::MeanField,
            concurrent: false,
            output: PathBuf::from("efficiency_gap.json"),
            sweep: SweepConfig::default(),
            agents: AgentBasedParams::default(),
        }
    }
}

impl RunnerConfig {
    /// Load configuration from `.env` and `LIABILITY_` environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();
        let var = |name: &str| lookup(&format!("LIABILITY_{name}"));

        if let Some(mode) = var("MODE") {
            cfg.mode = mode.parse()?;
        }
        if let Some(val) = var("CONCURRENT") {
            cfg.concurrent = parse_flag(&val)?;
        }
        if let Some(path) = var("OUTPUT") {
            cfg.output = PathBuf::from(path);
        }

        let population: u64 = parse_or(var("POPULATION_SIZE"), DEFAULT_POPULATION_SIZE)?;
        let generations: u64 = parse_or(var("GENERATIONS"), DEFAULT_GENERATIONS)?;
        let grid_points: usize = parse_or(var("GRID_POINTS"), DEFAULT_GRID_POINTS)?;

        cfg.sweep.population_size = population;
        cfg.sweep.grid = AuditGrid::new(0.0, 1.0, grid_points)?;
        cfg.sweep.convergence = match var("TOLERANCE") {
            Some(tol) => ConvergencePolicy::until_converged(generations, tol.parse()?),
            None => ConvergencePolicy::fixed(generations),
        };
        cfg.sweep.evolution = EvolutionParams {
            background_fitness: parse_or(
                var("BACKGROUND_FITNESS"),
                cfg.sweep.evolution.background_fitness,
            )?,
            mutation_rate: parse_or(var("MUTATION_RATE"), cfg.sweep.evolution.mutation_rate)?,
        };

        cfg.agents.population_size = usize::try_from(population)?;
        cfg.agents.seed = parse_or(var("SEED"), cfg.agents.seed)?;
        cfg.agents.rounds = parse_or(var("ROUNDS"), cfg.agents.rounds)?;
        cfg.agents.runs_per_point = parse_or(var("RUNS_PER_POINT"), cfg.agents.runs_per_point)?;

        Ok(cfg)
    }
}

fn parse_or<T>(value: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(v) => Ok(v.trim().parse()?),
        None => Ok(default),
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("invalid boolean flag: {other}"),
    }
}
