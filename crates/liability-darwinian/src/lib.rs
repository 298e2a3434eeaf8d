//! # Darwinian
//!
//! Evolutionary game engine comparing limited and joint liability regimes.
//!
//! ## Replicator Dynamics
//!
//! ```text
//! f(S)  = w₀ + Σ_O x(O) · π(S, O, regime, p)
//! x'(S) = x(S) · f(S) / f̄          where f̄ = Σ_S x(S) · f(S)
//! x''(S) = (1 − μ) · x'(S) + μ / |S|
//! ```
//!
//! Where:
//! - x: strategy share in a mean-field population
//! - π: pairwise payoff under a liability regime and audit probability p
//! - w₀: background fitness
//! - μ: mutation rate
//!
//! ## Sweep
//!
//! For every regime and every audit probability on the grid a fresh
//! population evolves for a fixed generation budget; the final safe share is
//! recorded. Degenerate runs are recorded as NaN and the sweep continues.

pub mod agent_based;
pub mod evolution;
pub mod interaction;
pub mod payoff;
pub mod population;
pub mod replication;
pub mod sweep;
pub mod telemetry;

use liability_common::{LiabilityError, Result, BACKGROUND_FITNESS, MUTATION_RATE};
use serde::{Deserialize, Serialize};

pub use agent_based::{AgentBasedParams, AgentBasedSimulation, AgentBasedSweep};
pub use evolution::{EvolutionRun, RunOutcome};
pub use interaction::{InteractionRound, MeanFieldRound, StrategyFitness};
pub use payoff::{PayoffModel, PayoffParams, PenaltySchedule};
pub use population::{GenerationRecord, InitialDistribution, Population};
pub use replication::{ConvergencePolicy, Replicator};
pub use sweep::{SweepConfig, SweepDriver, SweepPoint, SweepResult};
pub use telemetry::SweepMetrics;

/// Parameters of the evolutionary update shared by every run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvolutionParams {
    /// Baseline fitness added to every strategy's expected payoff
    pub background_fitness: f64,
    /// Per-generation exploration rate (0-1)
    pub mutation_rate: f64,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            background_fitness: BACKGROUND_FITNESS,
            mutation_rate: MUTATION_RATE,
        }
    }
}

impl EvolutionParams {
    pub fn validate(&self) -> Result<()> {
        if !self.background_fitness.is_finite() {
            return Err(LiabilityError::config("background fitness must be finite"));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(LiabilityError::config(format!(
                "mutation rate must lie in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_valid() {
        assert!(EvolutionParams::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_mutation_rate_out_of_range() {
        let params = EvolutionParams {
            mutation_rate: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(LiabilityError::Configuration(_))
        ));
    }
}
