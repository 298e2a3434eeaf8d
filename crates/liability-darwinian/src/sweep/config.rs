//! Sweep configuration
//!
//! An explicit, immutable bundle of every constant a sweep needs. Validated
//! once, before any computation.

use liability_common::{AuditGrid, LiabilityError, LiabilityRegime, Result, DEFAULT_POPULATION_SIZE};
use serde::{Deserialize, Serialize};

use crate::interaction::MeanFieldRound;
use crate::payoff::{PayoffModel, PayoffParams};
use crate::population::{InitialDistribution, Population};
use crate::replication::{ConvergencePolicy, Replicator};
use crate::EvolutionParams;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Agents per population
    pub population_size: u64,
    /// Starting distribution of every run
    pub initial: InitialDistribution,
    /// Audit probabilities to sample
    pub grid: AuditGrid,
    /// Regimes to sweep, in output order
    pub regimes: Vec<LiabilityRegime>,
    /// Economic constants
    pub payoff: PayoffParams,
    /// Background fitness and mutation
    pub evolution: EvolutionParams,
    /// Generation budget and optional early stop
    pub convergence: ConvergencePolicy,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            initial: InitialDistribution::default(),
            grid: AuditGrid::default(),
            regimes: LiabilityRegime::ALL.to_vec(),
            payoff: PayoffParams::default(),
            evolution: EvolutionParams::default(),
            convergence: ConvergencePolicy::default(),
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<()> {
        if self.regimes.is_empty() {
            return Err(LiabilityError::config("at least one regime is required"));
        }
        for (i, regime) in self.regimes.iter().enumerate() {
            if self.regimes[..i].contains(regime) {
                return Err(LiabilityError::config(format!(
                    "regime {regime} listed twice"
                )));
            }
        }
        self.grid.validate()?;
        self.payoff.validate()?;
        self.evolution.validate()?;
        self.convergence.validate()?;
        Population::initialize(self.population_size, self.initial.shares())?;
        Ok(())
    }

    pub fn payoff_model(&self) -> PayoffModel {
        PayoffModel::new(self.payoff)
    }

    pub fn round(&self) -> MeanFieldRound {
        MeanFieldRound::new(self.payoff_model(), self.evolution.background_fitness)
    }

    pub fn replicator(&self) -> Replicator {
        Replicator::new(self.evolution.mutation_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liability_common::StrategyShares;

    #[test]
    fn test_default_config_valid() {
        let config = SweepConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.population_size, 1000);
        assert_eq!(config.grid.points, 20);
        assert_eq!(config.initial, InitialDistribution::AllLazy);
    }

    #[test]
    fn test_rejects_bad_initial_shares() {
        let config = SweepConfig {
            initial: InitialDistribution::Shares {
                shares: StrategyShares::new([0.7, 0.7]),
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(LiabilityError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_regime() {
        let config = SweepConfig {
            regimes: vec![LiabilityRegime::Joint, LiabilityRegime::Joint],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_regimes() {
        let config = SweepConfig {
            regimes: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = SweepConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: SweepConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
