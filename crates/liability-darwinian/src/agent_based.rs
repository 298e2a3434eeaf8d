//! Agent-based variant: explicit agents, random pairings, social learning
//!
//! Each round every agent's wealth is reset, agents are shuffled into pairs,
//! each pair is audited with probability p and paid the realised payoff.
//! Agents then imitate the richer group: if lazy agents earned more on
//! average, each safe agent switches with probability `learning_rate`, and
//! vice versa. All randomness comes from a `StdRng` seeded per run from
//! (base seed, regime, grid index, run index); there is no shared generator.

use liability_common::{
    AuditGrid, LiabilityError, LiabilityRegime, Result, Strategy, AGENT_INITIAL_SAFE_SHARE,
    DEFAULT_POPULATION_SIZE, DEFAULT_ROUNDS, DEFAULT_RUNS_PER_POINT, DEFAULT_SEED, LEARNING_RATE,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::payoff::{PayoffModel, PayoffParams};
use crate::sweep::{SweepPoint, SweepResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentBasedParams {
    /// Number of individual agents
    pub population_size: usize,
    /// Pairing/learning rounds per run
    pub rounds: u64,
    /// Independent runs averaged per grid point
    pub runs_per_point: u32,
    /// Probability an agent imitates the richer group each round
    pub learning_rate: f64,
    /// Fraction of agents starting safe
    pub initial_safe_share: f64,
    /// Base seed from which every run's seed is derived
    pub seed: u64,
}

impl Default for AgentBasedParams {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE as usize,
            rounds: DEFAULT_ROUNDS,
            runs_per_point: DEFAULT_RUNS_PER_POINT,
            learning_rate: LEARNING_RATE,
            initial_safe_share: AGENT_INITIAL_SAFE_SHARE,
            seed: DEFAULT_SEED,
        }
    }
}

impl AgentBasedParams {
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(LiabilityError::config(
                "agent-based population needs at least 2 agents",
            ));
        }
        if self.rounds == 0 || self.runs_per_point == 0 {
            return Err(LiabilityError::config(
                "rounds and runs per point must be positive",
            ));
        }
        if !(0.0..=1.0).contains(&self.learning_rate) {
            return Err(LiabilityError::config(format!(
                "learning rate must lie in [0, 1], got {}",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.initial_safe_share) {
            return Err(LiabilityError::config(format!(
                "initial safe share must lie in [0, 1], got {}",
                self.initial_safe_share
            )));
        }
        Ok(())
    }
}

/// Seed of one run, mixed with splitmix64 so neighbouring indices diverge
pub fn derive_seed(base: u64, regime: LiabilityRegime, grid_index: usize, run: u32) -> u64 {
    let mut z = base
        ^ regime.ordinal().wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (grid_index as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
        ^ (run as u64).wrapping_mul(0x1656_67B1_9E37_79F9);
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[derive(Debug, Clone, Copy)]
struct Agent {
    strategy: Strategy,
    wealth: f64,
}

/// Stochastic simulation of individual agents
#[derive(Debug, Clone)]
pub struct AgentBasedSimulation {
    model: PayoffModel,
    params: AgentBasedParams,
}

impl AgentBasedSimulation {
    pub fn new(model: PayoffModel, params: AgentBasedParams) -> Result<Self> {
        model.params().validate()?;
        params.validate()?;
        Ok(Self { model, params })
    }

    pub fn params(&self) -> &AgentBasedParams {
        &self.params
    }

    /// One run driven by the caller's random source; returns the final safe share
    pub fn run_once<R: Rng>(
        &self,
        regime: LiabilityRegime,
        audit_probability: f64,
        rng: &mut R,
    ) -> f64 {
        let n = self.params.population_size;
        let n_safe = (n as f64 * self.params.initial_safe_share).round() as usize;
        let mut agents: Vec<Agent> = (0..n)
            .map(|i| Agent {
                strategy: if i < n_safe { Strategy::Safe } else { Strategy::Lazy },
                wealth: 0.0,
            })
            .collect();
        agents.shuffle(rng);

        for _ in 0..self.params.rounds {
            for agent in agents.iter_mut() {
                agent.wealth = 0.0;
            }

            agents.shuffle(rng);
            for pair in agents.chunks_exact_mut(2) {
                let audited = rng.gen::<f64>() < audit_probability;
                let (a, b) = (pair[0].strategy, pair[1].strategy);
                pair[0].wealth += self.model.realized_payoff(a, b, regime, audited);
                pair[1].wealth += self.model.realized_payoff(b, a, regime, audited);
            }

            let safe_wealth = mean_wealth(&agents, Strategy::Safe);
            let lazy_wealth = mean_wealth(&agents, Strategy::Lazy);
            let (from, to) = if lazy_wealth > safe_wealth {
                (Strategy::Safe, Strategy::Lazy)
            } else if safe_wealth > lazy_wealth {
                (Strategy::Lazy, Strategy::Safe)
            } else {
                continue;
            };

            for agent in agents.iter_mut().filter(|a| a.strategy == from) {
                if rng.gen::<f64>() < self.params.learning_rate {
                    agent.strategy = to;
                }
            }
        }

        let safe = agents.iter().filter(|a| a.strategy == Strategy::Safe).count();
        safe as f64 / n as f64
    }

    /// Mean final safe share over `runs_per_point` independently seeded runs
    pub fn run_point(
        &self,
        regime: LiabilityRegime,
        audit_probability: f64,
        grid_index: usize,
    ) -> f64 {
        let runs = self.params.runs_per_point;
        let total: f64 = (0..runs)
            .map(|run| {
                let seed = derive_seed(self.params.seed, regime, grid_index, run);
                let mut rng = StdRng::seed_from_u64(seed);
                self.run_once(regime, audit_probability, &mut rng)
            })
            .sum();
        total / runs as f64
    }
}

// Empty groups count as zero wealth
fn mean_wealth(agents: &[Agent], strategy: Strategy) -> f64 {
    let (sum, count) = agents
        .iter()
        .filter(|a| a.strategy == strategy)
        .fold((0.0, 0usize), |(sum, count), a| (sum + a.wealth, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Agent-based counterpart of the mean-field sweep
#[derive(Debug, Clone)]
pub struct AgentBasedSweep {
    simulation: AgentBasedSimulation,
    grid: AuditGrid,
    regimes: Vec<LiabilityRegime>,
}

impl AgentBasedSweep {
    pub fn new(
        payoff: PayoffParams,
        params: AgentBasedParams,
        grid: AuditGrid,
        regimes: Vec<LiabilityRegime>,
    ) -> Result<Self> {
        grid.validate()?;
        if regimes.is_empty() {
            return Err(LiabilityError::config("at least one regime is required"));
        }
        let simulation = AgentBasedSimulation::new(PayoffModel::new(payoff), params)?;
        Ok(Self {
            simulation,
            grid,
            regimes,
        })
    }

    #[instrument(skip(self))]
    pub fn run(&self) -> SweepResult {
        let params = self.simulation.params();
        info!(
            agents = params.population_size,
            rounds = params.rounds,
            runs_per_point = params.runs_per_point,
            "starting agent-based sweep"
        );

        let mut result = SweepResult::new();
        for regime in &self.regimes {
            for (index, audit_probability) in self.grid.values().into_iter().enumerate() {
                let safe_share = self.simulation.run_point(*regime, audit_probability, index);
                debug!(%regime, audit_probability, safe_share, "grid point done");
                result.push(SweepPoint {
                    regime: *regime,
                    audit_probability,
                    safe_share,
                    generations: params.rounds,
                });
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulation() -> AgentBasedSimulation {
        AgentBasedSimulation::new(PayoffModel::default(), AgentBasedParams::default()).unwrap()
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let sim = simulation();
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        assert_eq!(
            sim.run_once(LiabilityRegime::Joint, 0.3, &mut a),
            sim.run_once(LiabilityRegime::Joint, 0.3, &mut b)
        );
    }

    #[test]
    fn test_no_audit_drives_out_safe_agents() {
        let sim = simulation();
        for regime in LiabilityRegime::ALL {
            assert!(sim.run_point(regime, 0.0, 0) < 0.05);
        }
    }

    #[test]
    fn test_certain_audit_drives_out_lazy_agents() {
        let sim = simulation();
        for regime in LiabilityRegime::ALL {
            assert!(sim.run_point(regime, 1.0, 19) > 0.95);
        }
    }

    #[test]
    fn test_default_params_follow_calibration() {
        let params = AgentBasedParams::default();
        assert_eq!(params.population_size, 1000);
        assert_eq!(params.rounds, 50);
        assert_eq!(params.runs_per_point, 5);
        assert_eq!(params.learning_rate, 0.1);
        assert_eq!(params.seed, 42);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_derived_seeds_differ() {
        let base = derive_seed(42, LiabilityRegime::Limited, 0, 0);
        assert_ne!(base, derive_seed(42, LiabilityRegime::Joint, 0, 0));
        assert_ne!(base, derive_seed(42, LiabilityRegime::Limited, 1, 0));
        assert_ne!(base, derive_seed(42, LiabilityRegime::Limited, 0, 1));
        assert_eq!(base, derive_seed(42, LiabilityRegime::Limited, 0, 0));
    }

    #[test]
    fn test_rejects_invalid_params() {
        let params = AgentBasedParams {
            learning_rate: 2.0,
            ..Default::default()
        };
        assert!(AgentBasedSimulation::new(PayoffModel::default(), params).is_err());

        let params = AgentBasedParams {
            population_size: 1,
            ..Default::default()
        };
        assert!(AgentBasedSimulation::new(PayoffModel::default(), params).is_err());
    }

    #[test]
    fn test_sweep_is_reproducible() {
        let params = AgentBasedParams {
            population_size: 200,
            rounds: 20,
            runs_per_point: 2,
            ..Default::default()
        };
        let grid = AuditGrid::new(0.0, 1.0, 4).unwrap();
        let sweep = AgentBasedSweep::new(
            PayoffParams::default(),
            params,
            grid,
            LiabilityRegime::ALL.to_vec(),
        )
        .unwrap();
        let first = sweep.run();
        assert_eq!(first.len(), 8);
        assert_eq!(first, sweep.run());
    }
}
