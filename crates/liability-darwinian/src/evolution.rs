//! A single evolutionary run: Interaction Round → Replication, repeated
//! until the generation budget is spent or the shares settle.

use liability_common::{LiabilityRegime, Result, Strategy, StrategyShares};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::interaction::InteractionRound;
use crate::population::{GenerationRecord, Population};
use crate::replication::{ConvergencePolicy, Replicator};

/// Result of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Distribution after the last generation
    pub final_shares: StrategyShares,
    /// Generations executed
    pub generations: u64,
    /// Whether the convergence tolerance stopped the run early
    pub converged: bool,
    /// Per-generation snapshots, empty unless tracing was requested
    pub trajectory: Vec<GenerationRecord>,
}

impl RunOutcome {
    pub fn safe_share(&self) -> f64 {
        self.final_shares.get(Strategy::Safe)
    }
}

/// Drives one population through its generations
pub struct EvolutionRun<'a, R: InteractionRound> {
    round: &'a R,
    replicator: Replicator,
    policy: ConvergencePolicy,
    record_trajectory: bool,
}

impl<'a, R: InteractionRound> EvolutionRun<'a, R> {
    pub fn new(round: &'a R, replicator: Replicator, policy: ConvergencePolicy) -> Self {
        Self {
            round,
            replicator,
            policy,
            record_trajectory: false,
        }
    }

    /// Keep a snapshot of every generation in the outcome
    pub fn with_trajectory(mut self) -> Self {
        self.record_trajectory = true;
        self
    }

    #[instrument(skip(self, population), fields(size = population.size()))]
    pub fn execute(
        &self,
        population: &mut Population,
        regime: LiabilityRegime,
        audit_probability: f64,
    ) -> Result<RunOutcome> {
        let mut trajectory = Vec::new();
        if self.record_trajectory {
            trajectory.push(population.record());
        }

        let mut converged = false;
        let mut previous_change = None;
        while !self.policy.budget_exhausted(population.generation()) {
            let shares = population.current_shares();
            let fitness = self.round.fitness(&shares, regime, audit_probability);
            let next = self
                .replicator
                .next_shares(&shares, &fitness, population.generation())?;

            population.apply_next_generation(next)?;
            if self.record_trajectory {
                trajectory.push(population.record());
            }

            let change = shares.max_abs_diff(&next);
            if self.policy.has_converged(previous_change, change) {
                converged = true;
                break;
            }
            previous_change = Some(change);
        }

        let outcome = RunOutcome {
            final_shares: population.current_shares(),
            generations: population.generation(),
            converged,
            trajectory,
        };
        debug!(
            generations = outcome.generations,
            converged,
            safe_share = outcome.safe_share(),
            "run finished"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::MeanFieldRound;
    use crate::payoff::{PayoffModel, PayoffParams, PenaltySchedule};
    use liability_common::{LiabilityError, SHARE_TOLERANCE};

    fn round() -> MeanFieldRound {
        MeanFieldRound::new(PayoffModel::default(), 400.0)
    }

    #[test]
    fn test_budget_bounds_generations() {
        let round = round();
        let run = EvolutionRun::new(&round, Replicator::new(0.001), ConvergencePolicy::fixed(25));
        let mut pop = Population::initialize(1000, StrategyShares::pure(Strategy::Lazy)).unwrap();
        let outcome = run.execute(&mut pop, LiabilityRegime::Joint, 0.5).unwrap();
        assert_eq!(outcome.generations, 25);
        assert!(!outcome.converged);
        assert!(outcome.trajectory.is_empty());
    }

    #[test]
    fn test_trajectory_stays_normalised() {
        let round = round();
        let run = EvolutionRun::new(&round, Replicator::new(0.001), ConvergencePolicy::fixed(200))
            .with_trajectory();
        let mut pop = Population::initialize(1000, StrategyShares::uniform()).unwrap();
        let outcome = run.execute(&mut pop, LiabilityRegime::Limited, 0.7).unwrap();
        assert_eq!(outcome.trajectory.len(), 201);
        assert_eq!(outcome.trajectory[0].generation, 0);
        assert!(outcome
            .trajectory
            .iter()
            .all(|r| r.shares.is_normalized(SHARE_TOLERANCE)));
    }

    #[test]
    fn test_early_stop_on_convergence() {
        let round = round();
        let run = EvolutionRun::new(
            &round,
            Replicator::new(0.001),
            ConvergencePolicy::until_converged(100_000, 1e-10),
        );
        let mut pop = Population::initialize(1000, StrategyShares::uniform()).unwrap();
        let outcome = run.execute(&mut pop, LiabilityRegime::Joint, 1.0).unwrap();
        assert!(outcome.converged);
        assert!(outcome.generations < 100_000);
        assert!(outcome.safe_share() > 0.95);
    }

    #[test]
    fn test_coarse_tolerance_escapes_all_lazy_start() {
        let round = round();
        let run = EvolutionRun::new(
            &round,
            Replicator::new(0.001),
            ConvergencePolicy::until_converged(800, 1e-3),
        );
        let mut pop = Population::initialize(1000, StrategyShares::pure(Strategy::Lazy)).unwrap();
        let outcome = run.execute(&mut pop, LiabilityRegime::Joint, 1.0).unwrap();
        assert!(outcome.converged);
        assert!(outcome.generations > 1);
        assert!(outcome.safe_share() > 0.95, "safe share {}", outcome.safe_share());
    }

    #[test]
    fn test_degenerate_run_reports_error() {
        let params = PayoffParams {
            limited: PenaltySchedule::new(200.0, 0.0),
            ..Default::default()
        };
        let round = MeanFieldRound::new(PayoffModel::new(params), 0.0);
        let run = EvolutionRun::new(&round, Replicator::new(0.001), ConvergencePolicy::fixed(10));
        let mut pop = Population::initialize(1000, StrategyShares::pure(Strategy::Lazy)).unwrap();
        let err = run.execute(&mut pop, LiabilityRegime::Limited, 1.0).unwrap_err();
        assert!(matches!(
            err,
            LiabilityError::DegenerateFitness { generation: 0, .. }
        ));
    }
}
