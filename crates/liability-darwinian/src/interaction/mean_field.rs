//! Mean-field interaction: analytic expectation over random pairings
//!
//! Agents are treated as infinitely divisible shares, so instead of drawing
//! pairs the expected payoff of S is Σ_O x(O) · π(S, O). Trajectories are
//! deterministic and free of sampling noise.

use liability_common::{LiabilityRegime, Strategy, StrategyShares};

use super::{InteractionRound, StrategyFitness};
use crate::payoff::PayoffModel;

/// Deterministic interaction round over strategy shares
#[derive(Debug, Clone, Copy)]
pub struct MeanFieldRound {
    model: PayoffModel,
    background_fitness: f64,
}

impl MeanFieldRound {
    pub fn new(model: PayoffModel, background_fitness: f64) -> Self {
        Self {
            model,
            background_fitness,
        }
    }

    pub fn model(&self) -> &PayoffModel {
        &self.model
    }

    /// Expected game payoff of `focal` against the current mix
    pub fn expected_payoff(
        &self,
        focal: Strategy,
        shares: &StrategyShares,
        regime: LiabilityRegime,
        audit_probability: f64,
    ) -> f64 {
        shares
            .iter()
            .map(|(opponent, x)| x * self.model.payoff(focal, opponent, regime, audit_probability))
            .sum()
    }
}

impl InteractionRound for MeanFieldRound {
    fn fitness(
        &self,
        shares: &StrategyShares,
        regime: LiabilityRegime,
        audit_probability: f64,
    ) -> StrategyFitness {
        StrategyFitness::from_fn(|focal| {
            self.background_fitness + self.expected_payoff(focal, shares, regime, audit_probability)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liability_common::BACKGROUND_FITNESS;

    fn round() -> MeanFieldRound {
        MeanFieldRound::new(PayoffModel::default(), BACKGROUND_FITNESS)
    }

    #[test]
    fn test_zero_audit_lazy_fitter() {
        let round = round();
        for regime in LiabilityRegime::ALL {
            for shares in [StrategyShares::uniform(), StrategyShares::pure(Strategy::Lazy)] {
                let fitness = round.fitness(&shares, regime, 0.0);
                assert!(fitness[Strategy::Lazy] > fitness[Strategy::Safe]);
            }
        }
    }

    #[test]
    fn test_full_audit_joint_safe_fitter() {
        let round = round();
        let fitness = round.fitness(&StrategyShares::pure(Strategy::Lazy), LiabilityRegime::Joint, 1.0);
        assert!(fitness[Strategy::Safe] > fitness[Strategy::Lazy]);
        // Own penalty (200) outweighs the cost saving (20)
        assert!((fitness.advantage(Strategy::Safe, Strategy::Lazy) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_expected_payoff_weights_opponents() {
        let round = round();
        let shares = StrategyShares::new([0.5, 0.5]);
        // Safe vs safe = 80, safe vs lazy (joint, p=1) = -120
        let expected = round.expected_payoff(Strategy::Safe, &shares, LiabilityRegime::Joint, 1.0);
        assert!((expected + 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_fitness_positive_everywhere() {
        let round = round();
        for regime in LiabilityRegime::ALL {
            for p in [0.0, 0.5, 1.0] {
                let fitness = round.fitness(&StrategyShares::pure(Strategy::Lazy), regime, p);
                assert!(Strategy::ALL.iter().all(|s| fitness[*s] > 0.0));
            }
        }
    }
}
