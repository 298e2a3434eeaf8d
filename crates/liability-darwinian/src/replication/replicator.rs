//! Replicator-mutator update
//!
//! Selection: x'(S) = x(S) · f(S) / f̄. Negative results are clipped to zero
//! and the vector renormalised; a non-positive or non-finite f̄ is degenerate.
//! Mutation: x''(S) = (1 − μ) · x'(S) + μ / |S|, which lets a strategy absent
//! from the population (e.g. an all-lazy start) be reintroduced.

use liability_common::{LiabilityError, Result, Strategy, StrategyShares};
use tracing::trace;

use crate::interaction::StrategyFitness;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Replicator {
    mutation_rate: f64,
}

impl Replicator {
    pub fn new(mutation_rate: f64) -> Self {
        Self { mutation_rate }
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Shares after selection and mutation
    pub fn next_shares(
        &self,
        shares: &StrategyShares,
        fitness: &StrategyFitness,
        generation: u64,
    ) -> Result<StrategyShares> {
        let selected = self.select(shares, fitness, generation)?;
        Ok(self.mutate(&selected))
    }

    /// Pure replicator step
    pub fn select(
        &self,
        shares: &StrategyShares,
        fitness: &StrategyFitness,
        generation: u64,
    ) -> Result<StrategyShares> {
        let mean_fitness = fitness.mean(shares);
        if !mean_fitness.is_finite() || mean_fitness <= 0.0 {
            return Err(LiabilityError::DegenerateFitness {
                mean_fitness,
                generation,
            });
        }

        let raw = StrategyShares::from_fn(|s| shares.get(s) * fitness.get(s) / mean_fitness);
        let clipped = StrategyShares::from_fn(|s| raw.get(s).max(0.0));
        let total = clipped.total();
        if !total.is_finite() || total <= 0.0 {
            return Err(LiabilityError::DegenerateFitness {
                mean_fitness,
                generation,
            });
        }
        if clipped != raw {
            trace!(generation, %raw, "clipped negative shares");
        }

        Ok(StrategyShares::from_fn(|s| clipped.get(s) / total))
    }

    /// Uniform exploration towards every strategy
    pub fn mutate(&self, shares: &StrategyShares) -> StrategyShares {
        let mu = self.mutation_rate;
        if mu == 0.0 {
            return *shares;
        }
        StrategyShares::from_fn(|s| (1.0 - mu) * shares.get(s) + mu / Strategy::COUNT as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liability_common::SHARE_TOLERANCE;
    use proptest::prelude::*;

    #[test]
    fn test_fitter_strategy_grows() {
        let replicator = Replicator::new(0.0);
        let shares = StrategyShares::uniform();
        let fitness = StrategyFitness::new([3.0, 1.0]);
        let next = replicator.next_shares(&shares, &fitness, 0).unwrap();
        assert!((next[Strategy::Safe] - 0.75).abs() < 1e-12);
        assert!((next[Strategy::Lazy] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_equal_fitness_is_fixed_point() {
        let replicator = Replicator::new(0.0);
        let shares = StrategyShares::new([0.3, 0.7]);
        let fitness = StrategyFitness::new([5.0, 5.0]);
        let next = replicator.next_shares(&shares, &fitness, 0).unwrap();
        assert!(next.max_abs_diff(&shares) < 1e-12);
    }

    #[test]
    fn test_negative_mean_is_degenerate() {
        let replicator = Replicator::new(0.001);
        let shares = StrategyShares::pure(Strategy::Lazy);
        let fitness = StrategyFitness::new([80.0, -3.0]);
        let err = replicator.next_shares(&shares, &fitness, 7).unwrap_err();
        assert!(matches!(
            err,
            LiabilityError::DegenerateFitness { generation: 7, .. }
        ));
    }

    #[test]
    fn test_zero_mean_is_degenerate() {
        let replicator = Replicator::new(0.0);
        let fitness = StrategyFitness::new([0.0, 0.0]);
        assert!(replicator
            .next_shares(&StrategyShares::uniform(), &fitness, 0)
            .is_err());
    }

    #[test]
    fn test_negative_fitness_clipped() {
        let replicator = Replicator::new(0.0);
        let shares = StrategyShares::new([0.9, 0.1]);
        let fitness = StrategyFitness::new([10.0, -5.0]);
        let next = replicator.next_shares(&shares, &fitness, 0).unwrap();
        assert_eq!(next[Strategy::Lazy], 0.0);
        assert!((next[Strategy::Safe] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mutation_reintroduces_absent_strategy() {
        let replicator = Replicator::new(0.001);
        let shares = StrategyShares::pure(Strategy::Lazy);
        let fitness = StrategyFitness::new([480.0, 500.0]);
        let next = replicator.next_shares(&shares, &fitness, 0).unwrap();
        assert!((next[Strategy::Safe] - 0.0005).abs() < 1e-12);
        assert!(next.is_normalized(SHARE_TOLERANCE));
    }

    proptest! {
        #[test]
        fn prop_output_is_normalised(
            safe in 0.0f64..=1.0,
            f_safe in 0.01f64..1000.0,
            f_lazy in 0.01f64..1000.0,
            mu in 0.0f64..=1.0,
        ) {
            let replicator = Replicator::new(mu);
            let shares = StrategyShares::new([safe, 1.0 - safe]);
            let fitness = StrategyFitness::new([f_safe, f_lazy]);
            let next = replicator.next_shares(&shares, &fitness, 0).unwrap();
            prop_assert!(next.is_normalized(SHARE_TOLERANCE));
        }
    }
}
