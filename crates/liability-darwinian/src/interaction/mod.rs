//! Interaction round: expected fitness of every strategy for one generation

pub mod mean_field;

pub use self::mean_field::MeanFieldRound;

use liability_common::{LiabilityRegime, Strategy, StrategyShares};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Expected fitness per strategy, in [`Strategy::ALL`] order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyFitness([f64; Strategy::COUNT]);

impl StrategyFitness {
    pub fn new(fitness: [f64; Strategy::COUNT]) -> Self {
        Self(fitness)
    }

    pub fn from_fn(mut f: impl FnMut(Strategy) -> f64) -> Self {
        let mut fitness = [0.0; Strategy::COUNT];
        for strategy in Strategy::ALL {
            fitness[strategy.index()] = f(strategy);
        }
        Self(fitness)
    }

    #[inline]
    pub fn get(&self, strategy: Strategy) -> f64 {
        self.0[strategy.index()]
    }

    /// Population-weighted mean fitness f̄ = Σ x(S) · f(S)
    pub fn mean(&self, shares: &StrategyShares) -> f64 {
        shares.iter().map(|(s, x)| x * self.get(s)).sum()
    }

    /// Fitness advantage of `a` over `b`
    pub fn advantage(&self, a: Strategy, b: Strategy) -> f64 {
        self.get(a) - self.get(b)
    }
}

impl Index<Strategy> for StrategyFitness {
    type Output = f64;

    fn index(&self, strategy: Strategy) -> &f64 {
        &self.0[strategy.index()]
    }
}

/// Computes per-strategy fitness from the current distribution
///
/// Implementations must be side-effect free so that identical inputs always
/// yield identical fitness.
pub trait InteractionRound {
    fn fitness(
        &self,
        shares: &StrategyShares,
        regime: LiabilityRegime,
        audit_probability: f64,
    ) -> StrategyFitness;
}
