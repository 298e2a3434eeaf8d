//! Strategy - behavioural variants and their population shares
//!
//! A strategy is an immutable tag. Agents are fungible, so a population is
//! described entirely by the fraction of agents playing each strategy.

use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Behavioural policy assigned to a fraction of the population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Patches diligently: pays the maintenance cost, never penalised
    Safe,
    /// Skips maintenance: cheaper, but risks a penalty when audited
    Lazy,
}

impl Strategy {
    /// Number of strategy variants
    pub const COUNT: usize = 2;

    /// All variants in table order
    pub const ALL: [Strategy; Strategy::COUNT] = [Strategy::Safe, Strategy::Lazy];

    /// Position of this strategy in every per-strategy table
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Strategy::Safe => 0,
            Strategy::Lazy => 1,
        }
    }

    /// Whether a failure by this strategy can be detected by an audit
    #[inline]
    pub fn is_risky(self) -> bool {
        matches!(self, Strategy::Lazy)
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Safe => write!(f, "safe"),
            Strategy::Lazy => write!(f, "lazy"),
        }
    }
}

/// Fraction of the population playing each strategy
///
/// Indexed by [`Strategy`]. Normalisation is not enforced here; the owning
/// population checks it on every update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyShares([f64; Strategy::COUNT]);

impl StrategyShares {
    /// Wrap raw fractions in [`Strategy::ALL`] order
    pub fn new(shares: [f64; Strategy::COUNT]) -> Self {
        Self(shares)
    }

    /// Build shares from a per-strategy function
    pub fn from_fn(mut f: impl FnMut(Strategy) -> f64) -> Self {
        let mut shares = [0.0; Strategy::COUNT];
        for strategy in Strategy::ALL {
            shares[strategy.index()] = f(strategy);
        }
        Self(shares)
    }

    /// Every agent plays `strategy`
    pub fn pure(strategy: Strategy) -> Self {
        Self::from_fn(|s| if s == strategy { 1.0 } else { 0.0 })
    }

    /// Equal share for every strategy
    pub fn uniform() -> Self {
        Self::from_fn(|_| 1.0 / Strategy::COUNT as f64)
    }

    /// Share of one strategy
    #[inline]
    pub fn get(&self, strategy: Strategy) -> f64 {
        self.0[strategy.index()]
    }

    /// Sum of all shares
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Whether shares are finite, non-negative and sum to one within `tolerance`
    pub fn is_normalized(&self, tolerance: f64) -> bool {
        self.0.iter().all(|s| s.is_finite() && *s >= 0.0) && (self.total() - 1.0).abs() <= tolerance
    }

    /// Largest absolute per-strategy difference to `other`
    pub fn max_abs_diff(&self, other: &StrategyShares) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    /// Iterate `(strategy, share)` pairs in table order
    pub fn iter(&self) -> impl Iterator<Item = (Strategy, f64)> + '_ {
        Strategy::ALL.iter().map(move |s| (*s, self.get(*s)))
    }

    /// Raw fractions in table order
    pub fn as_array(&self) -> [f64; Strategy::COUNT] {
        self.0
    }
}

impl Index<Strategy> for StrategyShares {
    type Output = f64;

    fn index(&self, strategy: Strategy) -> &f64 {
        &self.0[strategy.index()]
    }
}

impl std::fmt::Display for StrategyShares {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "safe={:.4}, lazy={:.4}",
            self.get(Strategy::Safe),
            self.get(Strategy::Lazy)
        )
    }
}
