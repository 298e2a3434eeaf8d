//! Population - fixed-size multiset of fungible agents held as shares
//!
//! A population is owned by exactly one run. It is created from an initial
//! distribution, replaced generation by generation, and dropped when the run
//! ends.

use liability_common::{LiabilityError, Result, Strategy, StrategyShares, SHARE_TOLERANCE};
use serde::{Deserialize, Serialize};

/// Starting distribution presets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum InitialDistribution {
    /// Every agent starts lazy
    AllLazy,
    /// Equal share per strategy
    Uniform,
    /// Given fraction safe, the remainder lazy
    Split { safe: f64 },
    /// Explicit shares
    Shares { shares: StrategyShares },
}

impl Default for InitialDistribution {
    fn default() -> Self {
        InitialDistribution::AllLazy
    }
}

impl InitialDistribution {
    /// Resolve the preset into raw shares (not yet validated)
    pub fn shares(&self) -> StrategyShares {
        match self {
            InitialDistribution::AllLazy => StrategyShares::pure(Strategy::Lazy),
            InitialDistribution::Uniform => StrategyShares::uniform(),
            InitialDistribution::Split { safe } => StrategyShares::from_fn(|s| match s {
                Strategy::Safe => *safe,
                Strategy::Lazy => 1.0 - *safe,
            }),
            InitialDistribution::Shares { shares } => *shares,
        }
    }
}

/// Strategy-share snapshot at one generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Generation index, 0 = initial distribution
    pub generation: u64,
    /// Shares at that generation
    pub shares: StrategyShares,
}

/// Strategy distribution over a fixed number of agents
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    size: u64,
    shares: StrategyShares,
    generation: u64,
}

impl Population {
    /// Create a population of `size` agents with the given starting shares
    pub fn initialize(size: u64, initial: StrategyShares) -> Result<Self> {
        if size == 0 {
            return Err(LiabilityError::config("population size must be positive"));
        }
        if !initial.is_normalized(SHARE_TOLERANCE) {
            return Err(LiabilityError::config(format!(
                "initial shares must be non-negative and sum to 1, got [{}] (sum {})",
                initial,
                initial.total()
            )));
        }
        Ok(Self {
            size,
            shares: initial,
            generation: 0,
        })
    }

    /// Read-only snapshot of the current distribution
    pub fn current_shares(&self) -> StrategyShares {
        self.shares
    }

    pub fn share(&self, strategy: Strategy) -> f64 {
        self.shares.get(strategy)
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Generations applied since initialisation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn record(&self) -> GenerationRecord {
        GenerationRecord {
            generation: self.generation,
            shares: self.shares,
        }
    }

    /// Replace the distribution with the next generation's shares
    ///
    /// A correct replication rule always produces normalised shares, so a
    /// failure here is reported as an invariant violation.
    pub fn apply_next_generation(&mut self, next: StrategyShares) -> Result<()> {
        if !next.is_normalized(SHARE_TOLERANCE) {
            return Err(LiabilityError::invariant(format!(
                "generation {} shares [{}] sum to {} (tolerance {})",
                self.generation + 1,
                next,
                next.total(),
                SHARE_TOLERANCE
            )));
        }
        self.shares = next;
        self.generation += 1;
        Ok(())
    }

    /// Exact agent counts per strategy, in [`Strategy::ALL`] order
    ///
    /// Uses largest-remainder apportionment so counts always add up to the
    /// population size.
    pub fn counts(&self) -> [u64; Strategy::COUNT] {
        let mut counts = [0u64; Strategy::COUNT];
        let mut remainders = [(0usize, 0.0f64); Strategy::COUNT];
        let mut assigned = 0u64;

        for (i, (_, share)) in self.shares.iter().enumerate() {
            let exact = share * self.size as f64;
            let floor = exact.floor();
            counts[i] = floor as u64;
            remainders[i] = (i, exact - floor);
            assigned += counts[i];
        }

        remainders.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        let mut leftover = self.size.saturating_sub(assigned);
        for (i, _) in remainders.iter().cycle() {
            if leftover == 0 {
                break;
            }
            counts[*i] += 1;
            leftover -= 1;
        }
        counts
    }

    /// Agents currently playing `strategy`
    pub fn count(&self, strategy: Strategy) -> u64 {
        self.counts()[strategy.index()]
    }
}
