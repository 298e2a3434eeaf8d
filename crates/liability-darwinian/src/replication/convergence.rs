//! Stopping rule: fixed generation budget, optionally cut short once shares settle

use liability_common::{LiabilityError, Result, DEFAULT_GENERATIONS};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergencePolicy {
    /// Hard loop bound per run
    pub max_generations: u64,
    /// Stop once no share moves by this much between generations and the
    /// movement is no longer growing
    pub tolerance: Option<f64>,
}

impl Default for ConvergencePolicy {
    fn default() -> Self {
        Self {
            max_generations: DEFAULT_GENERATIONS,
            tolerance: None,
        }
    }
}

impl ConvergencePolicy {
    pub fn fixed(max_generations: u64) -> Self {
        Self {
            max_generations,
            tolerance: None,
        }
    }

    pub fn until_converged(max_generations: u64, tolerance: f64) -> Self {
        Self {
            max_generations,
            tolerance: Some(tolerance),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_generations == 0 {
            return Err(LiabilityError::config("generation budget must be positive"));
        }
        if let Some(tol) = self.tolerance {
            if !tol.is_finite() || tol <= 0.0 {
                return Err(LiabilityError::config(format!(
                    "convergence tolerance must be positive, got {tol}"
                )));
            }
        }
        Ok(())
    }

    /// Whether the run has settled after a step of size `change`
    ///
    /// A single step never settles a run: the first step out of a pure start
    /// is mutation inflow alone (μ / |S|). The step must be below tolerance
    /// and no larger than `previous_change`.
    pub fn has_converged(&self, previous_change: Option<f64>, change: f64) -> bool {
        match (self.tolerance, previous_change) {
            (Some(tol), Some(previous)) => change < tol && change <= previous,
            _ => false,
        }
    }

    pub fn budget_exhausted(&self, generation: u64) -> bool {
        generation >= self.max_generations
    }
}
