//! AuditGrid - monotonic sample grid of audit probabilities
//!
//! Points are equally spaced with both endpoints included, so the default
//! grid of 20 points over `[0, 1]` samples `0, 1/19, 2/19, ..., 1`.

use serde::{Deserialize, Serialize};

use crate::error::{LiabilityError, Result};
use crate::DEFAULT_GRID_POINTS;

/// Equally spaced audit probabilities over `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuditGrid {
    /// Lowest audit probability
    pub start: f64,
    /// Highest audit probability
    pub end: f64,
    /// Number of samples, endpoints included
    pub points: usize,
}

impl Default for AuditGrid {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 1.0,
            points: DEFAULT_GRID_POINTS,
        }
    }
}

impl AuditGrid {
    /// Create a validated grid
    pub fn new(start: f64, end: f64, points: usize) -> Result<Self> {
        let grid = Self { start, end, points };
        grid.validate()?;
        Ok(grid)
    }

    /// Check bounds and resolution
    pub fn validate(&self) -> Result<()> {
        if self.points < 2 {
            return Err(LiabilityError::config(format!(
                "audit grid needs at least 2 points, got {}",
                self.points
            )));
        }
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(LiabilityError::config("audit grid bounds must be finite"));
        }
        if self.start < 0.0 || self.end > 1.0 || self.start >= self.end {
            return Err(LiabilityError::config(format!(
                "audit grid must satisfy 0 <= start < end <= 1, got [{}, {}]",
                self.start, self.end
            )));
        }
        Ok(())
    }

    /// Spacing between consecutive samples
    pub fn step(&self) -> f64 {
        (self.end - self.start) / (self.points - 1) as f64
    }

    /// Audit probability at `index`; the last index maps exactly to `end`
    pub fn value(&self, index: usize) -> f64 {
        if index + 1 >= self.points {
            return self.end;
        }
        self.start + self.step() * index as f64
    }

    /// All samples in ascending order
    pub fn values(&self) -> Vec<f64> {
        (0..self.points).map(|i| self.value(i)).collect()
    }
}
