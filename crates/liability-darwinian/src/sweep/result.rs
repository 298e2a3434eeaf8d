//! Sweep output table
//!
//! Degenerate grid points carry a NaN safe share, serialised as `null`.

use liability_common::LiabilityRegime;
use serde::{Deserialize, Serialize};

/// One row: converged safe share for a (regime, audit probability) pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub regime: LiabilityRegime,
    pub audit_probability: f64,
    /// Final safe share, NaN when the run was degenerate
    #[serde(with = "nan_as_null")]
    pub safe_share: f64,
    /// Generations executed (up to the failure for degenerate runs)
    pub generations: u64,
}

impl SweepPoint {
    pub fn is_degenerate(&self) -> bool {
        self.safe_share.is_nan()
    }
}

/// Append-only, ordered sweep table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    points: Vec<SweepPoint>,
}

impl SweepResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: SweepPoint) {
        self.points.push(point);
    }

    pub fn extend(&mut self, points: impl IntoIterator<Item = SweepPoint>) {
        self.points.extend(points);
    }

    pub fn points(&self) -> &[SweepPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Rows of one regime, ascending audit probability
    pub fn points_for(&self, regime: LiabilityRegime) -> impl Iterator<Item = &SweepPoint> + '_ {
        self.points.iter().filter(move |p| p.regime == regime)
    }

    pub fn safe_shares(&self, regime: LiabilityRegime) -> Vec<f64> {
        self.points_for(regime).map(|p| p.safe_share).collect()
    }

    /// Lowest audit probability whose safe share exceeds `threshold`
    pub fn threshold_crossing(&self, regime: LiabilityRegime, threshold: f64) -> Option<f64> {
        self.points_for(regime)
            .find(|p| p.safe_share > threshold)
            .map(|p| p.audit_probability)
    }

    /// Extra audit probability limited liability needs to reach `threshold`
    pub fn efficiency_gap(&self, threshold: f64) -> Option<f64> {
        let limited = self.threshold_crossing(LiabilityRegime::Limited, threshold)?;
        let joint = self.threshold_crossing(LiabilityRegime::Joint, threshold)?;
        Some(limited - joint)
    }

    pub fn degenerate_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_degenerate()).count()
    }
}

mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}
