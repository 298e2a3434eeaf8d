//! LiabilityRegime - how a detected failure is penalised
//!
//! - Limited: the offender alone pays a capped penalty (the "LLC" model)
//! - Joint: every member of the interaction pays an existential penalty for
//!   each offender detected (the "Partnership" model, i.e. slashing)

use serde::{Deserialize, Serialize};

/// Liability regime, fixed for the lifetime of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiabilityRegime {
    /// Capped per-agent penalty
    Limited,
    /// Shared existential penalty
    Joint,
}

impl LiabilityRegime {
    /// All regimes in sweep order
    pub const ALL: [LiabilityRegime; 2] = [LiabilityRegime::Limited, LiabilityRegime::Joint];

    /// Whether a partner's detected failure is also charged to the focal agent
    #[inline]
    pub fn shares_penalty(self) -> bool {
        matches!(self, LiabilityRegime::Joint)
    }

    /// Stable small integer used when deriving per-run seeds
    #[inline]
    pub fn ordinal(self) -> u64 {
        match self {
            LiabilityRegime::Limited => 0,
            LiabilityRegime::Joint => 1,
        }
    }
}

impl std::fmt::Display for LiabilityRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiabilityRegime::Limited => write!(f, "Limited"),
            LiabilityRegime::Joint => write!(f, "Joint"),
        }
    }
}
