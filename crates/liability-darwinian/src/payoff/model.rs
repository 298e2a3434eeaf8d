//! Pairwise payoff: π = profit − cost − p × penalties
//!
//! A lazy agent risks a penalty when audited. Under limited liability only
//! the offender pays, and the penalty is capped. Under joint liability every
//! offender in the pair triggers the (much larger) penalty on both members.

use liability_common::{
    LiabilityError, LiabilityRegime, Result, Strategy, BASE_PROFIT, COST_LAZY, COST_SAFE,
    JOINT_FINE, JOINT_REPUTATION_LOSS, LIMITED_FINE, LIMITED_REPUTATION_LOSS,
};
use serde::{Deserialize, Serialize};

/// Penalty charged per detected offender
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltySchedule {
    /// Monetary fine
    pub fine: f64,
    /// Lost future business
    pub reputation_loss: f64,
}

impl PenaltySchedule {
    pub fn new(fine: f64, reputation_loss: f64) -> Self {
        Self {
            fine,
            reputation_loss,
        }
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.fine + self.reputation_loss
    }
}

/// Economic constants of the game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoffParams {
    /// Revenue every agent earns per interaction
    pub base_profit: f64,
    /// Maintenance cost of the safe strategy
    pub safe_cost: f64,
    /// Baseline cost of the lazy strategy (must be below `safe_cost`)
    pub lazy_cost: f64,
    /// Capped penalty under limited liability
    pub limited: PenaltySchedule,
    /// Existential penalty under joint liability
    pub joint: PenaltySchedule,
}

impl Default for PayoffParams {
    fn default() -> Self {
        Self {
            base_profit: BASE_PROFIT,
            safe_cost: COST_SAFE,
            lazy_cost: COST_LAZY,
            limited: PenaltySchedule::new(LIMITED_FINE, LIMITED_REPUTATION_LOSS),
            joint: PenaltySchedule::new(JOINT_FINE, JOINT_REPUTATION_LOSS),
        }
    }
}

impl PayoffParams {
    /// Penalty schedule for a regime
    pub fn penalty(&self, regime: LiabilityRegime) -> &PenaltySchedule {
        match regime {
            LiabilityRegime::Limited => &self.limited,
            LiabilityRegime::Joint => &self.joint,
        }
    }

    /// Per-round cost of a strategy
    pub fn cost(&self, strategy: Strategy) -> f64 {
        match strategy {
            Strategy::Safe => self.safe_cost,
            Strategy::Lazy => self.lazy_cost,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let values = [
            ("base_profit", self.base_profit),
            ("safe_cost", self.safe_cost),
            ("lazy_cost", self.lazy_cost),
            ("limited.fine", self.limited.fine),
            ("limited.reputation_loss", self.limited.reputation_loss),
            ("joint.fine", self.joint.fine),
            ("joint.reputation_loss", self.joint.reputation_loss),
        ];
        for (name, value) in values {
            if !value.is_finite() {
                return Err(LiabilityError::config(format!("{name} must be finite")));
            }
            if name != "base_profit" && value < 0.0 {
                return Err(LiabilityError::config(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        if self.lazy_cost >= self.safe_cost {
            return Err(LiabilityError::config(format!(
                "lazy cost ({}) must be below safe cost ({})",
                self.lazy_cost, self.safe_cost
            )));
        }
        Ok(())
    }
}

/// Stateless payoff function over (focal, opponent, regime, audit probability)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PayoffModel {
    params: PayoffParams,
}

impl PayoffModel {
    pub fn new(params: PayoffParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PayoffParams {
        &self.params
    }

    /// Expected payoff to `focal` when paired with `opponent`
    ///
    /// `audit_probability` is expected in `[0, 1]`; callers validate it. The
    /// payoff is linear in it and is not clamped.
    #[inline]
    pub fn payoff(
        &self,
        focal: Strategy,
        opponent: Strategy,
        regime: LiabilityRegime,
        audit_probability: f64,
    ) -> f64 {
        let penalty = self.params.penalty(regime).total();
        let mut payoff = self.params.base_profit - self.params.cost(focal);

        if focal.is_risky() {
            payoff -= audit_probability * penalty;
        }
        if regime.shares_penalty() && opponent.is_risky() {
            payoff -= audit_probability * penalty;
        }
        payoff
    }

    /// Payoff realised once the audit outcome of the pair is known
    #[inline]
    pub fn realized_payoff(
        &self,
        focal: Strategy,
        opponent: Strategy,
        regime: LiabilityRegime,
        audited: bool,
    ) -> f64 {
        self.payoff(focal, opponent, regime, if audited { 1.0 } else { 0.0 })
    }

    /// Audit probability above which the safe strategy out-earns the lazy one
    ///
    /// The partner's penalty hits both strategies alike, so only the focal
    /// offender's own penalty separates them: p* = (c_safe − c_lazy) / penalty.
    pub fn deterrence_threshold(&self, regime: LiabilityRegime) -> f64 {
        let penalty = self.params.penalty(regime).total();
        if penalty <= 0.0 {
            return f64::INFINITY;
        }
        (self.params.safe_cost - self.params.lazy_cost) / penalty
    }
}
