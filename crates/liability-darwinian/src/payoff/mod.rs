//! Strategy & payoff model
pub mod model;

pub use self::model::{PayoffModel, PayoffParams, PenaltySchedule};
