//! Population state
pub mod state;

pub use self::state::{GenerationRecord, InitialDistribution, Population};
