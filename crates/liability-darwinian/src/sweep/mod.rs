//! Sweep driver over (regime, audit probability) pairs
pub mod config;
pub mod driver;
pub mod result;

pub use self::config::SweepConfig;
pub use self::driver::SweepDriver;
pub use self::result::{SweepPoint, SweepResult};
