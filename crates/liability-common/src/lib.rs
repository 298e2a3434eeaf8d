//! # Liability Common
//!
//! Shared types, errors, and calibrated defaults for the Liability Lab
//! evolutionary simulator.
//!
//! ## Core Types
//!
//! - [`Strategy`]: behavioural variant played by a share of the population
//! - [`LiabilityRegime`]: how a detected failure is penalised
//! - [`AuditGrid`]: monotonic sample grid of audit probabilities
//! - [`StrategyShares`]: per-strategy fractions of the population
//!
//! ## Errors
//!
//! - [`LiabilityError`]: configuration, degenerate-fitness and invariant errors

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{LiabilityError, Result};
pub use types::{
    audit_grid::AuditGrid,
    regime::LiabilityRegime,
    strategy::{Strategy, StrategyShares},
};

/// Liability Lab version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tolerance used when checking that strategy shares sum to one
pub const SHARE_TOLERANCE: f64 = 1e-9;

/// Default number of agents in a population
pub const DEFAULT_POPULATION_SIZE: u64 = 1000;

/// Default number of audit-probability samples
pub const DEFAULT_GRID_POINTS: usize = 20;

/// Default generation budget per run
pub const DEFAULT_GENERATIONS: u64 = 800;

/// Revenue every agent earns per interaction
pub const BASE_PROFIT: f64 = 100.0;

/// Maintenance cost paid by safe agents every round
pub const COST_SAFE: f64 = 20.0;

/// Baseline cost paid by lazy agents every round
pub const COST_LAZY: f64 = 0.0;

/// Capped fine under limited liability
pub const LIMITED_FINE: f64 = 30.0;

/// Reputation loss under limited liability (total penalty = 40)
pub const LIMITED_REPUTATION_LOSS: f64 = 10.0;

/// Fine under joint liability
pub const JOINT_FINE: f64 = 100.0;

/// Reputation loss under joint liability (total penalty = 200)
pub const JOINT_REPUTATION_LOSS: f64 = 100.0;

/// Baseline fitness carried by every agent independently of the game
pub const BACKGROUND_FITNESS: f64 = 400.0;

/// Per-generation probability of strategy exploration
pub const MUTATION_RATE: f64 = 0.001;

/// Safe share regarded as a "safe equilibrium"
pub const SAFETY_TARGET: f64 = 0.95;

/// Pairing/learning rounds per agent-based run
pub const DEFAULT_ROUNDS: u64 = 50;

/// Independent agent-based runs averaged per grid point
pub const DEFAULT_RUNS_PER_POINT: u32 = 5;

/// Probability an agent imitates the richer group each round
pub const LEARNING_RATE: f64 = 0.1;

/// Fraction of agents starting safe in the agent-based variant
pub const AGENT_INITIAL_SAFE_SHARE: f64 = 0.5;

/// Base seed for agent-based runs
pub const DEFAULT_SEED: u64 = 42;
