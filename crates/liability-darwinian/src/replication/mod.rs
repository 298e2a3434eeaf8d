//! Replication: replicator-mutator update and stopping rule
pub mod convergence;
pub mod replicator;

pub use self::convergence::ConvergencePolicy;
pub use self::replicator::Replicator;
