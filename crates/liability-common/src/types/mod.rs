//! Core data types for Liability Lab

pub mod audit_grid;
pub mod regime;
pub mod strategy;
