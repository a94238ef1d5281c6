//! RustSteering - steering functions for car-like robots
//!
//! This crate computes shortest drivable paths between two oriented
//! vehicle configurations under bounded curvature and, for the
//! curvature-continuous variants, bounded curvature rate: Dubins,
//! Reeds-Shepp and their clothoid-smoothed CC/HC extensions.

// Core modules
pub mod common;
pub mod geometry;

// Solver modules
pub mod steering;

// Re-export common types for convenience
pub use common::{Control, Direction, State, SteeringError, SteeringResult};
pub use common::StateSpace;
pub use steering::{
    CcDubinsStateSpace, CcReedsSheppStateSpace, DubinsStateSpace, Hc00StateSpace,
    Hc0pmStateSpace, Hcpm0StateSpace, HcpmpmStateSpace, ReedsSheppStateSpace,
};
