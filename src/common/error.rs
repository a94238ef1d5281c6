//! Error types for rust_steering

use std::fmt;

/// Main error type for steering queries
#[derive(Debug)]
pub enum SteeringError {
    /// Invalid construction parameter (non-positive curvature bound,
    /// curvature rate or discretization step)
    InvalidParameter(String),
    /// A query state violates the configured bounds or the variant's
    /// endpoint-curvature contract
    InvalidState(String),
    /// No admissible path in the variant's catalogue
    NoPath(String),
}

impl fmt::Display for SteeringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SteeringError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            SteeringError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            SteeringError::NoPath(msg) => write!(f, "No admissible path: {}", msg),
        }
    }
}

impl std::error::Error for SteeringError {}

/// Result type alias for steering operations
pub type SteeringResult<T> = Result<T, SteeringError>;
