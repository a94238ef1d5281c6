//! Common traits defining interfaces for steering state spaces

use crate::common::error::SteeringResult;
use crate::common::types::{Control, State};

/// A steering state space: connects two oriented configurations with the
/// shortest drivable curve of its path family and answers three queries,
/// each a pure function of the immutable instance parameters and its
/// arguments.
pub trait StateSpace {
    /// Length of the shortest admissible path from `start` to `goal`.
    fn distance(&self, start: &State, goal: &State) -> SteeringResult<f64>;

    /// Control segments realizing the shortest admissible path.
    fn controls(&self, start: &State, goal: &State) -> SteeringResult<Vec<Control>>;

    /// The shortest admissible path sampled at the configured step.
    fn path(&self, start: &State, goal: &State) -> SteeringResult<Vec<State>>;
}
