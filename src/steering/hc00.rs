//! Hybrid curvature Reeds-Shepp state space with zero curvature at both
//! path endpoints.
//!
//! Between endpoints the path behaves like a Reeds-Shepp path with
//! clothoid-smoothed turns, except at cusps: the vehicle stops at ±κ_max
//! and re-steers while stationary, so direction switches happen on the
//! inner circles and the curvature may jump there.

use crate::common::{
    total_length, Control, State, StateSpace, SteeringError, SteeringResult,
};
use crate::geometry::EPSILON;
use crate::steering::cc_circle::{CcParams, JunctionKind, TurnBoundary};
use crate::steering::cc_words::{best_word, WordCtx};
use crate::steering::sampler::{merge_controls, sample_path};

/// State space of HC00 Reeds-Shepp paths: curvature bound `kappa_max`,
/// curvature rate bound `sigma_max`, sampling step `discretization`.
#[derive(Debug, Clone)]
pub struct Hc00StateSpace {
    discretization: f64,
    params: CcParams,
}

impl Hc00StateSpace {
    pub fn new(kappa_max: f64, sigma_max: f64, discretization: f64) -> SteeringResult<Self> {
        if kappa_max <= 0.0 {
            return Err(SteeringError::InvalidParameter(
                "kappa_max must be > 0".to_string(),
            ));
        }
        if sigma_max <= 0.0 {
            return Err(SteeringError::InvalidParameter(
                "sigma_max must be > 0".to_string(),
            ));
        }
        if discretization <= 0.0 {
            return Err(SteeringError::InvalidParameter(
                "discretization must be > 0".to_string(),
            ));
        }
        Ok(Self {
            discretization,
            params: CcParams::new(kappa_max, sigma_max),
        })
    }

    fn solve(&self, start: &State, goal: &State) -> SteeringResult<Vec<Control>> {
        if start.kappa.abs() > EPSILON || goal.kappa.abs() > EPSILON {
            return Err(SteeringError::InvalidState(
                "hc00 paths start and end at zero curvature".to_string(),
            ));
        }
        if (start.x - goal.x).hypot(start.y - goal.y) < EPSILON
            && (start.theta - goal.theta).abs() < EPSILON
        {
            return Ok(Vec::new());
        }
        let ctx = WordCtx {
            params: self.params,
            cusp: JunctionKind::CuspMax,
            start: start.pose(),
            goal: goal.pose(),
            start_boundary: TurnBoundary::ZeroKappa,
            goal_boundary: TurnBoundary::ZeroKappa,
            start_sides: (true, true),
            goal_sides: (true, true),
            directions: (true, true),
            allow_cusps: true,
        };
        best_word(&ctx)
            .ok_or_else(|| SteeringError::NoPath("hc00 catalogue exhausted".to_string()))
    }
}

impl StateSpace for Hc00StateSpace {
    fn distance(&self, start: &State, goal: &State) -> SteeringResult<f64> {
        Ok(total_length(&self.solve(start, goal)?))
    }

    fn controls(&self, start: &State, goal: &State) -> SteeringResult<Vec<Control>> {
        Ok(merge_controls(&self.solve(start, goal)?))
    }

    fn path(&self, start: &State, goal: &State) -> SteeringResult<Vec<State>> {
        let controls = self.solve(start, goal)?;
        Ok(sample_path(start, &controls, self.discretization))
    }
}
