//! Hybrid curvature Reeds-Shepp state space with zero curvature at the
//! start and ±κ_max at the goal.
//!
//! The goal curvature selects the final steering side: supplying exactly
//! +κ_max or -κ_max pins it, supplying zero leaves the boundary to the
//! solver (which may then also finish at zero curvature when that is
//! globally shorter). Any other goal curvature violates the contract.

use crate::common::{
    total_length, Control, State, StateSpace, SteeringError, SteeringResult,
};
use crate::geometry::EPSILON;
use crate::steering::cc_circle::{CcParams, JunctionKind, TurnBoundary};
use crate::steering::cc_words::{catalogue, pinned_sides, select, WordCtx};
use crate::steering::sampler::{merge_controls, sample_path};

/// State space of HC0pm Reeds-Shepp paths: curvature bound `kappa_max`,
/// curvature rate bound `sigma_max`, sampling step `discretization`.
#[derive(Debug, Clone)]
pub struct Hc0pmStateSpace {
    discretization: f64,
    params: CcParams,
}

impl Hc0pmStateSpace {
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
        if start.kappa.abs() > EPSILON {
            return Err(SteeringError::InvalidState(
                "hc0pm paths start at zero curvature".to_string(),
            ));
        }
        let goal_sides = pinned_sides(goal.kappa, self.params.kappa).ok_or_else(|| {
            SteeringError::InvalidState(
                "hc0pm goal curvature must be 0 or ±kappa_max".to_string(),
            )
        })?;
        if (start.x - goal.x).hypot(start.y - goal.y) < EPSILON
            && (start.theta - goal.theta).abs() < EPSILON
            && (start.kappa - goal.kappa).abs() < EPSILON
        {
            return Ok(Vec::new());
        }
        let ctx = WordCtx {
            params: self.params,
            cusp: JunctionKind::CuspMax,
            start: start.pose(),
            goal: goal.pose(),
            start_boundary: TurnBoundary::ZeroKappa,
            goal_boundary: TurnBoundary::MaxKappa,
            start_sides: (true, true),
            goal_sides,
            directions: (true, true),
            allow_cusps: true,
        };
        let mut words = catalogue(&ctx);
        if goal.kappa.abs() < EPSILON {
            // Unconstrained boundary: zero-curvature arrivals compete too.
            let relaxed = WordCtx {
                goal_boundary: TurnBoundary::ZeroKappa,
                goal_sides: (true, true),
                ..ctx
            };
            words.extend(catalogue(&relaxed));
        }
        select(words)
            .ok_or_else(|| SteeringError::NoPath("hc0pm catalogue exhausted".to_string()))
    }
}

impl StateSpace for Hc0pmStateSpace {
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
