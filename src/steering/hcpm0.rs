//! Hybrid curvature Reeds-Shepp state space with ±κ_max at the start and
//! zero curvature at the goal: the mirror image of HC0pm, with the first
//! turn leaving at full lock.

use crate::common::{
    total_length, Control, State, StateSpace, SteeringError, SteeringResult,
};
use crate::geometry::EPSILON;
use crate::steering::cc_circle::{CcParams, JunctionKind, TurnBoundary};
use crate::steering::cc_words::{catalogue, pinned_sides, select, WordCtx};
use crate::steering::sampler::{merge_controls, sample_path};

/// State space of HCpm0 Reeds-Shepp paths: curvature bound `kappa_max`,
/// curvature rate bound `sigma_max`, sampling step `discretization`.
#[derive(Debug, Clone)]
pub struct Hcpm0StateSpace {
    discretization: f64,
    params: CcParams,
}

impl Hcpm0StateSpace {
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
        if goal.kappa.abs() > EPSILON {
            return Err(SteeringError::InvalidState(
                "hcpm0 paths end at zero curvature".to_string(),
            ));
        }
        let start_sides = pinned_sides(start.kappa, self.params.kappa).ok_or_else(|| {
            SteeringError::InvalidState(
                "hcpm0 start curvature must be 0 or ±kappa_max".to_string(),
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
            start_boundary: TurnBoundary::MaxKappa,
            goal_boundary: TurnBoundary::ZeroKappa,
            start_sides,
            goal_sides: (true, true),
            directions: (true, true),
            allow_cusps: true,
        };
        let mut words = catalogue(&ctx);
        if start.kappa.abs() < EPSILON {
            let relaxed = WordCtx {
                start_boundary: TurnBoundary::ZeroKappa,
                start_sides: (true, true),
                ..ctx
            };
            words.extend(catalogue(&relaxed));
        }
        select(words)
            .ok_or_else(|| SteeringError::NoPath("hcpm0 catalogue exhausted".to_string()))
    }
}

impl StateSpace for Hcpm0StateSpace {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Direction;
    use crate::geometry::normalize_angle;
    use crate::steering::hc0pm::Hc0pmStateSpace;

    fn space() -> Hcpm0StateSpace {
        Hcpm0StateSpace::new(1.0, 1.0, 0.1).unwrap()
    }

    #[test]
    fn test_rejects_contract_violations() {
        let space = space();
        let start = State::new(0.0, 0.0, 0.0, 0.3, Direction::Forward);
        assert!(space.distance(&start, &State::origin()).is_err());

        let locked_goal = State::new(2.0, 0.0, 0.0, 1.0, Direction::Forward);
        assert!(space.distance(&State::origin(), &locked_goal).is_err());
    }

    #[test]
    fn test_straight_ahead_with_free_start_curvature() {
        let space = space();
        let goal = State::new(10.0, 0.0, 0.0, 0.0, Direction::Forward);
        assert!((space.distance(&State::origin(), &goal).unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_locked_start_leaves_at_full_lock() {
        let space = space();
        let start = State::new(0.0, 0.0, 0.0, 1.0, Direction::Forward);
        let goal = State::new(4.0, 3.0, 0.5, 0.0, Direction::Forward);
        let states = space.path(&start, &goal).unwrap();
        assert!((states.first().unwrap().kappa - 1.0).abs() < 1e-9);
        let last = states.last().unwrap();
        assert!((last.x - goal.x).abs() < 1e-4);
        assert!((last.y - goal.y).abs() < 1e-4);
        assert!(normalize_angle(last.theta - goal.theta).abs() < 1e-4);
        assert!(last.kappa.abs() < 1e-9);
    }

    #[test]
    fn test_mirrors_hc0pm_under_time_reversal() {
        let fwd = Hc0pmStateSpace::new(1.0, 1.0, 0.1).unwrap();
        let back = space();
        let a = State::origin();
        let b = State::new(3.0, 2.0, 1.0, 1.0, Direction::Forward);
        // Reversing start and goal swaps the pinned endpoint.
        let d_0pm = fwd.distance(&a, &b).unwrap();
        let d_pm0 = back.distance(&b, &a).unwrap();
        assert!((d_0pm - d_pm0).abs() < 1e-6, "{} vs {}", d_0pm, d_pm0);
    }
}
