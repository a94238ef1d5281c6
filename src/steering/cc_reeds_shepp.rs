//! Curvature-continuous Reeds-Shepp state space: forward and backward
//! motion with clothoid-smoothed turns; curvature is zero at both path
//! endpoints and passes through zero at every junction, cusps included.

use crate::common::{
    total_length, Control, State, StateSpace, SteeringError, SteeringResult,
};
use crate::geometry::EPSILON;
use crate::steering::cc_circle::{CcParams, JunctionKind, TurnBoundary};
use crate::steering::cc_words::{best_word, WordCtx};
use crate::steering::sampler::{merge_controls, sample_path};

/// State space of curvature-continuous Reeds-Shepp paths with curvature
/// bound `kappa_max`, curvature rate bound `sigma_max` and sampling step
/// `discretization`.
#[derive(Debug, Clone)]
pub struct CcReedsSheppStateSpace {
    discretization: f64,
    params: CcParams,
}

impl CcReedsSheppStateSpace {
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
                "cc-reeds-shepp paths start and end at zero curvature".to_string(),
            ));
        }
        if (start.x - goal.x).hypot(start.y - goal.y) < EPSILON
            && (start.theta - goal.theta).abs() < EPSILON
        {
            return Ok(Vec::new());
        }
        let ctx = WordCtx {
            params: self.params,
            cusp: JunctionKind::CuspZero,
            start: start.pose(),
            goal: goal.pose(),
            start_boundary: TurnBoundary::ZeroKappa,
            goal_boundary: TurnBoundary::ZeroKappa,
            start_sides: (true, true),
            goal_sides: (true, true),
            directions: (true, true),
            allow_cusps: true,
        };
        best_word(&ctx).ok_or_else(|| {
            SteeringError::NoPath("cc-reeds-shepp catalogue exhausted".to_string())
        })
    }
}

impl StateSpace for CcReedsSheppStateSpace {
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
    use crate::steering::cc_dubins::CcDubinsStateSpace;

    fn state(x: f64, y: f64, theta: f64) -> State {
        State::new(x, y, theta, 0.0, Direction::Forward)
    }

    fn space() -> CcReedsSheppStateSpace {
        CcReedsSheppStateSpace::new(1.0, 1.0, 0.1).unwrap()
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        assert!(CcReedsSheppStateSpace::new(1.0, -1.0, 0.1).is_err());
        assert!(CcReedsSheppStateSpace::new(1.0, 1.0, 0.0).is_err());
    }

    #[test]
    fn test_rejects_curved_endpoints() {
        let space = space();
        let bent = State::new(0.0, 0.0, 0.0, 1.0, Direction::Forward);
        assert!(space.distance(&State::origin(), &bent).is_err());
    }

    #[test]
    fn test_identical_states_zero_distance() {
        let space = space();
        let a = state(2.0, 3.0, -1.1);
        assert!(space.distance(&a, &a).unwrap().abs() < 1e-12);
        assert_eq!(space.path(&a, &a).unwrap().len(), 1);
    }

    #[test]
    fn test_straight_ahead_goal() {
        let space = space();
        let goal = state(10.0, 0.0, 0.0);
        assert!((space.distance(&State::origin(), &goal).unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_straight_behind_goal_drives_backward() {
        let space = space();
        let goal = state(-6.0, 0.0, 0.0);
        assert!((space.distance(&State::origin(), &goal).unwrap() - 6.0).abs() < 1e-9);
        let controls = space.controls(&State::origin(), &goal).unwrap();
        assert!(controls.iter().all(|c| c.delta_s <= 0.0));
    }

    #[test]
    fn test_turn_around_exists() {
        let space = space();
        let goal = state(0.0, 0.0, std::f64::consts::PI);
        let dist = space.distance(&State::origin(), &goal).unwrap();
        assert!(dist.is_finite() && dist > 0.0);
    }

    #[test]
    fn test_never_longer_than_cc_dubins() {
        let rs = space();
        let dubins = CcDubinsStateSpace::new(1.0, 1.0, 0.1, true).unwrap();
        let goals = [
            state(5.0, 3.0, 1.0),
            state(0.0, 0.0, std::f64::consts::PI),
            state(-4.0, 2.0, -0.7),
        ];
        for goal in &goals {
            let d_rs = rs.distance(&State::origin(), goal).unwrap();
            let d_du = dubins.distance(&State::origin(), goal).unwrap();
            assert!(d_rs <= d_du + 1e-9);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let space = space();
        let pairs = [
            (state(0.0, 0.0, 0.0), state(4.0, 2.0, 1.3)),
            (state(1.0, -2.0, 2.1), state(-3.0, 1.0, -0.4)),
            (state(0.0, 0.0, 0.5), state(0.5, 0.5, 2.5)),
        ];
        for (a, b) in &pairs {
            let d_ab = space.distance(a, b).unwrap();
            let d_ba = space.distance(b, a).unwrap();
            assert!((d_ab - d_ba).abs() < 1e-6, "{} vs {}", d_ab, d_ba);
        }
    }

    #[test]
    fn test_path_reaches_goal() {
        let space = space();
        let goals = [
            state(7.0, -1.0, 0.4),
            state(1.5, 1.5, 2.8),
            state(-2.0, -6.0, -1.9),
        ];
        for goal in &goals {
            let states = space.path(&State::origin(), goal).unwrap();
            let last = states.last().unwrap();
            assert!((last.x - goal.x).abs() < 1e-4, "x: {} vs {}", last.x, goal.x);
            assert!((last.y - goal.y).abs() < 1e-4);
            assert!(normalize_angle(last.theta - goal.theta).abs() < 1e-4);
        }
    }

    #[test]
    fn test_curvature_continuous_along_path() {
        let space = space();
        let goal = state(2.0, 2.0, 2.5);
        let states = space.path(&State::origin(), &goal).unwrap();
        for s in &states {
            assert!(s.kappa.abs() <= 1.0 + 1e-9);
        }
        for w in states.windows(2) {
            assert!((w[1].kappa - w[0].kappa).abs() <= 1.0 * 0.1 + 1e-9);
        }
    }

    #[test]
    fn test_endpoint_curvature_is_zero() {
        let space = space();
        let goal = state(-1.0, 4.0, 1.6);
        let states = space.path(&State::origin(), &goal).unwrap();
        assert!(states.first().unwrap().kappa.abs() < 1e-9);
        assert!(states.last().unwrap().kappa.abs() < 1e-9);
    }
}
