//! Curvature-continuous Dubins state space: one drive direction, zero
//! curvature at both endpoints, clothoid-smoothed turns.

use crate::common::{
    total_length, Control, State, StateSpace, SteeringError, SteeringResult,
};
use crate::geometry::EPSILON;
use crate::steering::cc_circle::{CcParams, JunctionKind, TurnBoundary};
use crate::steering::cc_words::{best_word, WordCtx};
use crate::steering::sampler::{merge_controls, sample_path};

/// State space of curvature-continuous Dubins paths with curvature bound
/// `kappa_max`, curvature rate bound `sigma_max` and sampling step
/// `discretization`, driving forward or backward only.
#[derive(Debug, Clone)]
pub struct CcDubinsStateSpace {
    discretization: f64,
    forwards: bool,
    params: CcParams,
}

impl CcDubinsStateSpace {
    pub fn new(
        kappa_max: f64,
        sigma_max: f64,
        discretization: f64,
        forwards: bool,
    ) -> SteeringResult<Self> {
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
            forwards,
            params: CcParams::new(kappa_max, sigma_max),
        })
    }

    fn solve(&self, start: &State, goal: &State) -> SteeringResult<Vec<Control>> {
        if start.kappa.abs() > EPSILON || goal.kappa.abs() > EPSILON {
            return Err(SteeringError::InvalidState(
                "cc-dubins paths start and end at zero curvature".to_string(),
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
            directions: (self.forwards, !self.forwards),
            allow_cusps: false,
        };
        best_word(&ctx)
            .ok_or_else(|| SteeringError::NoPath("cc-dubins catalogue exhausted".to_string()))
    }
}

impl StateSpace for CcDubinsStateSpace {
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

    fn state(x: f64, y: f64, theta: f64) -> State {
        State::new(x, y, theta, 0.0, Direction::Forward)
    }

    fn space() -> CcDubinsStateSpace {
        CcDubinsStateSpace::new(1.0, 1.0, 0.1, true).unwrap()
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        assert!(CcDubinsStateSpace::new(1.0, 0.0, 0.1, true).is_err());
        assert!(CcDubinsStateSpace::new(-1.0, 1.0, 0.1, true).is_err());
    }

    #[test]
    fn test_rejects_curved_endpoints() {
        let space = space();
        let bent = State::new(0.0, 0.0, 0.0, 0.5, Direction::Forward);
        assert!(space.distance(&bent, &state(5.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_identical_states_zero_distance() {
        let space = space();
        let a = state(1.0, -1.0, 0.8);
        assert!(space.distance(&a, &a).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_straight_ahead_goal() {
        let space = space();
        let goal = state(10.0, 0.0, 0.0);
        let dist = space.distance(&State::origin(), &goal).unwrap();
        assert!((dist - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_path_reaches_goal() {
        let space = space();
        let goals = [
            state(8.0, 3.0, 0.5),
            state(2.0, 6.0, -1.5),
            state(-5.0, -4.0, 2.0),
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
    fn test_curvature_and_rate_bounded() {
        let space = space();
        let goal = state(3.0, -2.0, 1.0);
        let states = space.path(&State::origin(), &goal).unwrap();
        for s in &states {
            assert!(s.kappa.abs() <= 1.0 + 1e-9);
        }
        for w in states.windows(2) {
            // Rate bound σ·Δs plus slack for the shorter closing steps.
            assert!((w[1].kappa - w[0].kappa).abs() <= 1.0 * 0.1 + 1e-9);
        }
    }

    #[test]
    fn test_endpoint_curvature_is_zero() {
        let space = space();
        let goal = state(4.0, 4.0, 2.0);
        let states = space.path(&State::origin(), &goal).unwrap();
        assert!(states.first().unwrap().kappa.abs() < 1e-9);
        assert!(states.last().unwrap().kappa.abs() < 1e-9);
    }

    #[test]
    fn test_never_shorter_than_dubins() {
        // The clothoid ramps cannot beat circular arcs.
        use crate::steering::dubins::DubinsStateSpace;
        let cc = space();
        let dubins = DubinsStateSpace::new(1.0, 0.1, true).unwrap();
        let goals = [state(6.0, 2.0, 1.0), state(-3.0, 5.0, -2.0)];
        for goal in &goals {
            let d_cc = cc.distance(&State::origin(), goal).unwrap();
            let d_du = dubins.distance(&State::origin(), goal).unwrap();
            assert!(d_cc >= d_du - 1e-9);
        }
    }

    #[test]
    fn test_backward_only_variant() {
        let space = CcDubinsStateSpace::new(1.0, 1.0, 0.1, false).unwrap();
        let goal = state(-10.0, 0.0, 0.0);
        let dist = space.distance(&State::origin(), &goal).unwrap();
        assert!((dist - 10.0).abs() < 1e-9);
        let controls = space.controls(&State::origin(), &goal).unwrap();
        assert!(controls.iter().all(|c| c.delta_s < 0.0));
    }
}
