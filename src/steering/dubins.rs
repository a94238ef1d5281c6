//! Dubins state space: shortest bounded-curvature paths for a vehicle
//! locked to one drive direction (forward by default, backward on request).
//!
//! The six candidate words LSL, LSR, RSL, RSR, RLR, LRL are solved in the
//! canonical frame with curvature normalized to one; the catalogue is
//! complete, so every query yields a path.

use ordered_float::OrderedFloat;

use crate::common::{
    reverse_controls, total_length, Control, State, StateSpace, SteeringError, SteeringResult,
};
use crate::geometry::{mod2pi, to_canonical_frame, EPSILON};
use crate::steering::sampler::{merge_controls, sample_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Seg {
    Left,
    Straight,
    Right,
}

/// Canonical-frame quantities shared by all six word formulas.
struct Intermediate {
    alpha: f64,
    beta: f64,
    d: f64,
    sa: f64,
    ca: f64,
    sb: f64,
    cb: f64,
    c_ab: f64,
    d_sq: f64,
}

impl Intermediate {
    fn new(x: f64, y: f64, phi: f64) -> Self {
        let d = x.hypot(y);
        let theta = if d > EPSILON { y.atan2(x) } else { 0.0 };
        let alpha = mod2pi(-theta);
        let beta = mod2pi(phi - theta);
        let (sa, ca) = alpha.sin_cos();
        let (sb, cb) = beta.sin_cos();
        Self {
            alpha,
            beta,
            d,
            sa,
            ca,
            sb,
            cb,
            c_ab: (alpha - beta).cos(),
            d_sq: d * d,
        }
    }

    fn lsl(&self) -> Option<[f64; 3]> {
        let p_sq = 2.0 + self.d_sq - 2.0 * self.c_ab + 2.0 * self.d * (self.sa - self.sb);
        if p_sq < 0.0 {
            return None;
        }
        let tmp = (self.cb - self.ca).atan2(self.d + self.sa - self.sb);
        Some([
            mod2pi(tmp - self.alpha),
            p_sq.sqrt(),
            mod2pi(self.beta - tmp),
        ])
    }

    fn rsr(&self) -> Option<[f64; 3]> {
        let p_sq = 2.0 + self.d_sq - 2.0 * self.c_ab + 2.0 * self.d * (self.sb - self.sa);
        if p_sq < 0.0 {
            return None;
        }
        let tmp = (self.ca - self.cb).atan2(self.d - self.sa + self.sb);
        Some([
            mod2pi(self.alpha - tmp),
            p_sq.sqrt(),
            mod2pi(tmp - self.beta),
        ])
    }

    fn lsr(&self) -> Option<[f64; 3]> {
        let p_sq = -2.0 + self.d_sq + 2.0 * self.c_ab + 2.0 * self.d * (self.sa + self.sb);
        if p_sq < 0.0 {
            return None;
        }
        let p = p_sq.sqrt();
        let tmp =
            (-self.ca - self.cb).atan2(self.d + self.sa + self.sb) - (-2.0_f64).atan2(p);
        Some([
            mod2pi(tmp - self.alpha),
            p,
            mod2pi(tmp - mod2pi(self.beta)),
        ])
    }

    fn rsl(&self) -> Option<[f64; 3]> {
        let p_sq = -2.0 + self.d_sq + 2.0 * self.c_ab - 2.0 * self.d * (self.sa + self.sb);
        if p_sq < 0.0 {
            return None;
        }
        let p = p_sq.sqrt();
        let tmp = (self.ca + self.cb).atan2(self.d - self.sa - self.sb) - 2.0_f64.atan2(p);
        Some([
            mod2pi(self.alpha - tmp),
            p,
            mod2pi(self.beta - tmp),
        ])
    }

    fn rlr(&self) -> Option<[f64; 3]> {
        let tmp = (6.0 - self.d_sq + 2.0 * self.c_ab + 2.0 * self.d * (self.sa - self.sb)) / 8.0;
        if tmp.abs() > 1.0 {
            return None;
        }
        let p = mod2pi(2.0 * std::f64::consts::PI - tmp.acos());
        let phi = (self.ca - self.cb).atan2(self.d - self.sa + self.sb);
        let t = mod2pi(self.alpha - phi + mod2pi(0.5 * p));
        Some([t, p, mod2pi(self.alpha - self.beta - t + mod2pi(p))])
    }

    fn lrl(&self) -> Option<[f64; 3]> {
        let tmp = (6.0 - self.d_sq + 2.0 * self.c_ab + 2.0 * self.d * (self.sb - self.sa)) / 8.0;
        if tmp.abs() > 1.0 {
            return None;
        }
        let p = mod2pi(2.0 * std::f64::consts::PI - tmp.acos());
        let phi = (self.ca - self.cb).atan2(self.d + self.sa - self.sb);
        let t = mod2pi(-self.alpha - phi + 0.5 * p);
        Some([
            t,
            p,
            mod2pi(mod2pi(self.beta) - self.alpha - t + mod2pi(p)),
        ])
    }
}

const WORDS: [(fn(&Intermediate) -> Option<[f64; 3]>, [Seg; 3]); 6] = [
    (Intermediate::lsl, [Seg::Left, Seg::Straight, Seg::Left]),
    (Intermediate::lsr, [Seg::Left, Seg::Straight, Seg::Right]),
    (Intermediate::rsl, [Seg::Right, Seg::Straight, Seg::Left]),
    (Intermediate::rsr, [Seg::Right, Seg::Straight, Seg::Right]),
    (Intermediate::rlr, [Seg::Right, Seg::Left, Seg::Right]),
    (Intermediate::lrl, [Seg::Left, Seg::Right, Seg::Left]),
];

/// State space of Dubins paths with maximum curvature `kappa_max`,
/// sampled at `discretization`, driving forward or backward only.
#[derive(Debug, Clone)]
pub struct DubinsStateSpace {
    kappa_max: f64,
    discretization: f64,
    forwards: bool,
}

impl DubinsStateSpace {
    pub fn new(kappa_max: f64, discretization: f64, forwards: bool) -> SteeringResult<Self> {
        if kappa_max <= 0.0 {
            return Err(SteeringError::InvalidParameter(
                "kappa_max must be > 0".to_string(),
            ));
        }
        if discretization <= 0.0 {
            return Err(SteeringError::InvalidParameter(
                "discretization must be > 0".to_string(),
            ));
        }
        Ok(Self {
            kappa_max,
            discretization,
            forwards,
        })
    }

    fn solve(&self, start: &State, goal: &State) -> SteeringResult<Vec<Control>> {
        // Backward driving: the forward word from goal to start, reversed.
        let (from, to) = if self.forwards {
            (start, goal)
        } else {
            (goal, start)
        };
        let (cx, cy, cphi) = to_canonical_frame(from.pose(), to.pose());
        if cx.hypot(cy) < EPSILON && cphi.abs() < EPSILON {
            return Ok(Vec::new());
        }

        let intermediate =
            Intermediate::new(cx * self.kappa_max, cy * self.kappa_max, cphi);
        let mut best: Option<(f64, [f64; 3], [Seg; 3])> = None;
        for (word, segs) in WORDS.iter() {
            if let Some(params) = word(&intermediate) {
                if params.iter().any(|p| !p.is_finite() || *p < 0.0) {
                    continue;
                }
                let length: f64 = params.iter().sum();
                if best
                    .as_ref()
                    .map_or(true, |(l, _, _)| OrderedFloat(length) < OrderedFloat(*l))
                {
                    best = Some((length, params, *segs));
                }
            }
        }

        let (_, params, segs) = best.ok_or_else(|| {
            SteeringError::NoPath("dubins catalogue exhausted".to_string())
        })?;
        let controls: Vec<Control> = params
            .iter()
            .zip(segs.iter())
            .map(|(&len, seg)| match seg {
                Seg::Left => Control::arc(len / self.kappa_max, self.kappa_max),
                Seg::Right => Control::arc(len / self.kappa_max, -self.kappa_max),
                Seg::Straight => Control::straight(len / self.kappa_max),
            })
            .collect();
        if self.forwards {
            Ok(controls)
        } else {
            Ok(reverse_controls(&controls))
        }
    }
}

impl StateSpace for DubinsStateSpace {
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
    use std::f64::consts::PI;

    fn state(x: f64, y: f64, theta: f64) -> State {
        State::new(x, y, theta, 0.0, Direction::Forward)
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        assert!(DubinsStateSpace::new(0.0, 0.1, true).is_err());
        assert!(DubinsStateSpace::new(1.0, -0.1, true).is_err());
    }

    #[test]
    fn test_identical_states_zero_distance() {
        let space = DubinsStateSpace::new(1.0, 0.1, true).unwrap();
        let a = state(1.0, 2.0, 0.5);
        assert!(space.distance(&a, &a).unwrap().abs() < 1e-12);
        assert_eq!(space.path(&a, &a).unwrap().len(), 1);
    }

    #[test]
    fn test_straight_ahead_goal() {
        let space = DubinsStateSpace::new(1.0, 0.1, true).unwrap();
        let goal = state(10.0, 0.0, 0.0);
        assert!((space.distance(&State::origin(), &goal).unwrap() - 10.0).abs() < 1e-9);
        let controls = space.controls(&State::origin(), &goal).unwrap();
        assert_eq!(controls.len(), 1);
        assert!(controls[0].kappa.abs() < 1e-12);
    }

    #[test]
    fn test_turn_around_uses_triple_arc() {
        let space = DubinsStateSpace::new(1.0, 0.1, true).unwrap();
        let goal = state(0.0, 0.0, PI);
        let length = space.distance(&State::origin(), &goal).unwrap();
        // RLR/LRL turn-around: π/3 + 5π/3 + π/3.
        assert!((length - 7.0 * PI / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_path_reaches_goal() {
        let space = DubinsStateSpace::new(1.0, 0.1, true).unwrap();
        let goal = state(4.0, 3.0, 1.2);
        let states = space.path(&State::origin(), &goal).unwrap();
        let last = states.last().unwrap();
        assert!((last.x - goal.x).abs() < 1e-6);
        assert!((last.y - goal.y).abs() < 1e-6);
        assert!((last.theta - goal.theta).abs() < 1e-6);
    }

    #[test]
    fn test_sampled_curvature_within_bound() {
        let space = DubinsStateSpace::new(1.0, 0.1, true).unwrap();
        let goal = state(-2.0, 5.0, -2.0);
        for s in space.path(&State::origin(), &goal).unwrap() {
            assert!(s.kappa.abs() <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn test_backward_variant_mirrors_forward() {
        let fwd = DubinsStateSpace::new(1.0, 0.1, true).unwrap();
        let bwd = DubinsStateSpace::new(1.0, 0.1, false).unwrap();
        let a = state(0.0, 0.0, 0.3);
        let b = state(5.0, -2.0, 1.7);
        let d_fwd = fwd.distance(&b, &a).unwrap();
        let d_bwd = bwd.distance(&a, &b).unwrap();
        assert!((d_fwd - d_bwd).abs() < 1e-9);
        let controls = bwd.controls(&a, &b).unwrap();
        assert!(controls.iter().all(|c| c.delta_s < 0.0));
    }

    #[test]
    fn test_rigid_transform_invariance() {
        let space = DubinsStateSpace::new(1.0, 0.1, true).unwrap();
        let a = state(0.0, 0.0, 0.4);
        let b = state(6.0, 1.0, -0.9);
        let d0 = space.distance(&a, &b).unwrap();

        let shift = |s: &State| {
            let rot: f64 = 0.8;
            let (sin_r, cos_r) = rot.sin_cos();
            state(
                s.x * cos_r - s.y * sin_r + 3.0,
                s.x * sin_r + s.y * cos_r - 1.0,
                s.theta + rot,
            )
        };
        let d1 = space.distance(&shift(&a), &shift(&b)).unwrap();
        assert!((d0 - d1).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_queries_identical() {
        let space = DubinsStateSpace::new(1.0, 0.1, true).unwrap();
        let b = state(2.0, 2.0, 2.0);
        let d0 = space.distance(&State::origin(), &b).unwrap();
        let d1 = space.distance(&State::origin(), &b).unwrap();
        assert_eq!(d0.to_bits(), d1.to_bits());
    }
}
