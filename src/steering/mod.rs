// Steering state spaces module

pub mod cc_circle;
pub mod cc_dubins;
pub mod cc_reeds_shepp;
pub mod cc_words;
pub mod dubins;
pub mod hc00;
pub mod hc0pm;
pub mod hcpm0;
pub mod hcpmpm;
pub mod reeds_shepp;
pub mod sampler;

pub use cc_dubins::CcDubinsStateSpace;
pub use cc_reeds_shepp::CcReedsSheppStateSpace;
pub use dubins::DubinsStateSpace;
pub use hc00::Hc00StateSpace;
pub use hc0pm::Hc0pmStateSpace;
pub use hcpm0::Hcpm0StateSpace;
pub use hcpmpm::HcpmpmStateSpace;
pub use reeds_shepp::ReedsSheppStateSpace;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Direction, State, StateSpace};

    fn all_spaces() -> Vec<(&'static str, Box<dyn StateSpace>)> {
        vec![
            (
                "dubins",
                Box::new(DubinsStateSpace::new(1.0, 0.1, true).unwrap()) as Box<dyn StateSpace>,
            ),
            (
                "reeds_shepp",
                Box::new(ReedsSheppStateSpace::new(1.0, 0.1).unwrap()),
            ),
            (
                "cc_dubins",
                Box::new(CcDubinsStateSpace::new(1.0, 1.0, 0.1, true).unwrap()),
            ),
            (
                "cc_reeds_shepp",
                Box::new(CcReedsSheppStateSpace::new(1.0, 1.0, 0.1).unwrap()),
            ),
            ("hc00", Box::new(Hc00StateSpace::new(1.0, 1.0, 0.1).unwrap())),
            (
                "hc0pm",
                Box::new(Hc0pmStateSpace::new(1.0, 1.0, 0.1).unwrap()),
            ),
            (
                "hcpm0",
                Box::new(Hcpm0StateSpace::new(1.0, 1.0, 0.1).unwrap()),
            ),
            (
                "hcpmpm",
                Box::new(HcpmpmStateSpace::new(1.0, 1.0, 0.1).unwrap()),
            ),
        ]
    }

    fn state(x: f64, y: f64, theta: f64) -> State {
        State::new(x, y, theta, 0.0, Direction::Forward)
    }

    #[test]
    fn test_zero_distance_to_self_everywhere() {
        let a = state(1.0, -2.0, 0.9);
        for (name, space) in all_spaces() {
            let d = space.distance(&a, &a).unwrap();
            assert!(d.abs() < 1e-12, "{}: {}", name, d);
            assert_eq!(space.path(&a, &a).unwrap().len(), 1, "{}", name);
        }
    }

    #[test]
    fn test_straight_ahead_everywhere() {
        let goal = state(10.0, 0.0, 0.0);
        for (name, space) in all_spaces() {
            let d = space.distance(&State::origin(), &goal).unwrap();
            assert!((d - 10.0).abs() < 1e-9, "{}: {}", name, d);
            let controls = space.controls(&State::origin(), &goal).unwrap();
            assert_eq!(controls.len(), 1, "{}", name);
            assert!(controls[0].kappa.abs() < 1e-9, "{}", name);
            assert!(controls[0].sigma.abs() < 1e-9, "{}", name);
        }
    }

    #[test]
    fn test_sampled_length_matches_distance_everywhere() {
        let goal = state(4.0, 3.0, 1.0);
        for (name, space) in all_spaces() {
            let d = space.distance(&State::origin(), &goal).unwrap();
            let states = space.path(&State::origin(), &goal).unwrap();
            let chord_sum: f64 = states
                .windows(2)
                .map(|w| (w[1].x - w[0].x).hypot(w[1].y - w[0].y))
                .sum();
            // Chords underestimate arcs by O((κ Δs)²) per step.
            assert!(
                (chord_sum - d).abs() < 0.05 * d.max(1.0),
                "{}: sampled {} vs distance {}",
                name,
                chord_sum,
                d
            );
        }
    }

    #[test]
    fn test_rigid_transform_invariance_everywhere() {
        let a = state(0.0, 0.0, 0.3);
        let b = state(5.0, 2.0, -1.1);
        let rot: f64 = 1.2;
        let (sin_r, cos_r) = rot.sin_cos();
        let shift = |s: &State| {
            State::new(
                s.x * cos_r - s.y * sin_r - 2.0,
                s.x * sin_r + s.y * cos_r + 4.0,
                s.theta + rot,
                s.kappa,
                s.d,
            )
        };
        for (name, space) in all_spaces() {
            let d0 = space.distance(&a, &b).unwrap();
            let d1 = space.distance(&shift(&a), &shift(&b)).unwrap();
            assert!((d0 - d1).abs() < 1e-6, "{}: {} vs {}", name, d0, d1);
        }
    }

    #[test]
    fn test_repeated_queries_bit_identical_everywhere() {
        let goal = state(3.0, -1.0, 2.0);
        for (name, space) in all_spaces() {
            let d0 = space.distance(&State::origin(), &goal).unwrap();
            let d1 = space.distance(&State::origin(), &goal).unwrap();
            assert_eq!(d0.to_bits(), d1.to_bits(), "{}", name);
            let c0 = space.controls(&State::origin(), &goal).unwrap();
            let c1 = space.controls(&State::origin(), &goal).unwrap();
            assert_eq!(c0.len(), c1.len(), "{}", name);
        }
    }

    #[test]
    fn test_sampled_curvature_bounded_everywhere() {
        let goal = state(-2.0, 4.0, 2.4);
        for (name, space) in all_spaces() {
            for s in space.path(&State::origin(), &goal).unwrap() {
                assert!(s.kappa.abs() <= 1.0 + 1e-9, "{}: {}", name, s.kappa);
            }
        }
    }

    #[test]
    fn test_controls_length_matches_distance_everywhere() {
        let goal = state(2.5, -3.5, -0.6);
        for (name, space) in all_spaces() {
            let d = space.distance(&State::origin(), &goal).unwrap();
            let controls = space.controls(&State::origin(), &goal).unwrap();
            let total: f64 = controls.iter().map(|c| c.delta_s.abs()).sum();
            assert!((total - d).abs() < 1e-9, "{}: {} vs {}", name, total, d);
        }
    }
}
