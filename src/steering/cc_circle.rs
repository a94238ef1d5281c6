//! μ-circle geometry shared by the curvature-continuous and hybrid
//! curvature state spaces.
//!
//! A turn with bounded curvature rate starts and ends on a circle of
//! radius `r` around the center of its arc portion; the heading at a
//! zero-curvature turn endpoint deviates from the circle tangent by the
//! constant angle `μ`. Max-curvature configurations (cusps of hybrid
//! words, pinned endpoints) lie on the inner circle of radius 1/κ around
//! the same center. All word constructions reduce to placing circles at
//! the right center gaps and reading headings off these two relations:
//!
//!   zero curvature at polar angle ψ:  θ = ψ + λ(π/2 + ε μ)
//!   max curvature at polar angle ψ:   θ = ψ + λ π/2
//!
//! with λ = ±1 the steering side and ε = +1 at a turn entry driven
//! forward or a turn exit driven backward, −1 otherwise. A turn of
//! deflection δ advances ψ by λ d (δ + 2μ).

use std::f64::consts::{FRAC_PI_2, PI};

use crate::common::Control;
use crate::geometry::{
    end_of_clothoid, fresnel, global_frame_change, mod2pi, normalize_angle, point_distance,
    EPSILON,
};

/// Derived constants of the minimal turn for one (κ_max, σ_max) pair.
#[derive(Debug, Clone, Copy)]
pub struct CcParams {
    pub kappa: f64,
    pub sigma: f64,
    /// Radius of the outer circle holding zero-curvature turn endpoints.
    pub radius: f64,
    /// Angle between an endpoint heading and the circle tangent.
    pub mu: f64,
    pub sin_mu: f64,
    pub cos_mu: f64,
    /// Deflection of the minimal clothoid pair, κ²/σ.
    pub delta_min: f64,
    /// Radius of the arc portion, 1/κ.
    pub inner_radius: f64,
}

impl CcParams {
    pub fn new(kappa: f64, sigma: f64) -> Self {
        let length = kappa / sigma;
        let (x_i, y_i, theta_i, _) = end_of_clothoid(0.0, 0.0, 0.0, 0.0, sigma, length);
        let x_omega = x_i - theta_i.sin() / kappa;
        let y_omega = y_i + theta_i.cos() / kappa;
        let radius = x_omega.hypot(y_omega);
        let mu = (x_omega / y_omega).atan();
        Self {
            kappa,
            sigma,
            radius,
            mu,
            sin_mu: mu.sin(),
            cos_mu: mu.cos(),
            delta_min: kappa * kappa / sigma,
            inner_radius: 1.0 / kappa,
        }
    }
}

/// Curvature state demanded at a turn boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnBoundary {
    ZeroKappa,
    MaxKappa,
}

/// Junction types between consecutive turns of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JunctionKind {
    /// Same drive direction, curvature passes through zero.
    Smooth,
    /// Direction switch at zero curvature (curvature-continuous words).
    CuspZero,
    /// Direction switch at ±κ_max with re-steering while stationary
    /// (hybrid curvature words).
    CuspMax,
}

impl JunctionKind {
    /// Center gap between the circles meeting at this junction.
    pub fn gap(&self, p: &CcParams) -> f64 {
        match self {
            JunctionKind::Smooth => 2.0 * p.radius,
            JunctionKind::CuspZero => 2.0 * p.radius * p.cos_mu,
            JunctionKind::CuspMax => 2.0 * p.inner_radius,
        }
    }

    /// Curvature state at the junction.
    pub fn boundary(&self) -> TurnBoundary {
        match self {
            JunctionKind::Smooth | JunctionKind::CuspZero => TurnBoundary::ZeroKappa,
            JunctionKind::CuspMax => TurnBoundary::MaxKappa,
        }
    }

    /// Steering side and drive direction of the turn after the junction.
    pub fn next_flags(&self, left: bool, forward: bool) -> (bool, bool) {
        match self {
            JunctionKind::Smooth => (!left, forward),
            JunctionKind::CuspZero | JunctionKind::CuspMax => (!left, !forward),
        }
    }
}

/// Chord projection factor of a symmetric clothoid pair with total
/// deflection 2α (Fraichard-Scheuer elementary paths).
pub fn d1(alpha: f64) -> f64 {
    let s = (2.0 * alpha / PI).sqrt();
    let (c, sf) = fresnel(s);
    alpha.cos() * c + alpha.sin() * sf
}

/// One turn circle: center, steering side and drive direction.
#[derive(Debug, Clone, Copy)]
pub struct CcCircle {
    pub xc: f64,
    pub yc: f64,
    /// Steering side; left turns carry positive curvature.
    pub left: bool,
    /// Drive direction of this turn.
    pub forward: bool,
    pub param: CcParams,
}

impl CcCircle {
    /// Circle of a turn starting at `pose` with zero curvature.
    pub fn departing(pose: (f64, f64, f64), left: bool, forward: bool, param: CcParams) -> Self {
        let dx = if forward { 1.0 } else { -1.0 } * param.radius * param.sin_mu;
        let dy = if left { 1.0 } else { -1.0 } * param.radius * param.cos_mu;
        let (xc, yc) = global_frame_change(pose.0, pose.1, pose.2, dx, dy);
        Self {
            xc,
            yc,
            left,
            forward,
            param,
        }
    }

    /// Circle of a turn ending at `pose` with zero curvature.
    pub fn arriving(pose: (f64, f64, f64), left: bool, forward: bool, param: CcParams) -> Self {
        let dx = if forward { -1.0 } else { 1.0 } * param.radius * param.sin_mu;
        let dy = if left { 1.0 } else { -1.0 } * param.radius * param.cos_mu;
        let (xc, yc) = global_frame_change(pose.0, pose.1, pose.2, dx, dy);
        Self {
            xc,
            yc,
            left,
            forward,
            param,
        }
    }

    /// Circle of a turn starting or ending at `pose` at ±κ_max; the pose
    /// lies on the inner circle.
    pub fn pinned(pose: (f64, f64, f64), left: bool, forward: bool, param: CcParams) -> Self {
        let dy = if left { 1.0 } else { -1.0 } * param.inner_radius;
        let (xc, yc) = global_frame_change(pose.0, pose.1, pose.2, 0.0, dy);
        Self {
            xc,
            yc,
            left,
            forward,
            param,
        }
    }

    pub fn at_center(
        xc: f64,
        yc: f64,
        left: bool,
        forward: bool,
        param: CcParams,
    ) -> Self {
        Self {
            xc,
            yc,
            left,
            forward,
            param,
        }
    }

    pub fn lam(&self) -> f64 {
        if self.left {
            1.0
        } else {
            -1.0
        }
    }

    pub fn dir(&self) -> f64 {
        if self.forward {
            1.0
        } else {
            -1.0
        }
    }

    pub fn center_distance(&self, other: &CcCircle) -> f64 {
        point_distance(self.xc, self.yc, other.xc, other.yc)
    }

    /// Polar angle of a point as seen from this center.
    pub fn angle_of(&self, x: f64, y: f64) -> f64 {
        (y - self.yc).atan2(x - self.xc)
    }

    pub fn angle_to(&self, other: &CcCircle) -> f64 {
        self.angle_of(other.xc, other.yc)
    }

    /// Heading of the zero-curvature configuration at polar angle `psi`;
    /// `entry` selects the turn-entry relation, otherwise turn-exit.
    pub fn outer_heading(&self, psi: f64, entry: bool) -> f64 {
        let eps = if entry == self.forward { 1.0 } else { -1.0 };
        normalize_angle(psi + self.lam() * (FRAC_PI_2 + eps * self.param.mu))
    }

    /// Heading of the max-curvature configuration at polar angle `psi`.
    pub fn inner_heading(&self, psi: f64) -> f64 {
        normalize_angle(psi + self.lam() * FRAC_PI_2)
    }

    /// Deflection of this turn between its entry and exit headings.
    pub fn deflection(&self, theta_entry: f64, theta_exit: f64) -> f64 {
        mod2pi(self.lam() * self.dir() * (theta_exit - theta_entry))
    }

    /// Whether this turn alone reaches the zero-curvature `pose`.
    pub fn reaches_outer(&self, pose: (f64, f64, f64)) -> bool {
        let dist = point_distance(self.xc, self.yc, pose.0, pose.1);
        if (dist - self.param.radius).abs() > EPSILON {
            return false;
        }
        let psi = self.angle_of(pose.0, pose.1);
        normalize_angle(pose.2 - self.outer_heading(psi, false)).abs() < EPSILON
    }

    /// Whether this turn alone reaches the max-curvature `pose`.
    pub fn reaches_inner(&self, pose: (f64, f64, f64)) -> bool {
        let dist = point_distance(self.xc, self.yc, pose.0, pose.1);
        if (dist - self.param.inner_radius).abs() > EPSILON {
            return false;
        }
        let psi = self.angle_of(pose.0, pose.1);
        normalize_angle(pose.2 - self.inner_heading(psi)).abs() < EPSILON
    }

    /// Control segments of one turn with deflection `delta` between the
    /// given boundary curvature states. `None` only when the elementary
    /// construction and its regular fallback are both inapplicable.
    pub fn turn_controls(
        &self,
        delta: f64,
        entry: TurnBoundary,
        exit: TurnBoundary,
    ) -> Option<Vec<Control>> {
        let p = self.param;
        let lam = self.lam();
        let dir = self.dir();
        let arc_kappa = lam * p.kappa;
        let sigma_up = lam * dir * p.sigma;
        let clothoid_len = p.kappa / p.sigma;

        match (entry, exit) {
            (TurnBoundary::ZeroKappa, TurnBoundary::ZeroKappa) => self.cc_turn(delta),
            (TurnBoundary::ZeroKappa, TurnBoundary::MaxKappa) => {
                let delta = if delta < 0.5 * p.delta_min - EPSILON {
                    delta + 2.0 * PI
                } else {
                    delta
                };
                Some(vec![
                    Control::clothoid(dir * clothoid_len, 0.0, sigma_up),
                    Control::arc(dir * (delta - 0.5 * p.delta_min) / p.kappa, arc_kappa),
                ])
            }
            (TurnBoundary::MaxKappa, TurnBoundary::ZeroKappa) => {
                let delta = if delta < 0.5 * p.delta_min - EPSILON {
                    delta + 2.0 * PI
                } else {
                    delta
                };
                Some(vec![
                    Control::arc(dir * (delta - 0.5 * p.delta_min) / p.kappa, arc_kappa),
                    Control::clothoid(dir * clothoid_len, arc_kappa, -sigma_up),
                ])
            }
            (TurnBoundary::MaxKappa, TurnBoundary::MaxKappa) => {
                Some(vec![Control::arc(dir * delta / p.kappa, arc_kappa)])
            }
        }
    }

    /// Clothoid-arc-clothoid turn with zero curvature at both ends; small
    /// deflections become elementary two-clothoid paths of reduced
    /// sharpness, with a full-loop regular turn as fallback when the
    /// elementary sharpness would exceed the configured rate.
    fn cc_turn(&self, delta: f64) -> Option<Vec<Control>> {
        let p = self.param;
        let lam = self.lam();
        let dir = self.dir();
        let arc_kappa = lam * p.kappa;
        let sigma_up = lam * dir * p.sigma;
        let clothoid_len = p.kappa / p.sigma;

        if delta < EPSILON {
            // Degenerate deflection: the endpoints are one chord apart.
            return Some(vec![Control::straight(dir * 2.0 * p.radius * p.sin_mu)]);
        }
        if delta >= p.delta_min - EPSILON {
            return Some(vec![
                Control::clothoid(dir * clothoid_len, 0.0, sigma_up),
                Control::arc(dir * (delta - p.delta_min) / p.kappa, arc_kappa),
                Control::clothoid(dir * clothoid_len, arc_kappa, -sigma_up),
            ]);
        }

        let chord = 2.0 * p.radius * (0.5 * delta + p.mu).sin();
        let projection = d1(0.5 * delta);
        let sharpness = 4.0 * PI * projection * projection / (chord * chord);
        if sharpness.is_finite() && sharpness <= p.sigma + EPSILON {
            let half_len = (delta / sharpness).sqrt();
            let kappa_peak = lam * (delta * sharpness).sqrt();
            return Some(vec![
                Control::clothoid(dir * half_len, 0.0, lam * dir * sharpness),
                Control::clothoid(dir * half_len, kappa_peak, -lam * dir * sharpness),
            ]);
        }
        // Fall back to a regular turn around the long way.
        let delta = delta + 2.0 * PI;
        Some(vec![
            Control::clothoid(dir * clothoid_len, 0.0, sigma_up),
            Control::arc(dir * (delta - p.delta_min) / p.kappa, arc_kappa),
            Control::clothoid(dir * clothoid_len, arc_kappa, -sigma_up),
        ])
    }
}

/// Heading at a junction of kind `kind` from circle `c1` onto the circle
/// centered at (x2, y2). Valid when the centers are one junction gap
/// apart.
pub fn junction_heading(c1: &CcCircle, x2: f64, y2: f64, kind: JunctionKind) -> f64 {
    let phi = c1.angle_of(x2, y2);
    match kind {
        JunctionKind::Smooth => c1.outer_heading(phi, false),
        JunctionKind::CuspZero => {
            let psi = phi + c1.lam() * c1.dir() * c1.param.mu;
            c1.outer_heading(psi, false)
        }
        JunctionKind::CuspMax => c1.inner_heading(phi),
    }
}

/// Straight-tangent connection between two turn circles driven in the
/// same direction. Returns the heading along the straight and its
/// length. External tangents join same-side circles, internal tangents
/// opposite-side circles.
pub fn tangent_line(c1: &CcCircle, c2: &CcCircle) -> Option<(f64, f64)> {
    let p = c1.param;
    let dist = c1.center_distance(c2);
    let phi = c1.angle_to(c2);
    let (motion, length) = if c1.left == c2.left {
        let length = dist - 2.0 * p.radius * p.sin_mu;
        if length < -EPSILON {
            return None;
        }
        (phi, length.max(0.0))
    } else {
        let offset = 2.0 * p.radius * p.cos_mu;
        if dist < 2.0 * p.radius - EPSILON {
            return None;
        }
        let along = (dist * dist - offset * offset).max(0.0).sqrt();
        let length = along - 2.0 * p.radius * p.sin_mu;
        if length < -EPSILON {
            return None;
        }
        (
            phi + c1.lam() * c1.dir() * offset.atan2(along),
            length.max(0.0),
        )
    };
    let theta = if c1.forward {
        motion
    } else {
        normalize_angle(motion + PI)
    };
    Some((theta, length))
}

/// Centers of a middle circle at gaps (g1, g2) from two outer circles;
/// zero, one or two placements.
pub fn middle_circle_centers(
    c1: &CcCircle,
    c2: &CcCircle,
    g1: f64,
    g2: f64,
) -> Vec<(f64, f64)> {
    let dist = c1.center_distance(c2);
    if dist > g1 + g2 + EPSILON || dist < (g1 - g2).abs() - EPSILON || dist < EPSILON {
        return Vec::new();
    }
    let a = (dist * dist + g1 * g1 - g2 * g2) / (2.0 * dist);
    let h = (g1 * g1 - a * a).max(0.0).sqrt();
    let ux = (c2.xc - c1.xc) / dist;
    let uy = (c2.yc - c1.yc) / dist;
    let base = (c1.xc + a * ux, c1.yc + a * uy);
    vec![
        (base.0 - h * uy, base.1 + h * ux),
        (base.0 + h * uy, base.1 - h * ux),
    ]
}

/// Symmetric placements of the two middle circles of a four-turn word:
/// gaps `g_outer` to the respective outer circles and `g_mid` between
/// the middle pair. Up to four (Ωa, Ωb) placements.
pub fn trapezoid_centers(
    c1: &CcCircle,
    c2: &CcCircle,
    g_outer: f64,
    g_mid: f64,
) -> Vec<((f64, f64), (f64, f64))> {
    let dist = c1.center_distance(c2);
    if dist < EPSILON {
        return Vec::new();
    }
    let phi = c1.angle_to(c2);
    let mut placements = Vec::new();
    for &mid_sign in &[-1.0, 1.0] {
        let cos_chi = (dist + mid_sign * g_mid) / (2.0 * g_outer);
        if cos_chi.abs() > 1.0 {
            continue;
        }
        let chi = cos_chi.acos();
        for &side in &[-1.0, 1.0] {
            let a = (
                c1.xc + g_outer * (phi + side * chi).cos(),
                c1.yc + g_outer * (phi + side * chi).sin(),
            );
            let b = (
                c2.xc + g_outer * (phi + PI - side * chi).cos(),
                c2.yc + g_outer * (phi + PI - side * chi).sin(),
            );
            placements.push((a, b));
        }
    }
    placements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{total_length, State};
    use crate::steering::sampler::sample_path;

    fn params() -> CcParams {
        CcParams::new(1.0, 1.0)
    }

    #[test]
    fn test_params_for_unit_bounds() {
        let p = params();
        assert!((p.delta_min - 1.0).abs() < 1e-12);
        assert!((p.radius - 1.1534).abs() < 1e-3);
        assert!((p.mu - 0.4444).abs() < 1e-3);
        assert!(p.radius > p.inner_radius);
    }

    #[test]
    fn test_departing_circle_center() {
        let p = params();
        let c = CcCircle::departing((0.0, 0.0, 0.0), true, true, p);
        assert!((c.xc - p.radius * p.sin_mu).abs() < 1e-12);
        assert!((c.yc - p.radius * p.cos_mu).abs() < 1e-12);
    }

    /// Integrating the controls of a turn must land on the configuration
    /// predicted by the circle relations.
    fn check_turn(left: bool, forward: bool, delta: f64) {
        let p = params();
        let start = State::origin();
        let c = CcCircle::departing((0.0, 0.0, 0.0), left, forward, p);
        let controls = c
            .turn_controls(delta, TurnBoundary::ZeroKappa, TurnBoundary::ZeroKappa)
            .unwrap();
        let states = sample_path(&start, &controls, 0.01);
        let end = states.last().unwrap();

        let psi_start = c.angle_of(0.0, 0.0);
        let psi_end = psi_start + c.lam() * c.dir() * (delta + 2.0 * p.mu);
        let expect_x = c.xc + p.radius * psi_end.cos();
        let expect_y = c.yc + p.radius * psi_end.sin();
        let expect_theta = c.outer_heading(psi_end, false);
        assert!(
            (end.x - expect_x).abs() < 1e-6,
            "x: {} vs {}",
            end.x,
            expect_x
        );
        assert!((end.y - expect_y).abs() < 1e-6);
        assert!(normalize_angle(end.theta - expect_theta).abs() < 1e-6);
    }

    #[test]
    fn test_regular_turn_matches_circle_relations() {
        check_turn(true, true, 1.8);
        check_turn(false, true, 2.5);
        check_turn(true, false, 1.4);
        check_turn(false, false, 3.0);
    }

    #[test]
    fn test_elementary_turn_matches_circle_relations() {
        check_turn(true, true, 0.5);
        check_turn(false, true, 0.3);
        check_turn(true, false, 0.8);
    }

    #[test]
    fn test_degenerate_turn_is_one_chord() {
        let p = params();
        let c = CcCircle::departing((0.0, 0.0, 0.0), true, true, p);
        let controls = c
            .turn_controls(0.0, TurnBoundary::ZeroKappa, TurnBoundary::ZeroKappa)
            .unwrap();
        assert_eq!(controls.len(), 1);
        assert!((total_length(&controls) - 2.0 * p.radius * p.sin_mu).abs() < 1e-12);
    }

    #[test]
    fn test_hc_turn_reaches_inner_circle() {
        let p = params();
        let start = State::origin();
        let c = CcCircle::departing((0.0, 0.0, 0.0), true, true, p);
        let delta = 1.2;
        let controls = c
            .turn_controls(delta, TurnBoundary::ZeroKappa, TurnBoundary::MaxKappa)
            .unwrap();
        let states = sample_path(&start, &controls, 0.01);
        let end = states.last().unwrap();
        assert!((end.kappa - 1.0).abs() < 1e-9);
        let dist = point_distance(c.xc, c.yc, end.x, end.y);
        assert!((dist - p.inner_radius).abs() < 1e-6);
        assert!(normalize_angle(end.theta - delta).abs() < 1e-6);
    }

    #[test]
    fn test_turn_curvature_rate_bounded() {
        let p = params();
        let c = CcCircle::departing((0.0, 0.0, 0.0), true, true, p);
        for &delta in &[0.2, 0.7, 1.0, 2.0, 4.0] {
            let controls = c
                .turn_controls(delta, TurnBoundary::ZeroKappa, TurnBoundary::ZeroKappa)
                .unwrap();
            for control in &controls {
                assert!(control.sigma.abs() <= p.sigma + 1e-9);
                assert!(control.kappa.abs() <= p.kappa + 1e-9);
            }
        }
    }

    #[test]
    fn test_d1_at_delta_min_recovers_sigma() {
        // At δ = δ_min the elementary sharpness equals σ itself.
        let p = params();
        let delta = p.delta_min;
        let chord = 2.0 * p.radius * (0.5 * delta + p.mu).sin();
        let projection = d1(0.5 * delta);
        let sharpness = 4.0 * PI * projection * projection / (chord * chord);
        assert!((sharpness - p.sigma).abs() < 1e-6);
    }

    #[test]
    fn test_middle_circle_centers_symmetric() {
        let p = params();
        let c1 = CcCircle::at_center(0.0, 0.0, true, true, p);
        let c2 = CcCircle::at_center(3.0, 0.0, true, true, p);
        let centers = middle_circle_centers(&c1, &c2, 2.0, 2.0);
        assert_eq!(centers.len(), 2);
        for (x, y) in centers {
            assert!((point_distance(x, y, 0.0, 0.0) - 2.0).abs() < 1e-9);
            assert!((point_distance(x, y, 3.0, 0.0) - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_trapezoid_centers_hold_gaps() {
        let p = params();
        let c1 = CcCircle::at_center(0.0, 0.0, true, true, p);
        let c2 = CcCircle::at_center(4.0, 1.0, true, true, p);
        for (a, b) in trapezoid_centers(&c1, &c2, 2.0, 1.5) {
            assert!((point_distance(a.0, a.1, 0.0, 0.0) - 2.0).abs() < 1e-9);
            assert!((point_distance(b.0, b.1, 4.0, 1.0) - 2.0).abs() < 1e-9);
            assert!((point_distance(a.0, a.1, b.0, b.1) - 1.5).abs() < 1e-9);
        }
    }
}
