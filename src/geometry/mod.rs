//! Planar geometry primitives shared by every steering variant:
//! angle normalization, rigid frame changes and exact propagation along
//! straight, circular-arc and clothoid segments.

pub mod fresnel;

pub use fresnel::fresnel;

use std::f64::consts::PI;

/// Tolerance for feasibility and tangency decisions.
pub const EPSILON: f64 = 1e-9;

/// Normalize an angle to (-π, π].
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle;
    while a > PI {
        a -= 2.0 * PI;
    }
    while a <= -PI {
        a += 2.0 * PI;
    }
    a
}

/// Reduce an angle to [0, 2π).
pub fn mod2pi(angle: f64) -> f64 {
    let mut a = angle % (2.0 * PI);
    if a < 0.0 {
        a += 2.0 * PI;
    }
    a
}

/// Polar decomposition of a planar vector.
pub fn polar(x: f64, y: f64) -> (f64, f64) {
    (x.hypot(y), y.atan2(x))
}

pub fn point_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (x2 - x1).hypot(y2 - y1)
}

/// Map a point given in the frame (x, y, theta) to global coordinates.
pub fn global_frame_change(x: f64, y: f64, theta: f64, local_x: f64, local_y: f64) -> (f64, f64) {
    let (sin_t, cos_t) = theta.sin_cos();
    (
        x + local_x * cos_t - local_y * sin_t,
        y + local_x * sin_t + local_y * cos_t,
    )
}

/// Express a global point in the frame (x, y, theta).
pub fn local_frame_change(x: f64, y: f64, theta: f64, global_x: f64, global_y: f64) -> (f64, f64) {
    let (sin_t, cos_t) = theta.sin_cos();
    let dx = global_x - x;
    let dy = global_y - y;
    (dx * cos_t + dy * sin_t, -dx * sin_t + dy * cos_t)
}

/// Goal pose expressed in the canonical frame of the start pose
/// (start at the origin with zero heading). Rigid isometry, so path
/// lengths and curvatures are unchanged by it.
pub fn to_canonical_frame(
    start: (f64, f64, f64),
    goal: (f64, f64, f64),
) -> (f64, f64, f64) {
    let (x, y) = local_frame_change(start.0, start.1, start.2, goal.0, goal.1);
    (x, y, normalize_angle(goal.2 - start.2))
}

/// Inverse of [`to_canonical_frame`].
pub fn from_canonical_frame(
    start: (f64, f64, f64),
    canonical: (f64, f64, f64),
) -> (f64, f64, f64) {
    let (x, y) = global_frame_change(start.0, start.1, start.2, canonical.0, canonical.1);
    (x, y, normalize_angle(canonical.2 + start.2))
}

/// End pose of a straight segment of signed length `s`.
pub fn end_of_straight(x: f64, y: f64, theta: f64, s: f64) -> (f64, f64) {
    (x + s * theta.cos(), y + s * theta.sin())
}

/// End pose of a circular arc of curvature `kappa` and signed length `s`.
pub fn end_of_arc(x: f64, y: f64, theta: f64, kappa: f64, s: f64) -> (f64, f64, f64) {
    let theta_end = theta + kappa * s;
    (
        x + (theta_end.sin() - theta.sin()) / kappa,
        y - (theta_end.cos() - theta.cos()) / kappa,
        normalize_angle(theta_end),
    )
}

/// End state of a clothoid segment: curvature varies linearly from `kappa`
/// at rate `sigma` over signed arc length `s`. Position follows from the
/// Fresnel integrals of the standard spiral shifted to the arc position
/// where its curvature equals `kappa`.
pub fn end_of_clothoid(
    x: f64,
    y: f64,
    theta: f64,
    kappa: f64,
    sigma: f64,
    s: f64,
) -> (f64, f64, f64, f64) {
    let scale = (PI / sigma.abs()).sqrt();
    let k = 1.0 / scale;
    let s0 = kappa / sigma;
    let s1 = s0 + s;

    let (c0, s0_f) = fresnel(k * s0);
    let (c1, s1_f) = fresnel(k * s1);
    let dx_spiral = scale * (c1 - c0);
    let dy_spiral = sigma.signum() * scale * (s1_f - s0_f);

    // Tangent of the standard spiral at the shifted start.
    let phi0 = theta - 0.5 * sigma * s0 * s0;
    let (sin_p, cos_p) = phi0.sin_cos();
    (
        x + dx_spiral * cos_p - dy_spiral * sin_p,
        y + dx_spiral * sin_p + dy_spiral * cos_p,
        normalize_angle(theta + kappa * s + 0.5 * sigma * s * s),
        kappa + sigma * s,
    )
}
