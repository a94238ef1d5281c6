//! Common types used throughout rust_steering

use nalgebra::{Vector3, Vector4};

use crate::geometry::normalize_angle;

/// Sense of travel at a sampled configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
    Stationary,
}

impl Direction {
    /// Direction implied by a signed arc length.
    pub fn from_signed_length(delta_s: f64) -> Self {
        if delta_s > 0.0 {
            Direction::Forward
        } else if delta_s < 0.0 {
            Direction::Backward
        } else {
            Direction::Stationary
        }
    }

    pub fn signum(&self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
            Direction::Stationary => 0.0,
        }
    }
}

/// Vehicle configuration: planar position, heading normalized to (-π, π],
/// signed curvature and the sense of travel at this configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
    pub kappa: f64,
    pub d: Direction,
}

impl State {
    pub fn new(x: f64, y: f64, theta: f64, kappa: f64, d: Direction) -> Self {
        Self {
            x,
            y,
            theta: normalize_angle(theta),
            kappa,
            d,
        }
    }

    pub fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, Direction::Stationary)
    }

    /// Pose without curvature and direction, as a tuple.
    pub fn pose(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.theta)
    }

    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.theta)
    }

    pub fn to_vector(&self) -> Vector4<f64> {
        Vector4::new(self.x, self.y, self.theta, self.kappa)
    }
}

/// One drivable control segment: an arc-length interval of constant
/// curvature rate. Lines and arcs have `sigma == 0`, clothoids carry the
/// rate that closes the curvature boundary conditions. The sign of
/// `delta_s` is the drive direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Control {
    /// Signed arc length [m].
    pub delta_s: f64,
    /// Curvature at the segment start [1/m].
    pub kappa: f64,
    /// Curvature rate with respect to signed arc length [1/m²].
    pub sigma: f64,
}

impl Control {
    pub fn straight(delta_s: f64) -> Self {
        Self {
            delta_s,
            kappa: 0.0,
            sigma: 0.0,
        }
    }

    pub fn arc(delta_s: f64, kappa: f64) -> Self {
        Self {
            delta_s,
            kappa,
            sigma: 0.0,
        }
    }

    pub fn clothoid(delta_s: f64, kappa: f64, sigma: f64) -> Self {
        Self {
            delta_s,
            kappa,
            sigma,
        }
    }

    pub fn direction(&self) -> Direction {
        Direction::from_signed_length(self.delta_s)
    }

    /// Curvature at the segment end.
    pub fn kappa_end(&self) -> f64 {
        self.kappa + self.sigma * self.delta_s
    }
}

/// Total (unsigned) arc length of a control sequence.
pub fn total_length(controls: &[Control]) -> f64 {
    controls.iter().map(|c| c.delta_s.abs()).sum()
}

/// Controls of the time-reversed path: same geometry traversed from the
/// far end, so segment order flips, signed lengths negate and each
/// segment starts at its former end curvature.
pub fn reverse_controls(controls: &[Control]) -> Vec<Control> {
    controls
        .iter()
        .rev()
        .map(|c| Control {
            delta_s: -c.delta_s,
            kappa: c.kappa_end(),
            sigma: c.sigma,
        })
        .collect()
}
