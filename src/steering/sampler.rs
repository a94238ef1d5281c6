//! Fixed-step sampling of control sequences and control-sequence cleanup.
//!
//! Each segment is propagated in closed form from its exact start state,
//! so discretization error never accumulates across segments and every
//! segment boundary is represented exactly.

use crate::common::{Control, Direction, State};
use crate::geometry::{end_of_arc, end_of_clothoid, end_of_straight, EPSILON};

/// State after driving unsigned arc length `t` into `control` from `state`.
fn advance(state: &State, control: &Control, t: f64) -> State {
    let s = control.direction().signum() * t;
    if control.sigma.abs() > EPSILON {
        let (x, y, theta, kappa) =
            end_of_clothoid(state.x, state.y, state.theta, control.kappa, control.sigma, s);
        State {
            x,
            y,
            theta,
            kappa,
            d: control.direction(),
        }
    } else if control.kappa.abs() > EPSILON {
        let (x, y, theta) = end_of_arc(state.x, state.y, state.theta, control.kappa, s);
        State {
            x,
            y,
            theta,
            kappa: control.kappa,
            d: control.direction(),
        }
    } else {
        let (x, y) = end_of_straight(state.x, state.y, state.theta, s);
        State {
            x,
            y,
            theta: state.theta,
            kappa: 0.0,
            d: control.direction(),
        }
    }
}

/// Sample the path described by `controls` from the world-frame `start`
/// at constant arc-length steps, closing each segment with an exact
/// partial step. Pure function of its inputs; an empty control sequence
/// yields the start state alone.
pub fn sample_path(start: &State, controls: &[Control], step: f64) -> Vec<State> {
    let first = State {
        kappa: controls.first().map_or(start.kappa, |c| c.kappa),
        d: controls
            .first()
            .map_or(Direction::Stationary, |c| c.direction()),
        ..*start
    };
    let mut states = vec![first];

    let mut segment_start = first;
    for control in controls {
        let length = control.delta_s.abs();
        if length < EPSILON {
            continue;
        }
        let full_steps = (length / step).floor() as usize;
        for k in 1..=full_steps {
            states.push(advance(&segment_start, control, k as f64 * step));
        }
        let end = advance(&segment_start, control, length);
        if length - full_steps as f64 * step > EPSILON {
            states.push(end);
        }
        segment_start = end;
    }
    states
}

/// Drop zero-length segments and fuse neighbours that continue the same
/// curvature profile in the same drive direction (collinear straights,
/// co-circular arcs, clothoid halves sharing one rate).
pub fn merge_controls(controls: &[Control]) -> Vec<Control> {
    let mut merged: Vec<Control> = Vec::new();
    for &control in controls {
        if control.delta_s.abs() < EPSILON {
            continue;
        }
        if let Some(last) = merged.last_mut() {
            if (last.sigma - control.sigma).abs() < EPSILON
                && (last.kappa_end() - control.kappa).abs() < EPSILON
                && last.delta_s.signum() == control.delta_s.signum()
            {
                last.delta_s += control.delta_s;
                continue;
            }
        }
        merged.push(control);
    }
    merged
}
