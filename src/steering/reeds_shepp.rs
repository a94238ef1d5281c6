//! Reeds-Shepp state space: shortest bounded-curvature paths with forward
//! and backward motion.
//!
//! Twelve base word families are solved in the canonical frame with unit
//! curvature; the timeflip and reflect symmetries expand them to the full
//! catalogue of up to 48 candidates. An `x` in a family name marks a
//! direction switch (cusp) at that junction.

use ordered_float::OrderedFloat;

use crate::common::{total_length, Control, State, StateSpace, SteeringError, SteeringResult};
use crate::geometry::{mod2pi, polar, to_canonical_frame, EPSILON};
use crate::steering::sampler::{merge_controls, sample_path};

use std::f64::consts::{FRAC_PI_2, PI};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Seg {
    Left,
    Straight,
    Right,
}

impl Seg {
    fn reflected(self) -> Self {
        match self {
            Seg::Left => Seg::Right,
            Seg::Right => Seg::Left,
            Seg::Straight => Seg::Straight,
        }
    }
}

type Word = (Vec<f64>, Vec<Seg>);

/// Reduce an angle to [-π, π).
fn wrap(angle: f64) -> f64 {
    let a = mod2pi(angle);
    if a >= PI {
        a - 2.0 * PI
    } else {
        a
    }
}

fn lsl(x: f64, y: f64, phi: f64) -> Option<Word> {
    let (u, t) = polar(x - phi.sin(), y - 1.0 + phi.cos());
    if t >= 0.0 {
        let v = mod2pi(phi - t);
        return Some((vec![t, u, v], vec![Seg::Left, Seg::Straight, Seg::Left]));
    }
    None
}

fn lsr(x: f64, y: f64, phi: f64) -> Option<Word> {
    let (u1, t1) = polar(x + phi.sin(), y - 1.0 - phi.cos());
    let u1_sq = u1 * u1;
    if u1_sq < 4.0 {
        return None;
    }
    let u = (u1_sq - 4.0).sqrt();
    let theta = 2.0_f64.atan2(u);
    let t = mod2pi(t1 + theta);
    let v = mod2pi(t - phi);
    if t >= 0.0 && v >= 0.0 {
        return Some((vec![t, u, v], vec![Seg::Left, Seg::Straight, Seg::Right]));
    }
    None
}

fn l_x_r_x_l(x: f64, y: f64, phi: f64) -> Option<Word> {
    let (u1, theta) = polar(x - phi.sin(), y - 1.0 + phi.cos());
    if u1 > 4.0 {
        return None;
    }
    let a = (0.25 * u1).acos();
    let t = mod2pi(a + theta + FRAC_PI_2);
    let u = mod2pi(PI - 2.0 * a);
    let v = mod2pi(phi - t - u);
    Some((vec![t, -u, v], vec![Seg::Left, Seg::Right, Seg::Left]))
}

fn l_x_r_l(x: f64, y: f64, phi: f64) -> Option<Word> {
    let (u1, theta) = polar(x - phi.sin(), y - 1.0 + phi.cos());
    if u1 > 4.0 {
        return None;
    }
    let a = (0.25 * u1).acos();
    let t = mod2pi(a + theta + FRAC_PI_2);
    let u = mod2pi(PI - 2.0 * a);
    let v = mod2pi(t + u - phi);
    Some((vec![t, -u, -v], vec![Seg::Left, Seg::Right, Seg::Left]))
}

fn l_r_x_l(x: f64, y: f64, phi: f64) -> Option<Word> {
    let (u1, theta) = polar(x - phi.sin(), y - 1.0 + phi.cos());
    if u1 > 4.0 {
        return None;
    }
    let u = (1.0 - u1 * u1 * 0.125).acos();
    if !u.is_finite() {
        return None;
    }
    let a = (2.0 * u.sin() / u1).asin();
    if !a.is_finite() {
        return None;
    }
    let t = mod2pi(-a + theta + FRAC_PI_2);
    let v = mod2pi(t - u - phi);
    Some((vec![t, u, -v], vec![Seg::Left, Seg::Right, Seg::Left]))
}

fn l_r_x_l_r(x: f64, y: f64, phi: f64) -> Option<Word> {
    let (u1, theta) = polar(x + phi.sin(), y - 1.0 - phi.cos());
    if u1 > 2.0 {
        return None;
    }
    let a = ((u1 + 2.0) * 0.25).acos();
    let t = mod2pi(theta + a + FRAC_PI_2);
    let u = mod2pi(a);
    let v = mod2pi(phi - t + 2.0 * u);
    if t >= 0.0 && u >= 0.0 && v >= 0.0 {
        return Some((
            vec![t, u, -u, -v],
            vec![Seg::Left, Seg::Right, Seg::Left, Seg::Right],
        ));
    }
    None
}

fn l_x_r_l_x_r(x: f64, y: f64, phi: f64) -> Option<Word> {
    let (u1, theta) = polar(x + phi.sin(), y - 1.0 - phi.cos());
    let u2 = (20.0 - u1 * u1) / 16.0;
    if !(0.0..=1.0).contains(&u2) {
        return None;
    }
    let u = u2.acos();
    let a = (2.0 * u.sin() / u1).asin();
    if !a.is_finite() {
        return None;
    }
    let t = mod2pi(theta + a + FRAC_PI_2);
    let v = mod2pi(t - phi);
    if t >= 0.0 && v >= 0.0 {
        return Some((
            vec![t, -u, -u, v],
            vec![Seg::Left, Seg::Right, Seg::Left, Seg::Right],
        ));
    }
    None
}

fn l_x_r90_s_l(x: f64, y: f64, phi: f64) -> Option<Word> {
    let (u1, theta) = polar(x - phi.sin(), y - 1.0 + phi.cos());
    if u1 < 2.0 {
        return None;
    }
    let u = (u1 * u1 - 4.0).sqrt() - 2.0;
    let a = 2.0_f64.atan2((u1 * u1 - 4.0).sqrt());
    let t = mod2pi(theta + a + FRAC_PI_2);
    let v = mod2pi(t - phi + FRAC_PI_2);
    if t >= 0.0 && u >= 0.0 && v >= 0.0 {
        return Some((
            vec![t, -FRAC_PI_2, -u, -v],
            vec![Seg::Left, Seg::Right, Seg::Straight, Seg::Left],
        ));
    }
    None
}

fn l_s_r90_x_l(x: f64, y: f64, phi: f64) -> Option<Word> {
    let (u1, theta) = polar(x - phi.sin(), y - 1.0 + phi.cos());
    if u1 < 2.0 {
        return None;
    }
    let u = (u1 * u1 - 4.0).sqrt() - 2.0;
    let a = ((u1 * u1 - 4.0).sqrt()).atan2(2.0);
    let t = mod2pi(theta - a + FRAC_PI_2);
    let v = mod2pi(t - phi - FRAC_PI_2);
    if t >= 0.0 && u >= 0.0 && v >= 0.0 {
        return Some((
            vec![t, u, FRAC_PI_2, -v],
            vec![Seg::Left, Seg::Straight, Seg::Right, Seg::Left],
        ));
    }
    None
}

fn l_x_r90_s_r(x: f64, y: f64, phi: f64) -> Option<Word> {
    let (u1, theta) = polar(x + phi.sin(), y - 1.0 - phi.cos());
    if u1 < 2.0 {
        return None;
    }
    let t = mod2pi(theta + FRAC_PI_2);
    let u = u1 - 2.0;
    let v = mod2pi(phi - t - FRAC_PI_2);
    if t >= 0.0 && u >= 0.0 && v >= 0.0 {
        return Some((
            vec![t, -FRAC_PI_2, -u, -v],
            vec![Seg::Left, Seg::Right, Seg::Straight, Seg::Right],
        ));
    }
    None
}

fn l_s_l90_x_r(x: f64, y: f64, phi: f64) -> Option<Word> {
    let (u1, theta) = polar(x + phi.sin(), y - 1.0 - phi.cos());
    if u1 < 2.0 {
        return None;
    }
    let t = mod2pi(theta);
    let u = u1 - 2.0;
    let v = mod2pi(phi - t - FRAC_PI_2);
    if t >= 0.0 && u >= 0.0 && v >= 0.0 {
        return Some((
            vec![t, u, FRAC_PI_2, -v],
            vec![Seg::Left, Seg::Straight, Seg::Left, Seg::Right],
        ));
    }
    None
}

fn l_x_r90_s_l90_x_r(x: f64, y: f64, phi: f64) -> Option<Word> {
    let (u1, theta) = polar(x + phi.sin(), y - 1.0 - phi.cos());
    if u1 < 4.0 {
        return None;
    }
    let u = (u1 * u1 - 4.0).sqrt() - 4.0;
    let a = 2.0_f64.atan2((u1 * u1 - 4.0).sqrt());
    let t = mod2pi(theta + a + FRAC_PI_2);
    let v = mod2pi(t - phi);
    if t >= 0.0 && u >= 0.0 && v >= 0.0 {
        return Some((
            vec![t, -FRAC_PI_2, -u, -FRAC_PI_2, v],
            vec![Seg::Left, Seg::Right, Seg::Straight, Seg::Left, Seg::Right],
        ));
    }
    None
}

const BASE_WORDS: [fn(f64, f64, f64) -> Option<Word>; 12] = [
    lsl,
    lsr,
    l_x_r_x_l,
    l_x_r_l,
    l_r_x_l,
    l_r_x_l_r,
    l_x_r_l_x_r,
    l_x_r90_s_l,
    l_s_r90_x_l,
    l_x_r90_s_r,
    l_s_l90_x_r,
    l_x_r90_s_l90_x_r,
];

fn timeflip((lengths, kinds): Word) -> Word {
    (lengths.iter().map(|l| -l).collect(), kinds)
}

fn reflect((lengths, kinds): Word) -> Word {
    (lengths, kinds.iter().map(|k| k.reflected()).collect())
}

fn admissible(word: &Word) -> bool {
    word.0.iter().all(|l| l.is_finite())
}

/// Every candidate word for the canonical goal (x, y, phi), in fixed
/// catalogue order: base word, timeflip, reflect, timeflip + reflect.
fn enumerate_words(x: f64, y: f64, phi: f64) -> Vec<Word> {
    let mut words = Vec::with_capacity(48);
    for base in BASE_WORDS.iter() {
        if let Some(word) = base(x, y, phi) {
            words.push(word);
        }
        if let Some(word) = base(-x, y, -phi) {
            words.push(timeflip(word));
        }
        if let Some(word) = base(x, -y, -phi) {
            words.push(reflect(word));
        }
        if let Some(word) = base(-x, -y, phi) {
            words.push(reflect(timeflip(word)));
        }
    }
    words.retain(admissible);
    words
}

/// State space of Reeds-Shepp paths with maximum curvature `kappa_max`,
/// sampled at `discretization`. Forward and backward motion are both
/// admissible, so the distance is symmetric in its arguments.
#[derive(Debug, Clone)]
pub struct ReedsSheppStateSpace {
    kappa_max: f64,
    discretization: f64,
}

impl ReedsSheppStateSpace {
    pub fn new(kappa_max: f64, discretization: f64) -> SteeringResult<Self> {
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
        })
    }

    fn solve(&self, start: &State, goal: &State) -> SteeringResult<Vec<Control>> {
        let (cx, cy, cphi) = to_canonical_frame(start.pose(), goal.pose());
        if cx.hypot(cy) < EPSILON && cphi.abs() < EPSILON {
            return Ok(Vec::new());
        }
        let x = cx * self.kappa_max;
        let y = cy * self.kappa_max;
        let phi = wrap(cphi);

        let mut best: Option<Word> = None;
        let mut best_length = f64::INFINITY;
        for word in enumerate_words(x, y, phi) {
            let length: f64 = word.0.iter().map(|l| l.abs()).sum();
            if OrderedFloat(length) < OrderedFloat(best_length) {
                best_length = length;
                best = Some(word);
            }
        }

        let (lengths, kinds) = best.ok_or_else(|| {
            SteeringError::NoPath("reeds-shepp catalogue exhausted".to_string())
        })?;
        Ok(lengths
            .iter()
            .zip(kinds.iter())
            .map(|(&len, kind)| match kind {
                Seg::Left => Control::arc(len / self.kappa_max, self.kappa_max),
                Seg::Right => Control::arc(len / self.kappa_max, -self.kappa_max),
                Seg::Straight => Control::straight(len / self.kappa_max),
            })
            .collect())
    }
}

impl StateSpace for ReedsSheppStateSpace {
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
