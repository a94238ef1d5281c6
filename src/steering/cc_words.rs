//! Word catalogue shared by the curvature-continuous and hybrid
//! curvature solvers.
//!
//! Families are named after their turn/straight structure; a `c` marks a
//! cusp junction. The same constructions serve every variant: the cusp
//! kind (zero-curvature tangency for CC words, inner-circle tangency for
//! HC words) and the endpoint curvature boundaries are parameters of the
//! context, the circle algebra is identical.

use std::f64::consts::PI;

use itertools::iproduct;
use ordered_float::OrderedFloat;

use crate::common::{reverse_controls, total_length, Control};
use crate::geometry::{normalize_angle, EPSILON};
use crate::steering::cc_circle::{
    junction_heading, middle_circle_centers, tangent_line, trapezoid_centers, CcCircle, CcParams,
    JunctionKind, TurnBoundary,
};

/// Everything a family construction needs to know about one query.
#[derive(Debug, Clone, Copy)]
pub struct WordCtx {
    pub params: CcParams,
    /// Junction kind at direction switches.
    pub cusp: JunctionKind,
    pub start: (f64, f64, f64),
    pub goal: (f64, f64, f64),
    pub start_boundary: TurnBoundary,
    pub goal_boundary: TurnBoundary,
    /// Steering sides admissible for the first turn (left, right).
    pub start_sides: (bool, bool),
    /// Steering sides admissible for the last turn.
    pub goal_sides: (bool, bool),
    /// Drive directions admissible anywhere in a word (forward, backward).
    pub directions: (bool, bool),
    /// Whether direction switches are part of the catalogue at all.
    pub allow_cusps: bool,
}

impl WordCtx {
    fn start_circle(&self, left: bool, forward: bool) -> CcCircle {
        match self.start_boundary {
            TurnBoundary::ZeroKappa => CcCircle::departing(self.start, left, forward, self.params),
            TurnBoundary::MaxKappa => CcCircle::pinned(self.start, left, forward, self.params),
        }
    }

    fn goal_circle(&self, left: bool, forward: bool) -> CcCircle {
        match self.goal_boundary {
            TurnBoundary::ZeroKappa => CcCircle::arriving(self.goal, left, forward, self.params),
            TurnBoundary::MaxKappa => CcCircle::pinned(self.goal, left, forward, self.params),
        }
    }

    fn reversed(&self) -> WordCtx {
        WordCtx {
            start: self.goal,
            goal: self.start,
            start_boundary: self.goal_boundary,
            goal_boundary: self.start_boundary,
            start_sides: self.goal_sides,
            goal_sides: self.start_sides,
            ..*self
        }
    }

    fn side_options(sides: (bool, bool)) -> Vec<bool> {
        let mut options = Vec::new();
        if sides.0 {
            options.push(true);
        }
        if sides.1 {
            options.push(false);
        }
        options
    }

    fn direction_options(&self) -> Vec<bool> {
        Self::side_options(self.directions)
    }
}

fn straight_control(length: f64, forward: bool) -> Control {
    Control::straight(if forward { length } else { -length })
}

/// Single turn carrying the whole query.
fn t_word(ctx: &WordCtx, c1: &CcCircle) -> Option<Vec<Control>> {
    let reaches = match ctx.goal_boundary {
        TurnBoundary::ZeroKappa => c1.reaches_outer(ctx.goal),
        TurnBoundary::MaxKappa => c1.reaches_inner(ctx.goal),
    };
    if !reaches {
        return None;
    }
    let delta = c1.deflection(ctx.start.2, ctx.goal.2);
    c1.turn_controls(delta, ctx.start_boundary, ctx.goal_boundary)
}

/// Two turns joined without a direction switch.
fn tt_word(ctx: &WordCtx, c1: &CcCircle, c2: &CcCircle) -> Option<Vec<Control>> {
    if (c1.center_distance(c2) - JunctionKind::Smooth.gap(&ctx.params)).abs() > EPSILON {
        return None;
    }
    let theta = junction_heading(c1, c2.xc, c2.yc, JunctionKind::Smooth);
    let mut word = c1.turn_controls(
        c1.deflection(ctx.start.2, theta),
        ctx.start_boundary,
        TurnBoundary::ZeroKappa,
    )?;
    word.extend(c2.turn_controls(
        c2.deflection(theta, ctx.goal.2),
        TurnBoundary::ZeroKappa,
        ctx.goal_boundary,
    )?);
    Some(word)
}

/// Two turns joined by a cusp.
fn tct_word(ctx: &WordCtx, c1: &CcCircle, c2: &CcCircle) -> Option<Vec<Control>> {
    if (c1.center_distance(c2) - ctx.cusp.gap(&ctx.params)).abs() > EPSILON {
        return None;
    }
    let boundary = ctx.cusp.boundary();
    let theta = junction_heading(c1, c2.xc, c2.yc, ctx.cusp);
    let mut word = c1.turn_controls(
        c1.deflection(ctx.start.2, theta),
        ctx.start_boundary,
        boundary,
    )?;
    word.extend(c2.turn_controls(c2.deflection(theta, ctx.goal.2), boundary, ctx.goal_boundary)?);
    Some(word)
}

/// Turn, straight, turn.
fn tst_word(ctx: &WordCtx, c1: &CcCircle, c2: &CcCircle) -> Option<Vec<Control>> {
    let (theta, length) = tangent_line(c1, c2)?;
    let mut word = c1.turn_controls(
        c1.deflection(ctx.start.2, theta),
        ctx.start_boundary,
        TurnBoundary::ZeroKappa,
    )?;
    word.push(straight_control(length, c1.forward));
    word.extend(c2.turn_controls(
        c2.deflection(theta, ctx.goal.2),
        TurnBoundary::ZeroKappa,
        ctx.goal_boundary,
    )?);
    Some(word)
}

/// Three turns; junction kinds select TTT, TcTcT, TcTT and TTcT.
fn three_turn_words(
    ctx: &WordCtx,
    c1: &CcCircle,
    c2: &CcCircle,
    first: JunctionKind,
    second: JunctionKind,
    out: &mut Vec<Vec<Control>>,
) {
    let (mid_left, mid_forward) = first.next_flags(c1.left, c1.forward);
    for (mx, my) in middle_circle_centers(
        c1,
        c2,
        first.gap(&ctx.params),
        second.gap(&ctx.params),
    ) {
        let cm = CcCircle::at_center(mx, my, mid_left, mid_forward, ctx.params);
        let theta_1 = junction_heading(c1, mx, my, first);
        let theta_2 = junction_heading(&cm, c2.xc, c2.yc, second);
        let word = (|| {
            let mut word = c1.turn_controls(
                c1.deflection(ctx.start.2, theta_1),
                ctx.start_boundary,
                first.boundary(),
            )?;
            word.extend(cm.turn_controls(
                cm.deflection(theta_1, theta_2),
                first.boundary(),
                second.boundary(),
            )?);
            word.extend(c2.turn_controls(
                c2.deflection(theta_2, ctx.goal.2),
                second.boundary(),
                ctx.goal_boundary,
            )?);
            Some(word)
        })();
        if let Some(word) = word {
            out.push(word);
        }
    }
}

/// Straight-tangent solution where cusp circles of gaps `gap_before` and
/// `gap_after` are interposed along the motion direction on either side
/// of the straight. The cusp center lines are parallel to the straight,
/// which pins the cusp-adjacent turns to quarter deflections.
fn cusp_tangent(
    c1: &CcCircle,
    c2: &CcCircle,
    gap_before: f64,
    gap_after: f64,
    internal: bool,
    turn_sign: f64,
) -> Option<(f64, f64)> {
    let p = c1.param;
    let dist = c1.center_distance(c2);
    let phi = c1.angle_to(c2);
    let slack = gap_before + gap_after + 2.0 * p.radius * p.sin_mu;
    if !internal {
        let length = dist - slack;
        if length < -EPSILON {
            return None;
        }
        Some((phi, length.max(0.0)))
    } else {
        let offset = 2.0 * p.radius * p.cos_mu;
        let along_sq = dist * dist - offset * offset;
        if along_sq < 0.0 {
            return None;
        }
        let along = along_sq.sqrt();
        let length = along - slack;
        if length < -EPSILON {
            return None;
        }
        Some((phi + turn_sign * offset.atan2(along), length.max(0.0)))
    }
}

/// Turn, cusp, turn, straight, turn.
fn tctst_word(ctx: &WordCtx, c1: &CcCircle, c2: &CcCircle) -> Option<Vec<Control>> {
    let gap = ctx.cusp.gap(&ctx.params);
    let internal = c2.left == c1.left;
    let (motion, length) = cusp_tangent(c1, c2, gap, 0.0, internal, c1.lam() * c1.dir())?;
    let mid_center = (c1.xc + gap * motion.cos(), c1.yc + gap * motion.sin());
    let cm = CcCircle::at_center(mid_center.0, mid_center.1, !c1.left, !c1.forward, ctx.params);
    let boundary = ctx.cusp.boundary();
    let theta_cusp = junction_heading(c1, mid_center.0, mid_center.1, ctx.cusp);
    let theta_straight = if cm.forward {
        motion
    } else {
        normalize_angle(motion + PI)
    };

    let mut word = c1.turn_controls(
        c1.deflection(ctx.start.2, theta_cusp),
        ctx.start_boundary,
        boundary,
    )?;
    word.extend(cm.turn_controls(
        cm.deflection(theta_cusp, theta_straight),
        boundary,
        TurnBoundary::ZeroKappa,
    )?);
    word.push(straight_control(length, cm.forward));
    word.extend(c2.turn_controls(
        c2.deflection(theta_straight, ctx.goal.2),
        TurnBoundary::ZeroKappa,
        ctx.goal_boundary,
    )?);
    Some(word)
}

/// Turn, cusp, turn, straight, turn, cusp, turn.
fn tctstct_word(ctx: &WordCtx, c1: &CcCircle, c2: &CcCircle) -> Option<Vec<Control>> {
    let gap = ctx.cusp.gap(&ctx.params);
    let internal = c2.left != c1.left;
    let (motion, length) = cusp_tangent(c1, c2, gap, gap, internal, c1.lam() * c1.dir())?;
    let (sin_m, cos_m) = motion.sin_cos();
    let first_center = (c1.xc + gap * cos_m, c1.yc + gap * sin_m);
    let second_center = (c2.xc - gap * cos_m, c2.yc - gap * sin_m);
    let cm1 = CcCircle::at_center(
        first_center.0,
        first_center.1,
        !c1.left,
        !c1.forward,
        ctx.params,
    );
    let cm2 = CcCircle::at_center(
        second_center.0,
        second_center.1,
        !c2.left,
        !c2.forward,
        ctx.params,
    );
    let boundary = ctx.cusp.boundary();
    let theta_cusp_1 = junction_heading(c1, first_center.0, first_center.1, ctx.cusp);
    let theta_cusp_2 = junction_heading(&cm2, c2.xc, c2.yc, ctx.cusp);
    let theta_straight = if cm1.forward {
        motion
    } else {
        normalize_angle(motion + PI)
    };

    let mut word = c1.turn_controls(
        c1.deflection(ctx.start.2, theta_cusp_1),
        ctx.start_boundary,
        boundary,
    )?;
    word.extend(cm1.turn_controls(
        cm1.deflection(theta_cusp_1, theta_straight),
        boundary,
        TurnBoundary::ZeroKappa,
    )?);
    word.push(straight_control(length, cm1.forward));
    word.extend(cm2.turn_controls(
        cm2.deflection(theta_straight, theta_cusp_2),
        TurnBoundary::ZeroKappa,
        boundary,
    )?);
    word.extend(c2.turn_controls(
        c2.deflection(theta_cusp_2, ctx.goal.2),
        boundary,
        ctx.goal_boundary,
    )?);
    Some(word)
}

/// Four turns with the cusp in the middle (TTcTT) or on both outer
/// junctions (TcTTcT).
fn four_turn_words(
    ctx: &WordCtx,
    c1: &CcCircle,
    c2: &CcCircle,
    cusp_outer: bool,
    out: &mut Vec<Vec<Control>>,
) {
    let cusp_gap = ctx.cusp.gap(&ctx.params);
    let smooth_gap = JunctionKind::Smooth.gap(&ctx.params);
    let (g_outer, g_mid) = if cusp_outer {
        (cusp_gap, smooth_gap)
    } else {
        (smooth_gap, cusp_gap)
    };
    let (first, second, third) = if cusp_outer {
        (ctx.cusp, JunctionKind::Smooth, ctx.cusp)
    } else {
        (JunctionKind::Smooth, ctx.cusp, JunctionKind::Smooth)
    };
    let (a_left, a_forward) = first.next_flags(c1.left, c1.forward);
    let (b_left, b_forward) = second.next_flags(a_left, a_forward);
    for (a, b) in trapezoid_centers(c1, c2, g_outer, g_mid) {
        let ca = CcCircle::at_center(a.0, a.1, a_left, a_forward, ctx.params);
        let cb = CcCircle::at_center(b.0, b.1, b_left, b_forward, ctx.params);
        let theta_1 = junction_heading(c1, a.0, a.1, first);
        let theta_2 = junction_heading(&ca, b.0, b.1, second);
        let theta_3 = junction_heading(&cb, c2.xc, c2.yc, third);
        let word = (|| {
            let mut word = c1.turn_controls(
                c1.deflection(ctx.start.2, theta_1),
                ctx.start_boundary,
                first.boundary(),
            )?;
            word.extend(ca.turn_controls(
                ca.deflection(theta_1, theta_2),
                first.boundary(),
                second.boundary(),
            )?);
            word.extend(cb.turn_controls(
                cb.deflection(theta_2, theta_3),
                second.boundary(),
                third.boundary(),
            )?);
            word.extend(c2.turn_controls(
                c2.deflection(theta_3, ctx.goal.2),
                third.boundary(),
                ctx.goal_boundary,
            )?);
            Some(word)
        })();
        if let Some(word) = word {
            out.push(word);
        }
    }
}

/// Every admissible word of the catalogue for this query, in fixed
/// family order. Selection happens at the caller.
pub fn catalogue(ctx: &WordCtx) -> Vec<Vec<Control>> {
    let mut words = Vec::new();
    let start_sides = WordCtx::side_options(ctx.start_sides);
    let goal_sides = WordCtx::side_options(ctx.goal_sides);
    let directions = ctx.direction_options();

    // T
    for (&l1, &d1) in iproduct!(&start_sides, &directions) {
        let c1 = ctx.start_circle(l1, d1);
        if ctx.goal_boundary == TurnBoundary::MaxKappa && !goal_sides.contains(&l1) {
            continue;
        }
        if let Some(word) = t_word(ctx, &c1) {
            words.push(word);
        }
    }

    for (&l1, &d1, &l2, &d2) in iproduct!(&start_sides, &directions, &goal_sides, &directions) {
        let c1 = ctx.start_circle(l1, d1);
        let c2 = ctx.goal_circle(l2, d2);

        // TT
        if l2 != l1 && d2 == d1 {
            if let Some(word) = tt_word(ctx, &c1, &c2) {
                words.push(word);
            }
        }
        // TcT
        if ctx.allow_cusps && l2 != l1 && d2 != d1 {
            if let Some(word) = tct_word(ctx, &c1, &c2) {
                words.push(word);
            }
        }
        // TST (external and internal tangents)
        if d2 == d1 {
            if let Some(word) = tst_word(ctx, &c1, &c2) {
                words.push(word);
            }
        }
        // TTT
        if l2 == l1 && d2 == d1 {
            three_turn_words(
                ctx,
                &c1,
                &c2,
                JunctionKind::Smooth,
                JunctionKind::Smooth,
                &mut words,
            );
        }
        if ctx.allow_cusps {
            // TcTcT
            if l2 == l1 && d2 == d1 {
                three_turn_words(ctx, &c1, &c2, ctx.cusp, ctx.cusp, &mut words);
            }
            // TcTT and TTcT
            if l2 == l1 && d2 != d1 {
                three_turn_words(ctx, &c1, &c2, ctx.cusp, JunctionKind::Smooth, &mut words);
                three_turn_words(ctx, &c1, &c2, JunctionKind::Smooth, ctx.cusp, &mut words);
            }
            // TcTST
            if d2 != d1 {
                if let Some(word) = tctst_word(ctx, &c1, &c2) {
                    words.push(word);
                }
            }
            // TcTSTcT
            if d2 == d1 {
                if let Some(word) = tctstct_word(ctx, &c1, &c2) {
                    words.push(word);
                }
            }
            // TTcTT
            if l2 != l1 && d2 != d1 {
                four_turn_words(ctx, &c1, &c2, false, &mut words);
            }
            // TcTTcT
            if l2 != l1 && d2 == d1 {
                four_turn_words(ctx, &c1, &c2, true, &mut words);
            }
        }
    }

    // TSTcT: mirror image of TcTST, solved on the reversed query.
    if ctx.allow_cusps {
        let rev = ctx.reversed();
        let rev_start_sides = WordCtx::side_options(rev.start_sides);
        let rev_goal_sides = WordCtx::side_options(rev.goal_sides);
        for (&l1, &d1, &l2, &d2) in iproduct!(
            &rev_start_sides,
            &directions,
            &rev_goal_sides,
            &directions
        ) {
            if d2 == d1 {
                continue;
            }
            let c1 = rev.start_circle(l1, d1);
            let c2 = rev.goal_circle(l2, d2);
            if let Some(word) = tctst_word(&rev, &c1, &c2) {
                words.push(reverse_controls(&word));
            }
        }
    }

    words
}

/// Minimum-length word; ties keep the earlier entry.
pub fn select(words: Vec<Vec<Control>>) -> Option<Vec<Control>> {
    let mut best: Option<(f64, Vec<Control>)> = None;
    for word in words {
        let length = total_length(&word);
        if !length.is_finite() {
            continue;
        }
        if best
            .as_ref()
            .map_or(true, |(b, _)| OrderedFloat(length) < OrderedFloat(*b))
        {
            best = Some((length, word));
        }
    }
    best.map(|(_, word)| word)
}

/// Minimum-length word of the catalogue for one context.
pub fn best_word(ctx: &WordCtx) -> Option<Vec<Control>> {
    select(catalogue(ctx))
}

/// Admissible steering sides for a turn pinned to ±κ_max at an endpoint
/// with supplied curvature `kappa`: an exact ±κ_max pins the side, zero
/// leaves the sign to the solver, anything else violates the contract.
pub fn pinned_sides(kappa: f64, kappa_max: f64) -> Option<(bool, bool)> {
    if (kappa - kappa_max).abs() < EPSILON {
        Some((true, false))
    } else if (kappa + kappa_max).abs() < EPSILON {
        Some((false, true))
    } else if kappa.abs() < EPSILON {
        Some((true, true))
    } else {
        None
    }
}
