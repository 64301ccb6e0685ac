//! Easing curves.
//!
//! Each curve maps linear progress `t ∈ [0, 1]` to eased progress with
//! `f(0) = 0` and `f(1) = 1`. Back curves overshoot outside that range in
//! between, which is what gives hover and intro animations their pop.

/// Easing curve applied to a tween's progress
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Ease {
    Linear,
    /// Quadratic deceleration, the default curve for fades
    #[default]
    Power1Out,
    /// Overshoots past the target then settles; the value is the overshoot strength
    BackOut(f32),
    /// Pulls back below the start before accelerating; the value is the overshoot strength
    BackIn(f32),
    /// Bounces against the target like a dropped ball
    BounceOut,
}

impl Ease {
    /// Evaluate the curve at linear progress `t` (clamped to [0, 1])
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::BackOut(s) => {
                let p = t - 1.0;
                p * p * ((s + 1.0) * p + s) + 1.0
            }
            Ease::BackIn(s) => t * t * ((s + 1.0) * t - s),
            Ease::BounceOut => bounce_out(t),
        }
    }
}

fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}
