use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// A single control point of a [`RangeCurve`], with `position` in normalized time `[0, 1]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Reflect)]
pub struct Knot {
    /// Normalized position along the curve.
    pub position: f32,
    /// Curve value at this position.
    pub value: f32,
}

impl Knot {
    /// Creates a knot at `position` with `value`.
    pub fn new(position: f32, value: f32) -> Self {
        Self { position, value }
    }
}

/// How a [`RangeCurve`] produces its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Reflect)]
pub enum CurveMode {
    /// A single constant, stored in [`RangeCurve::max`].
    #[default]
    Constant,
    /// A knot curve scaled by [`RangeCurve::multiplier`].
    Curve,
    /// A random value between [`RangeCurve::min`] and [`RangeCurve::max`].
    TwoConstants,
    /// A random value between two knot curves, scaled by [`RangeCurve::multiplier`].
    TwoCurves,
}

/// A stochastic range as authored on an emitter (start speed, start size, rate over time, ...).
///
/// The constant modes read `min`/`max`, the curve modes read `curve`/`curve_min`
/// scaled by `multiplier`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Reflect)]
pub struct RangeCurve {
    /// Which fields drive the value.
    #[serde(default)]
    pub mode: CurveMode,
    /// Lower constant bound.
    #[serde(default)]
    pub min: f32,
    /// Upper constant bound, also the value of [`CurveMode::Constant`].
    #[serde(default)]
    pub max: f32,
    /// Multiplier applied to sampled curve values.
    #[serde(default = "default_multiplier")]
    pub multiplier: f32,
    /// Upper (or only) curve.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub curve: Vec<Knot>,
    /// Lower curve, only read by [`CurveMode::TwoCurves`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub curve_min: Vec<Knot>,
}

fn default_multiplier() -> f32 {
    1.0
}

impl Default for RangeCurve {
    fn default() -> Self {
        Self::constant(0.0)
    }
}

impl RangeCurve {
    /// A [`CurveMode::Constant`] curve.
    pub fn constant(value: f32) -> Self {
        Self {
            mode: CurveMode::Constant,
            min: value,
            max: value,
            multiplier: 1.0,
            curve: Vec::new(),
            curve_min: Vec::new(),
        }
    }

    /// A [`CurveMode::TwoConstants`] curve.
    pub fn between(min: f32, max: f32) -> Self {
        Self {
            mode: CurveMode::TwoConstants,
            min,
            max,
            ..Self::constant(0.0)
        }
    }

    /// A [`CurveMode::Curve`] curve.
    pub fn from_knots(knots: Vec<Knot>, multiplier: f32) -> Self {
        Self {
            mode: CurveMode::Curve,
            multiplier,
            curve: knots,
            ..Self::constant(0.0)
        }
    }

    /// Returns the constant value of a [`CurveMode::Constant`] curve.
    pub fn constant_value(&self) -> f32 {
        self.max
    }

    /// Evaluates the curve at normalized time `t`.
    ///
    /// Two-value modes evaluate to the midpoint of their range. Non-finite `t` evaluates to `0`.
    pub fn evaluate(&self, t: f32) -> f32 {
        if !t.is_finite() {
            return 0.0;
        }
        match self.mode {
            CurveMode::Constant => self.max,
            CurveMode::TwoConstants => (self.min + self.max) * 0.5,
            CurveMode::Curve => sample_knots(&self.curve, t) * self.multiplier,
            CurveMode::TwoCurves => {
                let low = sample_knots(&self.curve_min, t);
                let high = sample_knots(&self.curve, t);
                (low + high) * 0.5 * self.multiplier
            }
        }
    }

    /// Returns a copy scaled by `factor`.
    ///
    /// `min` and `max` are multiplied, while `multiplier` is replaced by `factor`, so
    /// scaling twice keeps only the last factor for curve modes.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            min: self.min * factor,
            max: self.max * factor,
            multiplier: factor,
            ..self.clone()
        }
    }
}

/// Free-function form of [`RangeCurve::scaled`].
pub fn scale_curve(curve: &RangeCurve, factor: f32) -> RangeCurve {
    curve.scaled(factor)
}

fn sample_knots(knots: &[Knot], t: f32) -> f32 {
    let Some(first) = knots.first() else {
        return 0.0;
    };
    if knots.len() == 1 {
        return first.value;
    }

    let t = t.clamp(0.0, 1.0);

    let mut left = first;
    let mut right = &knots[knots.len() - 1];
    for knot in knots {
        if knot.position <= t {
            left = knot;
        }
    }
    for knot in knots {
        if knot.position >= t {
            right = knot;
            break;
        }
    }

    let range = right.position - left.position;
    if range <= 0.0 {
        return left.value;
    }

    let local_t = (t - left.position) / range;
    left.value + (right.value - left.value) * local_t
}
