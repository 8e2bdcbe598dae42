use bevy::prelude::*;

use crate::asset::{Burst, CurveMode, EmitterSettings, RangeCurve};

/// Immutable snapshot of an emitter's authored timing, shape and size parameters.
///
/// Captured once at discovery. Scaling never mutates a template; it produces new
/// values from it.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitterTemplate {
    /// Length of one emission cycle, in seconds.
    pub duration: f32,
    /// Authored start delay, in seconds.
    pub start_delay: f32,
    /// Particle lifetime range.
    pub start_lifetime: RangeCurve,
    /// Particle speed range.
    pub start_speed: RangeCurve,
    /// Particle size ranges along X, Y and Z.
    pub start_size: [RangeCurve; 3],
    /// Continuous emission rate.
    pub rate_over_time: RangeCurve,
    /// Bursts, in authoring order.
    pub bursts: Vec<Burst>,
    /// Emission shape offset.
    pub shape_position: Vec3,
    /// Emission shape scale.
    pub shape_scale: Vec3,
    emission_window: f32,
}

impl EmitterTemplate {
    /// Captures `settings`, deriving the emission window.
    pub fn capture(settings: &EmitterSettings) -> Self {
        Self {
            duration: settings.duration,
            start_delay: settings.start_delay,
            start_lifetime: settings.start_lifetime.clone(),
            start_speed: settings.start_speed.clone(),
            start_size: [
                settings.start_size_x.clone(),
                settings.start_size_y.clone(),
                settings.start_size_z.clone(),
            ],
            rate_over_time: settings.rate_over_time.clone(),
            bursts: settings.bursts.clone(),
            shape_position: settings.shape.position,
            shape_scale: settings.shape.scale,
            emission_window: emission_window(
                settings.duration,
                &settings.rate_over_time,
                &settings.bursts,
            ),
        }
    }

    /// Unscaled time span over which this emitter produces particles.
    pub fn emission_window(&self) -> f32 {
        self.emission_window
    }

    /// Whether the continuous rate keeps the emitter busy for its whole duration.
    pub fn emits_full_duration(&self) -> bool {
        is_full_duration(&self.rate_over_time)
    }
}

impl From<&EmitterSettings> for EmitterTemplate {
    fn from(settings: &EmitterSettings) -> Self {
        Self::capture(settings)
    }
}

fn is_full_duration(rate_over_time: &RangeCurve) -> bool {
    match rate_over_time.mode {
        CurveMode::Constant => rate_over_time.constant_value() > 0.0,
        CurveMode::Curve => true,
        CurveMode::TwoConstants | CurveMode::TwoCurves => false,
    }
}

/// Full `duration` for a continuously emitting rate, otherwise the latest burst time (at least `0`).
pub fn emission_window(duration: f32, rate_over_time: &RangeCurve, bursts: &[Burst]) -> f32 {
    if is_full_duration(rate_over_time) {
        return duration;
    }
    bursts.iter().fold(0.0, |window, burst| window.max(burst.time))
}
