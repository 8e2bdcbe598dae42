use bevy::prelude::*;

use crate::asset::RangeCurve;

/// Scaled start size along each axis.
#[derive(Debug, Clone, PartialEq)]
pub struct StartSize {
    /// Size along X.
    pub x: RangeCurve,
    /// Size along Y.
    pub y: RangeCurve,
    /// Size along Z.
    pub z: RangeCurve,
}

/// Parameters written to an emitter right before it spawns.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitParams {
    /// Velocity inherited by spawned particles.
    pub velocity: Vec3,
    /// Lifetime-scaled start lifetime.
    pub start_lifetime: RangeCurve,
    /// Size-scaled start speed.
    pub start_speed: RangeCurve,
    /// Size-scaled start size, or `None` to keep the authored size.
    pub start_size: Option<StartSize>,
    /// Size-scaled shape offset.
    pub shape_position: Vec3,
    /// Size-scaled shape scale.
    pub shape_scale: Vec3,
}

/// The continuous particle engine that actually simulates particles.
///
/// The scheduler only decides how many particles to spawn and with which scaled
/// parameters; everything downstream of [`emit`](Self::emit) belongs to the engine.
pub trait ParticleEngine {
    /// Identifies one underlying emitter.
    type Handle: Copy;

    /// Places the effect root before an emission.
    fn set_root_transform(&mut self, position: Vec3, rotation: Quat);

    /// Writes `params` to `emitter` and spawns `count` particles with them.
    fn emit(&mut self, emitter: Self::Handle, params: &EmitParams, count: u32);
}
