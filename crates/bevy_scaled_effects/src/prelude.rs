pub use crate::ScaledEffectsPlugin;

pub use crate::asset::{
    Burst, CurveMode, EffectAsset, EffectConfig, EffectEmitterData, EmitterFlags,
    EmitterSettings, Knot, RangeCurve, ShapeSettings,
};

pub use crate::emitter::{EmissionStrategy, EmitScales, Placement, VirtualEmitter};
pub use crate::engine::{EmitParams, ParticleEngine, StartSize};
pub use crate::runtime::{
    EffectRoot, EffectRuntime, EmitterEntity, ParticleEmitter, ScaledEffect,
};
pub use crate::scheduler::{EffectScheduler, EmitRequest};
pub use crate::template::EmitterTemplate;
