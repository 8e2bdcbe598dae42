//! **Scaled effects** drive multi-emitter particle effects at any size, duration and
//! lifetime, reproducing the bursts and continuous rate each emitter was authored with.
//!
//! An effect is one or more emitters under a root entity. Triggering it with
//! [`EmitRequest`] schedules one instance per emitter; every frame the scheduler
//! works out how many particles each running instance owes and hands the count,
//! together with scaled start parameters, to the particle engine.
//!
//! # Getting started
//!
//! Add [`ScaledEffectsPlugin`] to your app:
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_scaled_effects::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins((DefaultPlugins, ScaledEffectsPlugin))
//!         .run();
//! }
//! ```
//!
//! Spawn an effect from a RON file, then trigger it once its runtime exists:
//!
//! ```
//! use bevy::prelude::*;
//! use bevy_scaled_effects::prelude::*;
//!
//! fn setup(mut commands: Commands, asset_server: Res<AssetServer>) {
//!     commands.spawn(ScaledEffect {
//!         handle: asset_server.load("explosion.ron"),
//!     });
//! }
//!
//! fn explode(mut effects: Query<&mut EffectRuntime>) {
//!     for mut effect in effects.iter_mut() {
//!         effect.trigger(EmitRequest::at(Vec3::new(0.0, 1.0, 0.0)).with_size(2.0));
//!     }
//! }
//! ```
//!
//! Hierarchies built in code work the same way: put [`EffectRoot`] on the root and
//! [`ParticleEmitter`] on the root or any descendant.
//!
//! # Emission
//!
//! - [`EmitterTemplate`] captures an emitter once and derives its emission window.
//! - [`accumulate`](accumulator::accumulate) turns a time window into a particle count,
//!   carrying the fractional remainder between frames.
//! - [`VirtualEmitter`] applies trigger scales with an [`EmissionStrategy`]: emitters
//!   tagged [`EmitterFlags::EMIT_MORE`] grow in particle count instead of particle size.
//! - [`EffectScheduler`] owns the instances and advances them with explicit `now`/`delta_time`.
//!
//! Anything that can spawn particles can sit behind [`ParticleEngine`]; the ECS
//! adapter accumulates counts on [`ParticleEmitter::pending`].

/// Emission step arithmetic: burst windows, continuous rate and fraction carry.
pub mod accumulator;
/// Effect asset definitions, authored emitter data and the RON loader.
pub mod asset;
/// Emitter discovery under an effect root.
pub mod discovery;
/// Virtual emitters and their scaling strategies.
pub mod emitter;
/// The boundary to the particle engine.
pub mod engine;
/// Convenience re-exports.
pub mod prelude;
/// ECS components and the ECS engine adapter.
pub mod runtime;
/// Effect scheduling and ticking.
pub mod scheduler;
/// Systems that spawn, discover and drive effects.
pub mod spawning;
/// Captured emitter templates.
pub mod template;

use bevy::prelude::*;

use asset::{EffectAsset, EffectAssetLoader};
use spawning::{discover_effect_emitters, drive_effect_schedulers, setup_scaled_effects};

/// Plugin that registers the effect asset and drives effect schedulers every frame.
pub struct ScaledEffectsPlugin;

impl Plugin for ScaledEffectsPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<EffectAsset>()
            .init_asset_loader::<EffectAssetLoader>();

        app.add_systems(
            Update,
            (
                setup_scaled_effects,
                discover_effect_emitters,
                drive_effect_schedulers,
            )
                .chain(),
        );
    }
}

pub use accumulator::{Accumulation, EmissionWindow};
pub use asset::{
    Burst, CurveMode, EffectConfig, EffectEmitterData, EmitterFlags, EmitterSettings, Knot,
    RangeCurve, ShapeSettings,
};
pub use emitter::{EmissionStrategy, EmitScales, Placement, VirtualEmitter};
pub use engine::{EmitParams, ParticleEngine, StartSize};
pub use runtime::{
    EffectRoot, EffectRuntime, EmitterEntity, EmitterQueryEngine, ParticleEmitter, ScaledEffect,
};
pub use scheduler::{EffectScheduler, EmitRequest, ScheduledInstance};
pub use template::EmitterTemplate;
