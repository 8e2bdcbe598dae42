use bevy::prelude::*;

use crate::{
    asset::{EffectAsset, EffectConfig, EmitterSettings},
    engine::{EmitParams, ParticleEngine},
    scheduler::{EffectScheduler, EmitRequest},
};

/// Spawns the emitters of an [`EffectAsset`] under this entity.
#[derive(Component)]
pub struct ScaledEffect {
    /// The effect to spawn.
    pub handle: Handle<EffectAsset>,
}

/// Marks the root of an effect whose emitters are discovered from its hierarchy.
///
/// The root's [`Transform`] is moved to the trigger position before every emission.
#[derive(Component, Debug, Clone, Default)]
#[require(Transform, Visibility)]
pub struct EffectRoot {
    /// Trigger defaults and emission policy.
    pub config: EffectConfig,
}

impl EffectRoot {
    /// A root using `config`.
    pub fn new(config: EffectConfig) -> Self {
        Self { config }
    }
}

/// Scheduler state of a discovered effect root.
#[derive(Component)]
pub struct EffectRuntime {
    scheduler: EffectScheduler<Entity>,
    triggers: Vec<EmitRequest>,
}

impl EffectRuntime {
    /// Wraps a scheduler built by discovery.
    pub fn new(scheduler: EffectScheduler<Entity>) -> Self {
        Self {
            scheduler,
            triggers: Vec::new(),
        }
    }

    /// Queues a trigger, applied on the next update after active instances advance.
    pub fn trigger(&mut self, request: EmitRequest) {
        self.triggers.push(request);
    }

    /// Triggers not yet applied.
    pub fn queued_triggers(&self) -> &[EmitRequest] {
        &self.triggers
    }

    /// The scheduler.
    pub fn scheduler(&self) -> &EffectScheduler<Entity> {
        &self.scheduler
    }

    /// Advances active instances, then applies queued triggers at the same `now`.
    pub fn update<E>(&mut self, now: f64, delta_time: f32, engine: &mut E)
    where
        E: ParticleEngine<Handle = Entity>,
    {
        self.scheduler.tick(now, delta_time, engine);
        for request in self.triggers.drain(..) {
            self.scheduler.emit(&request, now, engine);
        }
    }
}

/// Links an emitter spawned from an [`EffectAsset`] back to its effect.
#[derive(Component, Debug, Clone, Copy)]
pub struct EmitterEntity {
    /// The entity holding the [`ScaledEffect`].
    pub parent_effect: Entity,
    /// Index of the emitter in the asset.
    pub emitter_index: usize,
}

/// Engine-side state of one underlying emitter.
///
/// `settings` is what discovery reads. `params`, `pending` and `spawn_calls` are
/// written by the scheduler and consumed by whatever simulates the particles.
#[derive(Component, Debug, Clone)]
pub struct ParticleEmitter {
    /// Authored parameters.
    pub settings: EmitterSettings,
    /// Emitters driven by this one's particles.
    pub sub_emitters: Vec<Entity>,
    /// Whether `sub_emitters` is active.
    pub sub_emitters_enabled: bool,
    /// Parameters written before the latest spawn.
    pub params: Option<EmitParams>,
    /// Particles requested but not yet taken. Saturates at `u32::MAX` if never taken.
    pub pending: u32,
    /// Number of spawn calls received.
    pub spawn_calls: u32,
}

impl ParticleEmitter {
    /// An emitter with `settings` and no sub-emitters.
    pub fn new(settings: EmitterSettings) -> Self {
        Self {
            settings,
            sub_emitters: Vec::new(),
            sub_emitters_enabled: true,
            params: None,
            pending: 0,
            spawn_calls: 0,
        }
    }

    /// Adds sub-emitter references.
    pub fn with_sub_emitters(mut self, sub_emitters: Vec<Entity>) -> Self {
        self.sub_emitters = sub_emitters;
        self
    }

    /// Returns and clears the pending particle count.
    pub fn take_pending(&mut self) -> u32 {
        std::mem::take(&mut self.pending)
    }
}

/// [`ParticleEngine`] over the ECS: the effect root's [`Transform`] and its
/// [`ParticleEmitter`] entities.
pub struct EmitterQueryEngine<'a, 'w, 's> {
    root: &'a mut Transform,
    emitters: &'a mut Query<'w, 's, &'static mut ParticleEmitter>,
}

impl<'a, 'w, 's> EmitterQueryEngine<'a, 'w, 's> {
    /// Wraps the root transform and emitter query.
    pub fn new(
        root: &'a mut Transform,
        emitters: &'a mut Query<'w, 's, &'static mut ParticleEmitter>,
    ) -> Self {
        Self { root, emitters }
    }
}

impl ParticleEngine for EmitterQueryEngine<'_, '_, '_> {
    type Handle = Entity;

    fn set_root_transform(&mut self, position: Vec3, rotation: Quat) {
        self.root.translation = position;
        self.root.rotation = rotation;
    }

    fn emit(&mut self, emitter: Entity, params: &EmitParams, count: u32) {
        let Ok(mut particle_emitter) = self.emitters.get_mut(emitter) else {
            warn!("{emitter:?}: emitter no longer exists, dropping {count} particles");
            return;
        };
        particle_emitter.params = Some(params.clone());
        particle_emitter.pending = particle_emitter.pending.saturating_add(count);
        particle_emitter.spawn_calls = particle_emitter.spawn_calls.saturating_add(1);
    }
}
