use bevy::prelude::*;

use crate::{
    asset::EffectAsset,
    discovery::discover_emitters,
    runtime::{
        EffectRoot, EffectRuntime, EmitterEntity, EmitterQueryEngine, ParticleEmitter,
        ScaledEffect,
    },
    scheduler::EffectScheduler,
};

/// Spawns one child [`ParticleEmitter`] per emitter of each newly loaded [`ScaledEffect`].
pub fn setup_scaled_effects(
    mut commands: Commands,
    query: Query<(Entity, &ScaledEffect), Without<EffectRoot>>,
    assets: Res<Assets<EffectAsset>>,
) {
    for (effect_entity, effect) in query.iter() {
        let Some(asset) = assets.get(&effect.handle) else {
            continue;
        };

        let emitter_entities: Vec<Entity> = asset
            .emitters
            .iter()
            .map(|_| commands.spawn_empty().id())
            .collect();

        for (emitter_index, (entity, data)) in
            emitter_entities.iter().zip(&asset.emitters).enumerate()
        {
            let sub_emitters = data
                .sub_emitters
                .iter()
                .filter_map(|&index| {
                    let target = emitter_entities.get(index).copied();
                    if target.is_none() {
                        warn!(
                            "{}: emitter {emitter_index} references missing sub-emitter {index}",
                            asset.name
                        );
                    }
                    target
                })
                .collect();

            let mut particle_emitter =
                ParticleEmitter::new(data.settings.clone()).with_sub_emitters(sub_emitters);
            particle_emitter.sub_emitters_enabled = data.sub_emitters_enabled;

            commands.entity(*entity).insert((
                particle_emitter,
                EmitterEntity {
                    parent_effect: effect_entity,
                    emitter_index,
                },
                Transform::default(),
                Visibility::default(),
                ChildOf(effect_entity),
            ));
        }

        commands
            .entity(effect_entity)
            .insert(EffectRoot::new(asset.config.clone()));
    }
}

/// Builds the [`EffectRuntime`] of each [`EffectRoot`] from its hierarchy, once.
pub fn discover_effect_emitters(
    mut commands: Commands,
    roots: Query<(Entity, &EffectRoot), Without<EffectRuntime>>,
    children: Query<&Children>,
    emitters: Query<&ParticleEmitter>,
) {
    for (root, effect_root) in roots.iter() {
        let virtual_emitters = discover_emitters(root, &children, &emitters, &effect_root.config);
        let scheduler = EffectScheduler::new(virtual_emitters, effect_root.config.clone());
        commands.entity(root).insert(EffectRuntime::new(scheduler));
    }
}

/// Advances every effect by one frame and applies queued triggers.
///
/// Reads the unwrapped `f64` clock, so scheduling precision does not decay as the
/// session runs.
pub fn drive_effect_schedulers(
    time: Res<Time>,
    mut roots: Query<(&mut EffectRuntime, &mut Transform)>,
    mut emitters: Query<&'static mut ParticleEmitter>,
) {
    let now = time.elapsed_secs_f64();
    let delta_time = time.delta_secs();

    for (mut runtime, mut transform) in roots.iter_mut() {
        let mut engine = EmitterQueryEngine::new(&mut *transform, &mut emitters);
        runtime.update(now, delta_time, &mut engine);
    }
}
