use super::helpers::*;

use bevy::prelude::*;
use bevy_scaled_effects::prelude::*;

fn emitters_by_index(app: &mut App, effect: Entity) -> Vec<(usize, Entity)> {
    let mut emitters: Vec<(usize, Entity)> = app
        .world_mut()
        .query::<(Entity, &EmitterEntity)>()
        .iter(app.world())
        .filter(|(_, link)| link.parent_effect == effect)
        .map(|(entity, link)| (link.emitter_index, entity))
        .collect();
    emitters.sort_by_key(|(index, _)| *index);
    emitters
}

#[test]
fn spawns_one_child_per_emitter() {
    let (mut app, _, effect) = setup_loaded_effect("explosion.ron");

    let emitters = emitters_by_index(&mut app, effect);
    assert_eq!(emitters.len(), 3);

    let children = app
        .world()
        .get::<Children>(effect)
        .expect("effect should have children");
    assert_eq!(children.len(), 3);

    for (index, entity) in &emitters {
        let emitter = app.world().get::<ParticleEmitter>(*entity).unwrap();
        assert_eq!(emitter.pending, 0, "emitter {index} should be idle");
        assert!(app.world().get::<Transform>(*entity).is_some());
    }
}

#[test]
fn root_gets_effect_root_and_runtime() {
    let (app, _, effect) = setup_loaded_effect("explosion.ron");

    let root = app.world().get::<EffectRoot>(effect).expect("root marker");
    assert_eq!(root.config, EffectConfig::default());
    assert!(app.world().get::<Transform>(effect).is_some());

    let runtime = app.world().get::<EffectRuntime>(effect).expect("runtime");
    assert!(runtime.scheduler().is_idle());
}

#[test]
fn sub_emitter_indices_resolve_to_entities() {
    let (mut app, _, effect) = setup_loaded_effect("explosion.ron");
    let emitters = emitters_by_index(&mut app, effect);

    let sparks = app.world().get::<ParticleEmitter>(emitters[1].1).unwrap();
    assert_eq!(sparks.sub_emitters, vec![emitters[2].1]);
    assert!(sparks.sub_emitters_enabled);
}

#[test]
fn driven_sub_emitters_are_not_scheduled() {
    let (mut app, _, effect) = setup_loaded_effect("explosion.ron");
    let emitters = emitters_by_index(&mut app, effect);

    let runtime = app.world().get::<EffectRuntime>(effect).unwrap();
    let handles: Vec<Entity> = runtime
        .scheduler()
        .emitters()
        .iter()
        .map(|emitter| emitter.handle())
        .collect();
    assert_eq!(handles, vec![emitters[0].1, emitters[1].1]);
}

#[test]
fn effect_is_set_up_once() {
    let (mut app, _, effect) = setup_loaded_effect("explosion.ron");
    advance_frames(&mut app, 5);
    assert_eq!(emitters_by_index(&mut app, effect).len(), 3);
}

#[test]
fn effect_waits_for_its_asset() {
    let mut app = create_minimal_app();
    let effect = spawn_scaled_effect(&mut app, Handle::default());
    advance_frames(&mut app, 3);

    assert!(app.world().get::<EffectRoot>(effect).is_none());
    assert!(app.world().get::<EffectRuntime>(effect).is_none());
}
