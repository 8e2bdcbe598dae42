use bevy::prelude::*;
use bevy_scaled_effects::asset::*;
use bevy_scaled_effects::emitter::*;

use crate::helpers::*;

fn emit_once(emitter: &VirtualEmitter<usize>, scales: EmitScales) -> RecordingEngine {
    let mut engine = RecordingEngine::default();
    emitter.emit(&mut engine, &Placement::default(), scales, 0.0, 0.0, 0.0, true);
    engine
}

fn sized(size: f32) -> EmitScales {
    EmitScales {
        size,
        ..default()
    }
}

#[test]
fn strategy_follows_flags() {
    assert_eq!(
        EmissionStrategy::from_flags(EmitterFlags::empty()),
        EmissionStrategy::Standard
    );
    assert_eq!(
        EmissionStrategy::from_flags(EmitterFlags::EMIT_MORE),
        EmissionStrategy::EmitMore
    );
}

#[test]
fn strategies_route_size_differently() {
    assert_eq!(EmissionStrategy::Standard.route(3.0), (1.0, Some(3.0)));
    assert_eq!(EmissionStrategy::EmitMore.route(3.0), (3.0, None));
}

#[test]
fn standard_scales_particle_size_not_amount() {
    let emitter = VirtualEmitter::from_settings(0, &burst_settings(1.0, &[(0.0, 5)]));
    let engine = emit_once(&emitter, sized(2.0));

    let call = engine.last();
    assert_eq!(call.count, 5);
    let size = call.params.start_size.as_ref().expect("standard emitters override size");
    assert_eq!(size.x.evaluate(0.0), 2.0);
    assert_eq!(size.y.evaluate(0.0), 2.0);
    assert_eq!(size.z.evaluate(0.0), 2.0);
}

#[test]
fn emit_more_scales_amount_not_particle_size() {
    let settings = EmitterSettings {
        flags: EmitterFlags::EMIT_MORE,
        ..burst_settings(1.0, &[(0.0, 5)])
    };
    let emitter = VirtualEmitter::from_settings(0, &settings);
    assert_eq!(emitter.strategy(), EmissionStrategy::EmitMore);

    let engine = emit_once(&emitter, sized(2.0));
    let call = engine.last();
    assert_eq!(call.count, 10);
    assert!(call.params.start_size.is_none());
}

#[test]
fn both_strategies_scale_speed_and_shape() {
    let base = EmitterSettings {
        shape: ShapeSettings {
            position: Vec3::new(0.0, 1.0, 0.0),
            scale: Vec3::new(1.0, 2.0, 1.0),
        },
        ..burst_settings(1.0, &[(0.0, 1)])
    };
    let emit_more = EmitterSettings {
        flags: EmitterFlags::EMIT_MORE,
        ..base.clone()
    };

    for settings in [base, emit_more] {
        let emitter = VirtualEmitter::from_settings(0, &settings);
        let params = emitter.params(Vec3::ZERO, sized(3.0));
        assert_eq!(params.start_speed.evaluate(0.0), 15.0);
        assert_eq!(params.shape_position, Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(params.shape_scale, Vec3::new(3.0, 6.0, 3.0));
    }
}

#[test]
fn lifetime_scale_only_touches_lifetime() {
    let emitter = VirtualEmitter::from_settings(0, &burst_settings(1.0, &[(0.0, 1)]));
    let params = emitter.params(
        Vec3::ZERO,
        EmitScales {
            lifetime: 2.0,
            ..default()
        },
    );
    assert_eq!(params.start_lifetime.evaluate(0.0), 10.0);
    assert_eq!(params.start_speed.evaluate(0.0), 5.0);
}

#[test]
fn emit_moves_root_and_passes_velocity() {
    let emitter = VirtualEmitter::from_settings(7, &burst_settings(1.0, &[(0.0, 1)]));
    let placement = Placement {
        position: Vec3::new(1.0, 2.0, 3.0),
        rotation: Quat::from_rotation_y(1.0),
        velocity: Vec3::new(0.0, 0.0, 4.0),
    };
    let mut engine = RecordingEngine::default();
    emitter.emit(&mut engine, &placement, EmitScales::default(), 0.0, 0.0, 0.0, true);

    assert_eq!(
        engine.root_transforms,
        vec![(placement.position, placement.rotation)]
    );
    assert_eq!(engine.last().emitter, 7);
    assert_eq!(engine.last().params.velocity, placement.velocity);
}

#[test]
fn empty_batches_reach_engine_by_default() {
    let emitter = VirtualEmitter::from_settings(0, &burst_settings(1.0, &[(0.9, 1)]));
    let mut engine = RecordingEngine::default();
    emitter.emit(&mut engine, &Placement::default(), EmitScales::default(), 0.5, 0.25, 0.0, false);
    assert_eq!(engine.calls.len(), 1);
    assert_eq!(engine.last().count, 0);
}

#[test]
fn empty_batches_can_be_skipped() {
    let emitter = VirtualEmitter::from_settings(0, &burst_settings(1.0, &[(0.9, 1)]))
        .with_empty_batches(false);
    let mut engine = RecordingEngine::default();
    emitter.emit(&mut engine, &Placement::default(), EmitScales::default(), 0.5, 0.25, 0.0, false);
    assert!(engine.calls.is_empty());
    assert_eq!(engine.root_transforms.len(), 1);
}

#[test]
fn emit_returns_carried_fraction() {
    let emitter = VirtualEmitter::from_settings(0, &rate_settings(10.0, 3.0));
    let mut engine = RecordingEngine::default();
    let fraction =
        emitter.emit(&mut engine, &Placement::default(), EmitScales::default(), 1.0, 0.25, 0.5, false);
    assert_eq!(engine.last().count, 1);
    assert!(approx_eq(fraction, 0.25));
}

#[test]
fn start_delay_ignores_duration_scale() {
    let settings = EmitterSettings {
        start_delay: 0.3,
        ..burst_settings(1.0, &[(0.5, 1)])
    };
    let emitter = VirtualEmitter::from_settings(0, &settings);
    assert_eq!(emitter.start_delay(4.0), 0.3);
}

#[test]
fn emission_duration_stretches_with_duration_scale() {
    let emitter = VirtualEmitter::from_settings(0, &burst_settings(1.0, &[(0.5, 1)]));
    assert_eq!(emitter.emission_duration(1.0), 0.5);
    assert_eq!(emitter.emission_duration(3.0), 1.5);

    let continuous = VirtualEmitter::from_settings(0, &rate_settings(2.0, 4.0));
    assert_eq!(continuous.emission_duration(0.5), 1.0);
}
