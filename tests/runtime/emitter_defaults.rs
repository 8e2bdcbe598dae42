use bevy::prelude::*;
use bevy_scaled_effects::asset::*;

#[test]
fn emitter_settings_default_timing() {
    let settings = EmitterSettings::default();
    assert_eq!(settings.name, "Emitter");
    assert_eq!(settings.duration, 5.0);
    assert_eq!(settings.start_delay, 0.0);
    assert_eq!(settings.start_lifetime, RangeCurve::constant(5.0));
    assert_eq!(settings.rate_over_time, RangeCurve::constant(10.0));
    assert!(settings.bursts.is_empty());
}

#[test]
fn emitter_settings_default_particle_parameters() {
    let settings = EmitterSettings::default();
    assert_eq!(settings.start_speed, RangeCurve::constant(5.0));
    assert_eq!(settings.start_size_x, RangeCurve::constant(1.0));
    assert_eq!(settings.start_size_y, RangeCurve::constant(1.0));
    assert_eq!(settings.start_size_z, RangeCurve::constant(1.0));
    assert!(settings.flags.is_empty());
}

#[test]
fn shape_settings_default() {
    let shape = ShapeSettings::default();
    assert_eq!(shape.position, Vec3::ZERO);
    assert_eq!(shape.scale, Vec3::ONE);
}

#[test]
fn range_curve_default_is_zero_constant() {
    let curve = RangeCurve::default();
    assert_eq!(curve.mode, CurveMode::Constant);
    assert_eq!(curve.evaluate(0.5), 0.0);
    assert_eq!(curve.multiplier, 1.0);
}

#[test]
fn effect_config_default() {
    let config = EffectConfig::default();
    assert_eq!(config.default_size, 1.0);
    assert_eq!(config.default_duration, 1.0);
    assert_eq!(config.default_lifetime, 1.0);
    assert!(config.emit_empty_batches);
}

#[test]
fn effect_emitter_data_default() {
    let data = EffectEmitterData::default();
    assert_eq!(data.settings, EmitterSettings::default());
    assert!(data.sub_emitters.is_empty());
    assert!(data.sub_emitters_enabled);
}

#[test]
fn effect_asset_new_uses_current_version() {
    let asset = EffectAsset::new("Smoke".to_string(), EffectConfig::default(), Vec::new());
    assert_eq!(asset.format_version(), FORMAT_VERSION);
    assert_eq!(asset.name, "Smoke");
}
