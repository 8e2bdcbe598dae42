mod curve;

pub use curve::{CurveMode, Knot, RangeCurve, scale_curve};

use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    prelude::*,
};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format version written by [`EffectAsset::new`] and the only one [`EffectAssetLoader`] reads.
pub const FORMAT_VERSION: &str = "1.0";

/// Reads [`EffectAsset`]s from `.ron` files.
#[derive(Default, TypePath)]
pub struct EffectAssetLoader;

/// Why an effect file could not be loaded.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EffectAssetLoaderError {
    /// The file could not be read.
    #[error("failed to read effect file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not a valid effect in RON.
    #[error("invalid effect RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
    /// The file declares a format version this release does not read.
    #[error("unsupported effect format_version \"{found}\", expected \"{expected}\"")]
    UnknownVersion {
        /// The declared version.
        found: String,
        /// [`FORMAT_VERSION`].
        expected: &'static str,
    },
}

impl AssetLoader for EffectAssetLoader {
    type Asset = EffectAsset;
    type Settings = ();
    type Error = EffectAssetLoaderError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &(),
        load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let asset = ron::de::from_bytes::<EffectAsset>(&bytes)?;

        if asset.format_version != FORMAT_VERSION {
            return Err(EffectAssetLoaderError::UnknownVersion {
                found: asset.format_version,
                expected: FORMAT_VERSION,
            });
        }

        debug!(
            "{:?}: loaded effect \"{}\" with {} emitters",
            load_context.path(),
            asset.name,
            asset.emitters.len()
        );
        Ok(asset)
    }

    fn extensions(&self) -> &[&str] {
        &["ron"]
    }
}

bitflags! {
    /// Tags attached to an authored emitter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct EmitterFlags: u32 {
        /// Size requests scale the number of particles instead of their size.
        const EMIT_MORE = 1 << 0;
    }
}

/// A single burst: `count` particles at `time` seconds into the emission.
///
/// Only constant-count, single-cycle bursts that always fire are supported.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Reflect)]
pub struct Burst {
    /// Time of the burst in seconds, relative to the end of the start delay.
    pub time: f32,
    /// Number of particles.
    pub count: u32,
}

impl Burst {
    /// Creates a burst of `count` particles at `time`.
    pub fn new(time: f32, count: u32) -> Self {
        Self { time, count }
    }
}

/// Emission shape placement, both scaled by size requests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Reflect)]
pub struct ShapeSettings {
    /// Offset of the shape relative to the emitter, in meters.
    #[serde(default)]
    pub position: Vec3,
    /// Scale of the shape.
    #[serde(default = "default_shape_scale")]
    pub scale: Vec3,
}

fn default_shape_scale() -> Vec3 {
    Vec3::ONE
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

/// Authored parameters of one underlying emitter.
///
/// This is everything the scheduler reads from an emitter, once, when the effect
/// is discovered. Times are in seconds, sizes in meters, speeds in meters per second.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Reflect)]
pub struct EmitterSettings {
    /// Display name for this emitter.
    #[serde(default)]
    pub name: String,
    /// Length of one emission cycle.
    ///
    /// Defaults to `5.0`.
    #[serde(default = "default_duration")]
    pub duration: f32,
    /// Time to wait before emitting.
    #[serde(default)]
    pub start_delay: f32,
    /// Lifetime of each spawned particle.
    #[serde(default = "default_start_lifetime")]
    pub start_lifetime: RangeCurve,
    /// Initial speed of each spawned particle.
    #[serde(default = "default_start_speed")]
    pub start_speed: RangeCurve,
    /// Initial size along X.
    #[serde(default = "default_start_size")]
    pub start_size_x: RangeCurve,
    /// Initial size along Y.
    #[serde(default = "default_start_size")]
    pub start_size_y: RangeCurve,
    /// Initial size along Z.
    #[serde(default = "default_start_size")]
    pub start_size_z: RangeCurve,
    /// Continuous emission rate in particles per second, over normalized cycle time.
    ///
    /// Defaults to a constant `10.0`.
    #[serde(default = "default_rate_over_time")]
    pub rate_over_time: RangeCurve,
    /// Bursts, in authoring order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bursts: Vec<Burst>,
    /// Emission shape placement.
    #[serde(default)]
    pub shape: ShapeSettings,
    /// Behaviour tags.
    #[serde(default)]
    #[reflect(ignore)]
    pub flags: EmitterFlags,
}

fn default_duration() -> f32 {
    5.0
}

fn default_start_lifetime() -> RangeCurve {
    RangeCurve::constant(5.0)
}

fn default_start_speed() -> RangeCurve {
    RangeCurve::constant(5.0)
}

fn default_start_size() -> RangeCurve {
    RangeCurve::constant(1.0)
}

fn default_rate_over_time() -> RangeCurve {
    RangeCurve::constant(10.0)
}

impl Default for EmitterSettings {
    fn default() -> Self {
        Self {
            name: "Emitter".to_string(),
            duration: default_duration(),
            start_delay: 0.0,
            start_lifetime: default_start_lifetime(),
            start_speed: default_start_speed(),
            start_size_x: default_start_size(),
            start_size_y: default_start_size(),
            start_size_z: default_start_size(),
            rate_over_time: default_rate_over_time(),
            bursts: Vec::new(),
            shape: ShapeSettings::default(),
            flags: EmitterFlags::empty(),
        }
    }
}

/// Defaults that trigger parameters are normalized against, and emission policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Reflect)]
pub struct EffectConfig {
    /// Size that maps to a size scale of `1.0`.
    #[serde(default = "default_one")]
    pub default_size: f32,
    /// Duration that maps to a duration scale of `1.0`.
    #[serde(default = "default_one")]
    pub default_duration: f32,
    /// Lifetime that maps to a lifetime scale of `1.0`.
    #[serde(default = "default_one")]
    pub default_lifetime: f32,
    /// If `true`, ticks that spawn nothing still reach the engine with a count of `0`.
    ///
    /// Defaults to `true`.
    #[serde(default = "default_true")]
    pub emit_empty_batches: bool,
}

fn default_one() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            default_size: 1.0,
            default_duration: 1.0,
            default_lifetime: 1.0,
            emit_empty_batches: true,
        }
    }
}

/// One emitter entry of an [`EffectAsset`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Reflect)]
pub struct EffectEmitterData {
    /// Authored emitter parameters.
    #[serde(default)]
    pub settings: EmitterSettings,
    /// Indices of emitters in the same effect that this emitter drives as sub-emitters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_emitters: Vec<usize>,
    /// Whether the sub-emitter references are active.
    #[serde(default = "default_true")]
    pub sub_emitters_enabled: bool,
}

impl Default for EffectEmitterData {
    fn default() -> Self {
        Self {
            settings: EmitterSettings::default(),
            sub_emitters: Vec::new(),
            sub_emitters_enabled: true,
        }
    }
}

impl From<EmitterSettings> for EffectEmitterData {
    fn from(settings: EmitterSettings) -> Self {
        Self {
            settings,
            ..default()
        }
    }
}

/// A multi-emitter effect, loadable from RON.
#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize)]
pub struct EffectAsset {
    format_version: String,
    /// Display name for this effect.
    pub name: String,
    /// Trigger defaults and emission policy.
    #[serde(default)]
    pub config: EffectConfig,
    /// Emitters, in discovery order.
    pub emitters: Vec<EffectEmitterData>,
}

impl EffectAsset {
    /// Creates an effect on the current format version.
    pub fn new(name: String, config: EffectConfig, emitters: Vec<EffectEmitterData>) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            name,
            config,
            emitters,
        }
    }

    /// The format version this asset was written with.
    pub fn format_version(&self) -> &str {
        &self.format_version
    }
}
