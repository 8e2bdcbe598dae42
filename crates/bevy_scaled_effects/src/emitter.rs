use bevy::prelude::*;

use crate::{
    accumulator::{Accumulation, EmissionWindow, accumulate},
    asset::{EmitterFlags, EmitterSettings},
    engine::{EmitParams, ParticleEngine, StartSize},
    template::EmitterTemplate,
};

/// How a size request is applied to an emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmissionStrategy {
    /// Size scales particle size, speed and shape. Amount stays at `1`.
    #[default]
    Standard,
    /// Size scales the number of particles, speed and shape. Particle size stays authored.
    EmitMore,
}

impl EmissionStrategy {
    /// Picks the strategy tagged on an emitter.
    pub fn from_flags(flags: EmitterFlags) -> Self {
        if flags.contains(EmitterFlags::EMIT_MORE) {
            Self::EmitMore
        } else {
            Self::Standard
        }
    }

    /// Splits a size scale into `(amount_scale, particle_size_scale)`.
    ///
    /// `None` for the size scale leaves the authored particle size untouched.
    pub fn route(self, size_scale: f32) -> (f32, Option<f32>) {
        match self {
            Self::Standard => (1.0, Some(size_scale)),
            Self::EmitMore => (size_scale, None),
        }
    }
}

/// Where an effect is placed when it emits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Root position.
    pub position: Vec3,
    /// Root rotation.
    pub rotation: Quat,
    /// Emitter velocity inherited by particles.
    pub velocity: Vec3,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
        }
    }
}

/// Multipliers derived from a trigger, each `requested / default`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitScales {
    /// Stretches the emission window.
    pub duration: f32,
    /// Scales particle lifetime.
    pub lifetime: f32,
    /// Scales particle size, or amount for [`EmissionStrategy::EmitMore`].
    pub size: f32,
}

impl Default for EmitScales {
    fn default() -> Self {
        Self {
            duration: 1.0,
            lifetime: 1.0,
            size: 1.0,
        }
    }
}

/// One underlying emitter seen through its captured template.
#[derive(Debug, Clone)]
pub struct VirtualEmitter<H> {
    handle: H,
    template: EmitterTemplate,
    strategy: EmissionStrategy,
    emit_empty_batches: bool,
}

impl<H: Copy> VirtualEmitter<H> {
    /// Creates a virtual emitter for `handle`.
    pub fn new(handle: H, template: EmitterTemplate, strategy: EmissionStrategy) -> Self {
        Self {
            handle,
            template,
            strategy,
            emit_empty_batches: true,
        }
    }

    /// Captures `settings` and picks the strategy from its flags.
    pub fn from_settings(handle: H, settings: &EmitterSettings) -> Self {
        Self::new(
            handle,
            EmitterTemplate::capture(settings),
            EmissionStrategy::from_flags(settings.flags),
        )
    }

    /// Sets whether zero-count steps still reach the engine.
    pub fn with_empty_batches(mut self, emit_empty_batches: bool) -> Self {
        self.emit_empty_batches = emit_empty_batches;
        self
    }

    /// The engine handle of the underlying emitter.
    pub fn handle(&self) -> H {
        self.handle
    }

    /// The captured template.
    pub fn template(&self) -> &EmitterTemplate {
        &self.template
    }

    /// The strategy chosen at construction.
    pub fn strategy(&self) -> EmissionStrategy {
        self.strategy
    }

    /// Authored start delay. Not stretched by `duration_scale`.
    pub fn start_delay(&self, _duration_scale: f32) -> f32 {
        self.template.start_delay
    }

    /// Emission window stretched by `duration_scale`.
    pub fn emission_duration(&self, duration_scale: f32) -> f32 {
        self.template.emission_window() * duration_scale
    }

    /// Builds the scaled parameters for one emission.
    pub fn params(&self, velocity: Vec3, scales: EmitScales) -> EmitParams {
        let (_, size_scale) = self.strategy.route(scales.size);
        let template = &self.template;
        EmitParams {
            velocity,
            start_lifetime: template.start_lifetime.scaled(scales.lifetime),
            start_speed: template.start_speed.scaled(scales.size),
            start_size: size_scale.map(|scale| StartSize {
                x: template.start_size[0].scaled(scale),
                y: template.start_size[1].scaled(scale),
                z: template.start_size[2].scaled(scale),
            }),
            shape_position: template.shape_position * scales.size,
            shape_scale: template.shape_scale * scales.size,
        }
    }

    /// Emits the particles due in the step ending at local `time`, returning the new fraction.
    ///
    /// `first_step` counts a burst sitting exactly on the window start.
    pub fn emit<E>(
        &self,
        engine: &mut E,
        placement: &Placement,
        scales: EmitScales,
        time: f32,
        delta_time: f32,
        fraction: f32,
        first_step: bool,
    ) -> f32
    where
        E: ParticleEngine<Handle = H>,
    {
        let window = EmissionWindow::new(time, delta_time, first_step);
        self.emit_window(engine, placement, scales, &window, fraction)
    }

    /// Emits the particles due in `window`, returning the new fraction.
    pub fn emit_window<E>(
        &self,
        engine: &mut E,
        placement: &Placement,
        scales: EmitScales,
        window: &EmissionWindow,
        fraction: f32,
    ) -> f32
    where
        E: ParticleEngine<Handle = H>,
    {
        engine.set_root_transform(placement.position, placement.rotation);

        let (amount_scale, _) = self.strategy.route(scales.size);
        let Accumulation { count, fraction } =
            accumulate(&self.template, scales.duration, amount_scale, window, fraction);

        if count > 0 || self.emit_empty_batches {
            let params = self.params(placement.velocity, scales);
            engine.emit(self.handle, &params, count);
        }

        fraction
    }
}
