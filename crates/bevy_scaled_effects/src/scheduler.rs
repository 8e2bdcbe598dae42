use bevy::prelude::*;

use crate::{
    accumulator::EmissionWindow,
    asset::EffectConfig,
    emitter::{EmitScales, Placement, VirtualEmitter},
    engine::ParticleEngine,
};

/// A request to play an effect.
///
/// `size`, `duration` and `lifetime` are absolute values; `None` stands for the
/// configured default and therefore a scale of `1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitRequest {
    /// World position of the effect root.
    pub position: Vec3,
    /// Rotation of the effect root.
    pub rotation: Quat,
    /// Velocity inherited by spawned particles.
    pub velocity: Vec3,
    /// Requested effect duration.
    pub duration: Option<f32>,
    /// Requested particle lifetime.
    pub lifetime: Option<f32>,
    /// Requested effect size.
    pub size: Option<f32>,
    /// Extra delay before every emitter's own start delay, in seconds.
    pub delay: f32,
}

impl Default for EmitRequest {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            duration: None,
            lifetime: None,
            size: None,
            delay: 0.0,
        }
    }
}

impl EmitRequest {
    /// A request at `position` using every default.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..default()
        }
    }

    /// Sets the root rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the inherited velocity.
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Sets the absolute duration.
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Sets the absolute particle lifetime.
    pub fn with_lifetime(mut self, lifetime: f32) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    /// Sets the absolute size.
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets the extra start delay.
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    /// Normalizes the request against `config`.
    pub fn scales(&self, config: &EffectConfig) -> EmitScales {
        EmitScales {
            duration: ratio(self.duration, config.default_duration),
            lifetime: ratio(self.lifetime, config.default_lifetime),
            size: ratio(self.size, config.default_size),
        }
    }

    fn placement(&self) -> Placement {
        Placement {
            position: self.position,
            rotation: self.rotation,
            velocity: self.velocity,
        }
    }
}

// a non-positive default cannot normalize anything, so it maps to scale 1
fn ratio(requested: Option<f32>, default: f32) -> f32 {
    match requested {
        Some(value) if default > 0.0 => value / default,
        _ => 1.0,
    }
}

/// One emitter's share of a triggered effect.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledInstance {
    /// Index into the scheduler's emitters.
    pub emitter_index: usize,
    /// Absolute time of the first emission.
    pub start_time: f64,
    /// Absolute time after which the instance is dropped.
    pub end_time: f64,
    /// Scaled emission duration, the local time the last window always reaches.
    pub emission_duration: f32,
    /// Root placement for every emission.
    pub placement: Placement,
    /// Trigger multipliers.
    pub scales: EmitScales,
    /// Carried fractional particle count.
    pub fraction: f32,
    /// Whether the instance has emitted at least once.
    pub started: bool,
    /// Local time up to which particles have been emitted.
    pub elapsed: f32,
}

impl ScheduledInstance {
    /// Whether the instance is still waiting for its start time at `now`.
    pub fn is_pending(&self, now: f64) -> bool {
        now < self.start_time
    }
}

/// Drives every emitter of one effect root.
///
/// Holds the discovered emitters, fixed after construction, and the unordered list
/// of instances created by [`emit`](Self::emit) and advanced by [`tick`](Self::tick).
///
/// Absolute times are `f64` seconds so that instance boundaries stay exact in long
/// sessions. Local times within an instance are `f32`.
#[derive(Debug, Clone)]
pub struct EffectScheduler<H> {
    emitters: Vec<VirtualEmitter<H>>,
    active: Vec<ScheduledInstance>,
    config: EffectConfig,
}

impl<H: Copy> EffectScheduler<H> {
    /// Creates a scheduler over `emitters`.
    pub fn new(emitters: Vec<VirtualEmitter<H>>, config: EffectConfig) -> Self {
        Self {
            emitters,
            active: Vec::new(),
            config,
        }
    }

    /// The discovered emitters.
    pub fn emitters(&self) -> &[VirtualEmitter<H>] {
        &self.emitters
    }

    /// Instances still running, in no particular order.
    pub fn active_instances(&self) -> &[ScheduledInstance] {
        &self.active
    }

    /// The trigger defaults.
    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// Whether nothing is scheduled.
    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    /// Triggers the effect at absolute time `now`.
    ///
    /// Emitters without a start delay emit once immediately at local time `0`.
    /// Emitters with a zero total duration emit only that once and are not scheduled.
    pub fn emit<E>(&mut self, request: &EmitRequest, now: f64, engine: &mut E)
    where
        E: ParticleEngine<Handle = H>,
    {
        let scales = request.scales(&self.config);
        let placement = request.placement();

        for (emitter_index, emitter) in self.emitters.iter().enumerate() {
            let start_delay = request.delay + emitter.start_delay(scales.duration);
            let emission_duration = emitter.emission_duration(scales.duration);
            let total_duration = start_delay + emission_duration;

            let mut instance = ScheduledInstance {
                emitter_index,
                start_time: now + f64::from(start_delay),
                end_time: now + f64::from(total_duration),
                emission_duration,
                placement,
                scales,
                fraction: 0.0,
                started: false,
                elapsed: 0.0,
            };

            if start_delay <= 0.0 {
                instance.fraction =
                    emitter.emit(engine, &placement, scales, 0.0, 0.0, 0.0, true);
                instance.started = true;
            }

            if total_duration > 0.0 {
                self.active.push(instance);
            }
        }
    }

    /// Advances every instance to absolute time `now`.
    ///
    /// `delta_time` only sizes an instance's first window. Later windows start where
    /// the previous one ended, and the window of the tick that removes an instance
    /// extends to its full emission duration.
    pub fn tick<E>(&mut self, now: f64, delta_time: f32, engine: &mut E)
    where
        E: ParticleEngine<Handle = H>,
    {
        let mut i = self.active.len();
        while i > 0 {
            i -= 1;

            let instance = &mut self.active[i];
            let finished = now >= instance.end_time;
            if now >= instance.start_time {
                let emitter = &self.emitters[instance.emitter_index];
                let mut local_time = (now - instance.start_time).max(0.0) as f32;
                if finished {
                    local_time = local_time.max(instance.emission_duration);
                }

                let window = if instance.started {
                    EmissionWindow::after(instance.elapsed, local_time)
                } else {
                    EmissionWindow::new(local_time, delta_time, true)
                };
                instance.fraction = emitter.emit_window(
                    engine,
                    &instance.placement,
                    instance.scales,
                    &window,
                    instance.fraction,
                );
                instance.elapsed = window.end;
                instance.started = true;
            }

            if finished {
                self.active.swap_remove(i);
            }
        }
    }
}
