use crate::template::EmitterTemplate;

/// Outcome of one accumulation step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Accumulation {
    /// Whole particles to spawn now.
    pub count: u32,
    /// Fractional particles carried to the next step, in `[0, 1)`.
    pub fraction: f32,
}

/// The local time span covered by one emission step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionWindow {
    /// Window start, `max(end - delta_time, 0)`.
    pub start: f32,
    /// Window end, the instance's local time.
    pub end: f32,
    /// Whether a burst exactly at `start` is counted. Only set on an instance's first step.
    pub include_start: bool,
}

impl EmissionWindow {
    /// The window ending at `time` and spanning at most `delta_time`.
    pub fn new(time: f32, delta_time: f32, first_step: bool) -> Self {
        let end = time.max(0.0);
        Self {
            start: (end - delta_time).max(0.0),
            end,
            include_start: first_step,
        }
    }

    /// The window continuing from `previous_end` up to `time`, open at its start.
    pub fn after(previous_end: f32, time: f32) -> Self {
        Self {
            start: previous_end,
            end: time.max(previous_end),
            include_start: false,
        }
    }

    /// Length of the window, never negative.
    pub fn length(&self) -> f32 {
        (self.end - self.start).max(0.0)
    }

    /// Whether a burst at `time` belongs to this window.
    ///
    /// The upper bound is closed and the lower bound open, except on a first step.
    pub fn contains(&self, time: f32) -> bool {
        let after_start = if self.include_start {
            time >= self.start
        } else {
            time > self.start
        };
        after_start && time <= self.end
    }
}

/// Sum of burst counts falling inside `window`.
pub fn burst_amount(template: &EmitterTemplate, window: &EmissionWindow) -> u32 {
    template
        .bursts
        .iter()
        .filter(|burst| window.contains(burst.time))
        .map(|burst| burst.count)
        .sum()
}

/// Continuous particles emitted over `window`, integrating the rate at the window end.
///
/// A zero or non-finite normalization span yields no continuous emission.
pub fn continuous_amount(template: &EmitterTemplate, duration_scale: f32, window: &EmissionWindow) -> f32 {
    let span = template.duration * duration_scale;
    if span <= 0.0 || !span.is_finite() {
        return 0.0;
    }
    let normalized_time = window.end / span;
    let rate = template.rate_over_time.evaluate(normalized_time).max(0.0);
    rate * window.length()
}

/// Combines bursts and continuous rate over `window`, scaled by `amount_scale`, plus the
/// carried `fraction`.
pub fn accumulate(
    template: &EmitterTemplate,
    duration_scale: f32,
    amount_scale: f32,
    window: &EmissionWindow,
    fraction: f32,
) -> Accumulation {
    let bursts = burst_amount(template, window) as f32;
    let continuous = continuous_amount(template, duration_scale, window);
    let total = (bursts + continuous) * amount_scale + fraction;

    if !total.is_finite() || total <= 0.0 {
        return Accumulation::default();
    }

    let whole = total.floor();
    Accumulation {
        count: whole as u32,
        fraction: total - whole,
    }
}
