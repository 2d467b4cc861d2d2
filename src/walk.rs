//! Bounded random walk on the unit interval.
//!
//! Successive values stay near the previous value but occasionally jump to a
//! different neighbourhood of [0,1]. The interval is circular: a value that
//! drifts past either end wraps around rather than clamping, so hue and
//! position streams never pile up at the edges.

use rand::Rng;

/// Step and jump ranges for a [`Walk`].
#[derive(Debug, Clone, Copy)]
pub struct WalkConfig {
    /// Ordinary steps land within `±step` of the previous value.
    pub step: f32,
    /// Probability that a step is a jump instead.
    pub jump_chance: f32,
    /// Jumps land within `±jump_range` of the previous value.
    pub jump_range: f32,
}

impl WalkConfig {
    pub const fn new(step: f32, jump_chance: f32, jump_range: f32) -> Self {
        Self { step, jump_chance, jump_range }
    }
}

/// One random-walk stream. Callers own one `Walk` per logical stream and
/// supply the `Rng` at each draw, so tests can seed it.
#[derive(Debug, Clone)]
pub struct Walk {
    config: WalkConfig,
    value: f32,
}

impl Walk {
    pub fn new<R: Rng>(config: WalkConfig, rng: &mut R) -> Self {
        Self { config, value: rng.gen() }
    }

    /// Advance the walk and return the new value in [0,1].
    pub fn next<R: Rng>(&mut self, rng: &mut R) -> f32 {
        let range = if rng.gen::<f32>() <= self.config.jump_chance {
            self.config.jump_range
        } else {
            self.config.step
        };
        let offset = if range > 0.0 {
            rng.gen_range(-range..=range)
        } else {
            0.0
        };
        self.value = wrap_unit(self.value + offset);
        self.value
    }
}

/// Reduce `v` into [0,1], treating the interval as circular.
fn wrap_unit(v: f32) -> f32 {
    if v > 1.0 {
        v - v.trunc()
    } else if v < 0.0 {
        v - v.trunc() + 1.0
    } else {
        v
    }
}
