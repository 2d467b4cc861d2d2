//! Fixed-capacity store of wave records fed to the shader every frame.
//!
//! The buffer always holds exactly [`WAVE_COUNT`] slots with the most recent
//! wave at index 0. Inserting evicts the oldest slot, so the shader can treat
//! slot order as recency order.

use rand::Rng;

use crate::walk::{Walk, WalkConfig};

/// Number of wave slots uploaded to the shader.
pub const WAVE_COUNT: usize = 50;

/// Floats per slot in the flattened layout: x, y, start time, hue.
pub const FLOATS_PER_WAVE: usize = 4;

/// Decay/shape function applied by the shader, selected through the
/// `waveType` uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaveShape {
    #[default]
    DecayingSine,
    DecayingSquare,
    Peak,
}

impl WaveShape {
    /// Encoding expected by the shader.
    pub fn as_uniform(self) -> f32 {
        match self {
            WaveShape::DecayingSine => 0.1,
            WaveShape::DecayingSquare => 0.2,
            WaveShape::Peak => 0.3,
        }
    }
}

/// Whether a slot holds a live wave. Flattens to the start time in seconds,
/// or -1.0 for an inactive slot, which the shader skips.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaveStart {
    Active(f32),
    Inactive,
}

impl WaveStart {
    fn as_float(self) -> f32 {
        match self {
            WaveStart::Active(seconds) => seconds,
            WaveStart::Inactive => -1.0,
        }
    }
}

/// One disturbance source: normalized position, start time, hue, shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveRecord {
    pub x: f32,
    pub y: f32,
    pub start: WaveStart,
    pub hue: f32,
    pub shape: WaveShape,
}

impl WaveRecord {
    /// Disabled, centered slot.
    pub fn placeholder() -> Self {
        Self {
            x: 0.5,
            y: 0.5,
            start: WaveStart::Inactive,
            hue: 0.0,
            shape: WaveShape::default(),
        }
    }
}

/// Ordered buffer of exactly [`WAVE_COUNT`] records, newest first.
#[derive(Debug, Clone)]
pub struct WaveBuffer {
    slots: Vec<WaveRecord>,
}

impl WaveBuffer {
    /// Buffer full of placeholder slots.
    pub fn new() -> Self {
        Self { slots: vec![WaveRecord::placeholder(); WAVE_COUNT] }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> &WaveRecord {
        &self.slots[index]
    }

    /// Disable every slot.
    pub fn clear(&mut self) {
        self.slots.fill(WaveRecord::placeholder());
    }

    /// Insert `record` as the newest wave, evicting the oldest.
    pub fn push_front(&mut self, record: WaveRecord) {
        self.slots.rotate_right(1);
        self.slots[0] = record;
    }

    /// Overwrite one slot in place. Panics if `index` is out of range;
    /// callers index fixed slots and an overrun is a programming error.
    pub fn write(&mut self, index: usize, record: WaveRecord) {
        self.slots[index] = record;
    }

    /// Fill every slot with a drifting random pattern. Positions wander with
    /// occasional jumps, start times spread widely, hue drifts slowly.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        let mut x = Walk::new(WalkConfig::new(0.1, 0.1, 0.4), rng);
        let mut y = Walk::new(WalkConfig::new(0.1, 0.1, 0.4), rng);
        let mut time = Walk::new(WalkConfig::new(0.5, 0.0, 0.0), rng);
        let mut hue = Walk::new(WalkConfig::new(0.05, 0.1, 0.5), rng);
        for slot in &mut self.slots {
            *slot = WaveRecord {
                x: x.next(rng),
                y: y.next(rng),
                start: WaveStart::Active(time.next(rng)),
                hue: hue.next(rng),
                shape: WaveShape::default(),
            };
        }
    }

    /// Flatten all slots into `out`, 4 floats per slot in slot order.
    pub fn write_floats(&self, out: &mut Vec<f32>) {
        out.clear();
        out.reserve(WAVE_COUNT * FLOATS_PER_WAVE);
        for slot in &self.slots {
            out.extend_from_slice(&[slot.x, slot.y, slot.start.as_float(), slot.hue]);
        }
    }

    pub fn to_floats(&self) -> Vec<f32> {
        let mut out = Vec::new();
        self.write_floats(&mut out);
        out
    }
}

impl Default for WaveBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn record(x: f32, y: f32, seconds: f32, hue: f32) -> WaveRecord {
        WaveRecord { x, y, start: WaveStart::Active(seconds), hue, shape: WaveShape::default() }
    }

    #[test]
    fn length_is_invariant_across_operations() {
        let mut buf = WaveBuffer::new();
        assert_eq!(buf.len(), WAVE_COUNT);
        assert!(!buf.is_empty());
        buf.randomize(&mut SmallRng::seed_from_u64(1));
        assert_eq!(buf.len(), WAVE_COUNT);
        for i in 0..WAVE_COUNT * 2 {
            buf.push_front(record(0.1, 0.2, i as f32, 0.3));
            assert_eq!(buf.len(), WAVE_COUNT);
        }
        buf.write(WAVE_COUNT - 1, record(0.0, 0.0, 0.0, 0.0));
        assert_eq!(buf.len(), WAVE_COUNT);
        buf.clear();
        assert_eq!(buf.len(), WAVE_COUNT);
    }

    #[test]
    fn cleared_buffer_flattens_to_placeholder_pattern() {
        let mut buf = WaveBuffer::new();
        buf.randomize(&mut SmallRng::seed_from_u64(2));
        buf.clear();
        let flat = buf.to_floats();
        assert_eq!(flat.len(), WAVE_COUNT * FLOATS_PER_WAVE);
        for slot in flat.chunks(FLOATS_PER_WAVE) {
            assert_eq!(slot, [0.5, 0.5, -1.0, 0.0]);
        }
    }

    #[test]
    fn push_front_inserts_newest_and_evicts_oldest() {
        let mut buf = WaveBuffer::new();
        buf.randomize(&mut SmallRng::seed_from_u64(3));
        let before: Vec<WaveRecord> = (0..WAVE_COUNT).map(|i| *buf.slot(i)).collect();
        let newest = record(0.9, 0.8, 42.0, 0.7);
        buf.push_front(newest);
        assert_eq!(*buf.slot(0), newest);
        for i in 1..WAVE_COUNT {
            assert_eq!(*buf.slot(i), before[i - 1]);
        }
    }

    #[test]
    fn write_replaces_exactly_one_slot() {
        let mut buf = WaveBuffer::new();
        let r = record(0.1, 0.2, 3.0, 0.4);
        buf.write(7, r);
        for i in 0..WAVE_COUNT {
            if i == 7 {
                assert_eq!(*buf.slot(i), r);
            } else {
                assert_eq!(*buf.slot(i), WaveRecord::placeholder());
            }
        }
    }

    #[test]
    #[should_panic]
    fn write_out_of_range_panics() {
        let mut buf = WaveBuffer::new();
        buf.write(WAVE_COUNT, record(0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn randomize_produces_unit_interval_fields() {
        let mut buf = WaveBuffer::new();
        buf.randomize(&mut SmallRng::seed_from_u64(4));
        for i in 0..WAVE_COUNT {
            let slot = buf.slot(i);
            assert!((0.0..=1.0).contains(&slot.x));
            assert!((0.0..=1.0).contains(&slot.y));
            assert!((0.0..=1.0).contains(&slot.hue));
            match slot.start {
                WaveStart::Active(t) => assert!((0.0..=1.0).contains(&t)),
                WaveStart::Inactive => panic!("randomize left slot {i} inactive"),
            }
        }
    }

    #[test]
    fn clear_then_push_flattens_newest_first() {
        let mut buf = WaveBuffer::new();
        buf.clear();
        buf.push_front(record(0.2, 0.3, 1.5, 0.65));
        let flat = buf.to_floats();
        assert_eq!(&flat[0..4], [0.2, 0.3, 1.5, 0.65]);
        assert_eq!(&flat[4..8], [0.5, 0.5, -1.0, 0.0]);
    }
}
