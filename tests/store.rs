//! End-to-end exercise of the wave store through the public API.

use waves_wasm::wave::{WaveBuffer, WaveRecord, WaveShape, WaveStart, FLOATS_PER_WAVE, WAVE_COUNT};

#[test]
fn clear_push_flatten_round_trip() {
    let mut buffer = WaveBuffer::new();
    buffer.clear();
    buffer.push_front(WaveRecord {
        x: 0.2,
        y: 0.3,
        start: WaveStart::Active(1.5),
        hue: 0.65,
        shape: WaveShape::DecayingSine,
    });

    let flat = buffer.to_floats();
    assert_eq!(flat.len(), WAVE_COUNT * FLOATS_PER_WAVE);
    assert_eq!(&flat[0..4], [0.2, 0.3, 1.5, 0.65]);
    assert_eq!(&flat[4..8], [0.5, 0.5, -1.0, 0.0]);

    // Every remaining slot is still the disabled placeholder.
    for slot in flat[4..].chunks(FLOATS_PER_WAVE) {
        assert_eq!(slot, [0.5, 0.5, -1.0, 0.0]);
    }
}

#[test]
fn filling_the_buffer_evicts_from_the_back() {
    let mut buffer = WaveBuffer::new();
    buffer.clear();
    for i in 0..WAVE_COUNT + 10 {
        buffer.push_front(WaveRecord {
            x: 0.1,
            y: 0.1,
            start: WaveStart::Active(i as f32),
            hue: 0.5,
            shape: WaveShape::DecayingSine,
        });
        assert_eq!(buffer.len(), WAVE_COUNT);
    }
    // Newest first; the ten oldest pushes (and all placeholders) are gone.
    assert_eq!(
        buffer.slot(0).start,
        WaveStart::Active((WAVE_COUNT + 9) as f32)
    );
    assert_eq!(buffer.slot(WAVE_COUNT - 1).start, WaveStart::Active(10.0));
}
