use kinetica::{Millis, StageSize, Timeline, presets};

fn mix64(mut z: u64) -> u64 {
    // SplitMix64 mixing function.
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn digest_u64(bytes: &[u8]) -> u64 {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    for chunk in bytes.chunks(8) {
        let mut v = 0u64;
        for (i, &b) in chunk.iter().enumerate() {
            v |= (b as u64) << (i * 8);
        }
        state = mix64(state ^ v);
    }
    state
}

fn run_digest(seed: u64) -> u64 {
    let mut placement = presets::home_shapes(seed).unwrap();
    placement.measure(StageSize::new(520.0, 200.0).unwrap());
    let mut tl = Timeline::new()
        .with_sequencer(presets::intro_sequencer().unwrap())
        .with_placement(placement)
        .with_particles(presets::overlay_particles(seed).unwrap());

    let mut digest = 0u64;
    for step in 0..40u64 {
        let now = Millis(step * 500);
        tl.advance_to(now);
        let frame = tl.eval(now);
        let bytes = serde_json::to_vec(&frame).unwrap();
        digest ^= digest_u64(&bytes);
    }
    digest
}

#[test]
fn identically_seeded_timelines_evaluate_identically() {
    assert_eq!(run_digest(99), run_digest(99));
}

#[test]
fn different_seeds_diverge() {
    assert_ne!(run_digest(1), run_digest(2));
}
