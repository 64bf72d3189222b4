//! Property-based tests for phasewarp-synth.
//!
//! Oscillator phase bounds, phasor shape identities, filter cutoff bounds
//! and finite voice output over randomized settings.

use std::sync::Arc;

use phasewarp_synth::{
    CUTOFF_LOWER_BOUND, CUTOFF_UPPER_BOUND, FilterMode, ModulatedFilter, Oscillator,
    OscillatorSlot, Phasor, SynthVoice, Voice, WAVETABLE_SIZE, Wavetable, create_store, ids,
    phasor,
};
use proptest::prelude::*;

const SR: f32 = 48000.0;
const N: f32 = WAVETABLE_SIZE as f32;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The oscillator phase stays inside the table for any pitch and modulation.
    #[test]
    fn oscillator_phase_in_table(
        note in 0u8..=127,
        range in -2.0f32..=2.0,
        tune in -12.0f32..=12.0,
        fine in -100.0f32..=100.0,
        shape in 0.0f32..=2.0,
        eg_intensity in 0.0f32..=1.0,
        lfo_intensity in 0.0f32..=1.0,
        eg_mod in 0.0f32..=1.0,
        lfo_mod in -1.0f32..=1.0,
    ) {
        let store = create_store().unwrap();
        store.set(ids::OSC1_RANGE, range).unwrap();
        store.set(ids::OSC1_TUNE, tune).unwrap();
        store.set(ids::OSC1_FINE, fine).unwrap();
        store.set(ids::PHASOR_SHAPE, shape).unwrap();
        store.set(ids::PHASOR_EG_INTENSITY, eg_intensity).unwrap();
        store.set(ids::PHASOR_LFO_INTENSITY, lfo_intensity).unwrap();

        let mut osc = Oscillator::new(&store, OscillatorSlot::Primary, Arc::new(Wavetable::sine())).unwrap();
        osc.update(note, SR);
        prop_assert!(osc.frequency() <= SR * 0.5);

        for _ in 0..512 {
            let out = osc.evaluate(eg_mod, eg_mod, lfo_mod);
            prop_assert!(out.is_finite());
            prop_assert!((0.0..N).contains(&osc.phase()), "phase {}", osc.phase());
        }
    }

    /// The square breakpoint function is point-symmetric about (0.5, 0.25).
    #[test]
    fn square_is_symmetric(x in 0.0f32..=1.0) {
        let sum = phasor::square(x) + phasor::square(1.0 - x);
        prop_assert!((sum - 0.5).abs() < 1e-4, "x={} sum={}", x, sum);
    }

    /// Shape controls 1 and 2 warp identically.
    #[test]
    fn upper_shape_controls_match(
        phase in 0.0f32..N,
        eg_mod in 0.0f32..=1.0,
        lfo_mod in -1.0f32..=1.0,
    ) {
        let store = create_store().unwrap();
        let phasor = Phasor::new(&store).unwrap();

        store.set(ids::PHASOR_SHAPE, 1.0).unwrap();
        let one = phasor.apply(phase, eg_mod, lfo_mod);
        store.set(ids::PHASOR_SHAPE, 2.0).unwrap();
        let two = phasor.apply(phase, eg_mod, lfo_mod);

        prop_assert_eq!(one, two);
    }

    /// Modulated cutoff never leaves the audible range.
    #[test]
    fn filter_cutoff_in_bounds(
        base in 20.0f32..=20000.0,
        intensity in -1.0f32..=1.0,
        envelope in -2.0f32..=2.0,
        input in -1.0f32..=1.0,
    ) {
        let store = create_store().unwrap();
        store.set(ids::FILTER_CUTOFF, base).unwrap();
        store.set(ids::FILTER_EG_INTENSITY, intensity).unwrap();

        let mut filter = ModulatedFilter::new(&store, FilterMode::Lowpass, SR).unwrap();
        let out = filter.evaluate(input, envelope);
        prop_assert!(out.is_finite());
        prop_assert!(filter.cutoff() >= CUTOFF_LOWER_BOUND);
        prop_assert!(filter.cutoff() <= CUTOFF_UPPER_BOUND);
    }

    /// Any note and velocity over random parameter settings renders finite audio.
    #[test]
    fn voice_output_finite(
        note in 0u8..=127,
        velocity in 0.0f32..=1.0,
        shape in 0.0f32..=2.0,
        mix in 0.0f32..=1.0,
        sync in 0.0f32..=1.0,
        resonance in 0.5f32..=10.0,
        filter_eg in -1.0f32..=1.0,
        mod_depth in 0.0f32..=1.0,
        block in 1usize..=256,
    ) {
        let store = create_store().unwrap();
        store.set(ids::PHASOR_SHAPE, shape).unwrap();
        store.set(ids::OSC_MIX, mix).unwrap();
        store.set(ids::OSC_SYNC, sync).unwrap();
        store.set(ids::FILTER_RESONANCE, resonance).unwrap();
        store.set(ids::FILTER_EG_INTENSITY, filter_eg).unwrap();
        store.set(ids::OSC1_MOD_DEPTH, mod_depth).unwrap();
        store.set(ids::OSC2_MOD_DEPTH, mod_depth).unwrap();

        let mut voice = Voice::new(&store, SR).unwrap();
        voice.start_note(note, velocity);

        let mut buffer = vec![0.0f32; block];
        for _ in 0..8 {
            voice.render_next_block(&mut buffer, 0, block);
            prop_assert!(buffer.iter().all(|s| s.is_finite()));
        }
        voice.stop_note(velocity, true);
        for _ in 0..8 {
            voice.render_next_block(&mut buffer, 0, block);
            prop_assert!(buffer.iter().all(|s| s.is_finite()));
        }
    }
}
