//! Phase-warping wavetable oscillator.
//!
//! Each sample the oscillator advances a linear phase through a sine table,
//! lets the [`Phasor`] bend that phase, reads the table at the bent phase and
//! finally runs the result through the [`Waveshaper`]. Pitch comes from the
//! MIDI note plus the oscillator's own range, tune and fine controls.

use alloc::sync::Arc;

use phasewarp_core::{
    ParamError, ParamHandle, ParameterStore, cents_to_ratio, midi_to_freq, wrap_phase,
};

use crate::params::ids;
use crate::phasor::Phasor;
use crate::waveshaper::Waveshaper;
use crate::wavetable::Wavetable;

/// Which of the voice's two oscillators an instance is; selects its
/// parameter ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OscillatorSlot {
    /// `osc1_*` controls.
    Primary,
    /// `osc2_*` controls.
    Secondary,
}

impl OscillatorSlot {
    /// `[range, tune, fine, mod_depth]` parameter ids.
    pub fn param_ids(self) -> [&'static str; 4] {
        match self {
            Self::Primary => [
                ids::OSC1_RANGE,
                ids::OSC1_TUNE,
                ids::OSC1_FINE,
                ids::OSC1_MOD_DEPTH,
            ],
            Self::Secondary => [
                ids::OSC2_RANGE,
                ids::OSC2_TUNE,
                ids::OSC2_FINE,
                ids::OSC2_MOD_DEPTH,
            ],
        }
    }
}

/// Wavetable oscillator with phase warping and waveshaping.
///
/// Phase is kept in table-index units, `[0, table_len)`.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use phasewarp_synth::{Oscillator, OscillatorSlot, Wavetable, create_store};
///
/// let store = create_store().unwrap();
/// let table = Arc::new(Wavetable::sine());
/// let mut osc = Oscillator::new(&store, OscillatorSlot::Primary, table).unwrap();
///
/// osc.update(69, 48000.0);
/// assert!((osc.frequency() - 440.0).abs() < 0.01);
///
/// let sample = osc.evaluate(0.0, 0.0, 0.0);
/// assert!(sample.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct Oscillator {
    phase: f32,
    phase_delta: f32,
    wrapped: bool,

    frequency: f32,
    sample_rate: f32,
    mod_depth: f32,

    range: ParamHandle,
    tune: ParamHandle,
    fine: ParamHandle,
    mod_depth_param: ParamHandle,

    wavetable: Arc<Wavetable>,
    phasor: Phasor,
    waveshaper: Waveshaper,
}

impl Oscillator {
    /// Create an oscillator reading the controls for `slot`.
    ///
    /// The oscillator is silent-pitched (zero increment) until the first
    /// [`update`](Self::update).
    pub fn new(
        store: &ParameterStore,
        slot: OscillatorSlot,
        wavetable: Arc<Wavetable>,
    ) -> Result<Self, ParamError> {
        let [range, tune, fine, mod_depth] = slot.param_ids();
        Ok(Self {
            phase: 0.0,
            phase_delta: 0.0,
            wrapped: false,
            frequency: 0.0,
            sample_rate: 48000.0,
            mod_depth: 0.0,
            range: store.handle(range)?,
            tune: store.handle(tune)?,
            fine: store.handle(fine)?,
            mod_depth_param: store.handle(mod_depth)?,
            wavetable,
            phasor: Phasor::new(store)?,
            waveshaper: Waveshaper::new(),
        })
    }

    /// Recompute frequency and phase increment (control rate).
    ///
    /// `frequency = midi_to_freq(note + tune) * cents_to_ratio(fine) * 2^range`,
    /// clamped to `[0, sample_rate / 2]`. Non-positive sample rates keep
    /// the previous one.
    pub fn update(&mut self, midi_note: u8, sample_rate: f32) {
        if sample_rate > 0.0 && sample_rate.is_finite() {
            self.sample_rate = sample_rate;
        }
        self.mod_depth = self.mod_depth_param.get();

        let freq = midi_to_freq(f32::from(midi_note) + self.tune.get())
            * cents_to_ratio(self.fine.get())
            * libm::exp2f(self.range.get());
        self.frequency = if freq.is_finite() {
            freq.clamp(0.0, self.sample_rate * 0.5)
        } else {
            0.0
        };
        self.phase_delta = self.frequency * self.wavetable.period() / self.sample_rate;
    }

    /// Produce one sample.
    ///
    /// - `eg_mod`: mod envelope, drives the waveshaper together with this
    ///   oscillator's mod depth
    /// - `phase_eg_mod`: phase envelope, drives the phasor
    /// - `lfo_mod`: LFO output, drives the phasor
    #[inline]
    pub fn evaluate(&mut self, eg_mod: f32, phase_eg_mod: f32, lfo_mod: f32) -> f32 {
        let period = self.wavetable.period();

        self.phase += self.phase_delta;
        self.wrapped = self.phase >= period;
        if self.wrapped {
            self.phase = wrap_phase(self.phase, period);
        }

        let warped = self.phasor.apply(self.phase, phase_eg_mod, lfo_mod);
        let sample = self.wavetable.lookup(warped);

        self.waveshaper.process(sample, eg_mod * self.mod_depth)
    }

    /// Restart at phase 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.wrapped = false;
    }

    /// Hard sync: restart at phase 0 without touching pitch.
    #[inline]
    pub fn sync(&mut self) {
        self.phase = 0.0;
    }

    /// Whether the last [`evaluate`](Self::evaluate) crossed the end of the
    /// cycle.
    #[inline]
    pub fn has_wrapped(&self) -> bool {
        self.wrapped
    }

    /// Current phase in table units.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Phase increment per sample in table units.
    pub fn phase_delta(&self) -> f32 {
        self.phase_delta
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }
}
