//! Synth voice: two phase-warping oscillators through a modulated filter.
//!
//! One [`Voice`] is built per polyphony slot and reused for every note it
//! plays. It owns all its generators, reads its controls through parameter
//! handles, and renders into a caller-owned buffer through the
//! [`SynthVoice`] trait. Choosing which voice plays which note is left to
//! the host.
//!
//! # Signal Flow
//!
//! ```text
//! mod EG ──────────────┐ (waveshaper drive)
//! phase EG ─┬──────────┤ (phasor warp)
//! LFO ──────┘          ▼
//!           osc 1 ──┬─ mix ── filter ── × amp EG × velocity ── out
//!           osc 2 ──┘           ▲
//!      (hard sync from osc 1)   └── filter EG (cutoff offset)
//! ```

use alloc::sync::Arc;

use phasewarp_core::{ParamError, ParamHandle, ParameterStore, lerp};

use crate::envelope::{EnvelopeGenerator, EnvelopeRole};
use crate::filter::{FilterMode, ModulatedFilter};
use crate::lfo::VoiceLfo;
use crate::oscillator::{Oscillator, OscillatorSlot};
use crate::params::ids;
use crate::wavetable::Wavetable;

/// Note played by a voice before its first `start_note` (middle C).
pub const DEFAULT_NOTE: u8 = 60;

/// Host-facing interface of a synth voice.
///
/// All methods run on the audio thread and must not allocate or block.
pub trait SynthVoice {
    /// Begin playing `note` at `velocity` (`0.0..=1.0`).
    fn start_note(&mut self, note: u8, velocity: f32);

    /// Stop the current note.
    ///
    /// With `allow_tail_off` the envelopes release naturally; without it the
    /// voice falls silent immediately.
    fn stop_note(&mut self, velocity: f32, allow_tail_off: bool);

    /// Render `num_samples` into `output[start_sample..]`, replacing what
    /// is there. The range is clamped to the slice.
    fn render_next_block(&mut self, output: &mut [f32], start_sample: usize, num_samples: usize);

    /// Whether the voice has nothing left to play.
    fn is_finished(&self) -> bool;
}

/// Two-oscillator phase-warping voice.
///
/// # Example
///
/// ```rust
/// use phasewarp_synth::{SynthVoice, Voice, create_store};
///
/// let store = create_store().unwrap();
/// let mut voice = Voice::new(&store, 48000.0).unwrap();
///
/// voice.start_note(60, 1.0);
/// let mut block = [0.0f32; 256];
/// voice.render_next_block(&mut block, 0, 256);
/// assert!(block.iter().any(|s| *s != 0.0));
///
/// voice.stop_note(0.0, false);
/// assert!(voice.is_finished());
/// ```
#[derive(Debug, Clone)]
pub struct Voice {
    note: u8,
    velocity: f32,
    active: bool,
    sample_rate: f32,

    osc_sync: bool,
    osc_mix: f32,
    osc_sync_param: ParamHandle,
    osc_mix_param: ParamHandle,

    primary: Oscillator,
    secondary: Oscillator,

    amp_eg: EnvelopeGenerator,
    phase_eg: EnvelopeGenerator,
    filter_eg: EnvelopeGenerator,
    mod_eg: EnvelopeGenerator,

    lfo: VoiceLfo,
    filter: ModulatedFilter,
}

impl Voice {
    /// Build a voice reading its controls from `store`.
    ///
    /// Fails if any parameter the voice needs is not registered.
    pub fn new(store: &ParameterStore, sample_rate: f32) -> Result<Self, ParamError> {
        let sample_rate = if sample_rate > 0.0 && sample_rate.is_finite() {
            sample_rate
        } else {
            48000.0
        };
        let wavetable = Arc::new(Wavetable::sine());

        let mut voice = Self {
            note: DEFAULT_NOTE,
            velocity: 0.0,
            active: false,
            sample_rate,
            osc_sync: false,
            osc_mix: 0.5,
            osc_sync_param: store.handle(ids::OSC_SYNC)?,
            osc_mix_param: store.handle(ids::OSC_MIX)?,
            primary: Oscillator::new(store, OscillatorSlot::Primary, Arc::clone(&wavetable))?,
            secondary: Oscillator::new(store, OscillatorSlot::Secondary, wavetable)?,
            amp_eg: EnvelopeGenerator::new(store, EnvelopeRole::Amp)?,
            phase_eg: EnvelopeGenerator::new(store, EnvelopeRole::Phase)?,
            filter_eg: EnvelopeGenerator::new(store, EnvelopeRole::Filter)?,
            mod_eg: EnvelopeGenerator::new(store, EnvelopeRole::Mod)?,
            lfo: VoiceLfo::new(store, sample_rate)?,
            filter: ModulatedFilter::new(store, FilterMode::Lowpass, sample_rate)?,
        };
        voice.update_controls();

        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, "voice constructed");

        Ok(voice)
    }

    /// Note currently (or last) played.
    pub fn note(&self) -> u8 {
        self.note
    }

    /// Velocity of the current note.
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Current sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Change the sample rate. Non-positive rates are ignored.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate <= 0.0 || !sample_rate.is_finite() {
            return;
        }
        self.sample_rate = sample_rate;
        self.filter.set_sample_rate(sample_rate);
        self.update_controls();

        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, "voice sample rate changed");
    }

    /// Primary oscillator.
    pub fn primary(&self) -> &Oscillator {
        &self.primary
    }

    /// Secondary oscillator.
    pub fn secondary(&self) -> &Oscillator {
        &self.secondary
    }

    /// Envelope generator for `role`.
    pub fn envelope(&self, role: EnvelopeRole) -> &EnvelopeGenerator {
        match role {
            EnvelopeRole::Amp => &self.amp_eg,
            EnvelopeRole::Phase => &self.phase_eg,
            EnvelopeRole::Filter => &self.filter_eg,
            EnvelopeRole::Mod => &self.mod_eg,
        }
    }

    /// The voice filter.
    pub fn filter(&self) -> &ModulatedFilter {
        &self.filter
    }

    fn envelopes_mut(&mut self) -> [&mut EnvelopeGenerator; 4] {
        [
            &mut self.amp_eg,
            &mut self.phase_eg,
            &mut self.filter_eg,
            &mut self.mod_eg,
        ]
    }

    /// Control-rate refresh of every generator.
    fn update_controls(&mut self) {
        let sample_rate = self.sample_rate;
        let note = self.note;

        self.primary.update(note, sample_rate);
        self.secondary.update(note, sample_rate);
        for eg in self.envelopes_mut() {
            eg.update(sample_rate);
        }
        self.filter.update();
        self.lfo.update(sample_rate);

        self.osc_sync = self.osc_sync_param.get() >= 0.5;
        self.osc_mix = self.osc_mix_param.get().clamp(0.0, 1.0);
    }

    #[inline]
    fn render_sample(&mut self) -> f32 {
        let mod_env = self.mod_eg.evaluate();
        let phase_env = self.phase_eg.evaluate();
        let filter_env = self.filter_eg.evaluate();
        let lfo = self.lfo.evaluate();
        let amp = self.amp_eg.evaluate();

        let primary = self.primary.evaluate(mod_env, phase_env, lfo);
        if self.osc_sync && self.primary.has_wrapped() {
            self.secondary.sync();
        }
        let secondary = self.secondary.evaluate(mod_env, phase_env, lfo);

        let mixed = lerp(primary, secondary, self.osc_mix);
        self.filter.evaluate(mixed, filter_env) * amp * self.velocity
    }
}

impl SynthVoice for Voice {
    fn start_note(&mut self, note: u8, velocity: f32) {
        self.note = note.min(127);
        self.velocity = if velocity.is_finite() {
            velocity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.active = true;

        self.primary.reset();
        self.secondary.reset();
        self.lfo.reset();
        for eg in self.envelopes_mut() {
            eg.note_on();
        }
    }

    fn stop_note(&mut self, _velocity: f32, allow_tail_off: bool) {
        if allow_tail_off {
            for eg in self.envelopes_mut() {
                eg.note_off();
            }
            if !self.amp_eg.is_active() {
                // Zero release: nothing left to play.
                self.active = false;
            }
        } else {
            for eg in self.envelopes_mut() {
                eg.reset();
            }
            self.filter.reset();
            self.active = false;

            #[cfg(feature = "tracing")]
            tracing::debug!(note = self.note, "voice stopped without tail");
        }
    }

    fn render_next_block(&mut self, output: &mut [f32], start_sample: usize, num_samples: usize) {
        let end = start_sample.saturating_add(num_samples).min(output.len());
        let start = start_sample.min(end);
        let region = &mut output[start..end];

        if !self.active {
            region.fill(0.0);
            return;
        }

        self.update_controls();

        let mut rendered = 0;
        for sample in region.iter_mut() {
            *sample = self.render_sample();
            rendered += 1;
            if !self.amp_eg.is_active() {
                self.active = false;
                break;
            }
        }
        region[rendered..].fill(0.0);
    }

    fn is_finished(&self) -> bool {
        !self.active
    }
}
