//! Trapezoidal state variable filter.
//!
//! One pair of integrators produces the lowpass, highpass, bandpass and notch
//! responses together. The synth voice moves the cutoff on every sample, so
//! retuning only recomputes coefficients and never touches the integrator
//! state.
//!
//! The solver is the linear trapezoidal SVF from Andrew Simper (Cytomic),
//! "Linear Trapezoidal Integrated SVF" (2013), which is the TPT structure of
//! Zavalishin, "The Art of VA Filter Design", chapter 3, with the feedback
//! division folded into three precomputed coefficients.

use core::f32::consts::PI;
use libm::tanf;

use crate::flush_denormal;

/// Lowest cutoff the filter accepts, in Hz.
pub const MIN_CUTOFF: f32 = 20.0;

/// Highest cutoff as a fraction of the sample rate.
const MAX_CUTOFF_RATIO: f32 = 0.49;

const DEFAULT_CUTOFF: f32 = 1000.0;
const DEFAULT_Q: f32 = core::f32::consts::FRAC_1_SQRT_2;
const Q_RANGE: (f32, f32) = (0.5, 20.0);

/// Response returned by [`StateVariableFilter::process`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SvfOutput {
    /// Passes frequencies below the cutoff.
    #[default]
    Lowpass,
    /// Passes frequencies above the cutoff.
    Highpass,
    /// Passes frequencies near the cutoff.
    Bandpass,
    /// Rejects frequencies near the cutoff.
    Notch,
}

/// All four responses for one input sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SvfResponses {
    /// Lowpass output.
    pub low: f32,
    /// Highpass output.
    pub high: f32,
    /// Bandpass output.
    pub band: f32,
    /// Notch output (low + high).
    pub notch: f32,
}

impl SvfResponses {
    /// Pick one response.
    #[inline]
    pub fn select(&self, output: SvfOutput) -> f32 {
        match output {
            SvfOutput::Lowpass => self.low,
            SvfOutput::Highpass => self.high,
            SvfOutput::Bandpass => self.band,
            SvfOutput::Notch => self.notch,
        }
    }
}

/// Two-pole (12 dB/oct) state variable filter.
///
/// Cutoff is clamped to `[20, 0.49 × sample_rate]` Hz and Q to `[0.5, 20]`.
/// A new filter is a lowpass at 1 kHz with Q = 1/√2.
///
/// ```rust
/// use phasewarp_core::{StateVariableFilter, SvfOutput};
///
/// let mut filter = StateVariableFilter::new(44100.0);
/// filter.set_output_type(SvfOutput::Bandpass);
/// filter.set_resonance(4.0);
///
/// for n in 0..64 {
///     // sweep upwards while filtering
///     filter.set_cutoff(200.0 + 50.0 * n as f32);
///     assert!(filter.process(1.0).is_finite());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct StateVariableFilter {
    s1: f32,
    s2: f32,

    // g = tan(pi fc / fs), k = 1/Q
    g: f32,
    k: f32,
    a1: f32,
    a2: f32,
    a3: f32,

    sample_rate: f32,
    cutoff: f32,
    resonance: f32,
    output_type: SvfOutput,
}

impl Default for StateVariableFilter {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl StateVariableFilter {
    /// Lowpass filter at 1 kHz. Invalid sample rates fall back to 48 kHz.
    pub fn new(sample_rate: f32) -> Self {
        let sample_rate = if sample_rate > 0.0 && sample_rate.is_finite() {
            sample_rate
        } else {
            48000.0
        };
        let mut filter = Self {
            s1: 0.0,
            s2: 0.0,
            g: 0.0,
            k: 0.0,
            a1: 0.0,
            a2: 0.0,
            a3: 0.0,
            sample_rate,
            cutoff: DEFAULT_CUTOFF,
            resonance: DEFAULT_Q,
            output_type: SvfOutput::Lowpass,
        };
        filter.retune();
        filter
    }

    /// Set the cutoff in Hz. NaN selects the lowest cutoff.
    #[inline]
    pub fn set_cutoff(&mut self, hz: f32) {
        let ceiling = self.sample_rate * MAX_CUTOFF_RATIO;
        self.cutoff = if hz.is_nan() { MIN_CUTOFF } else { hz.clamp(MIN_CUTOFF, ceiling) };
        self.retune();
    }

    /// Cutoff in Hz after clamping.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Set the Q factor. NaN selects 1/√2.
    pub fn set_resonance(&mut self, q: f32) {
        self.resonance = if q.is_nan() { DEFAULT_Q } else { q.clamp(Q_RANGE.0, Q_RANGE.1) };
        self.retune();
    }

    /// Q factor after clamping.
    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Choose the response returned by [`process`](Self::process).
    pub fn set_output_type(&mut self, output_type: SvfOutput) {
        self.output_type = output_type;
    }

    /// Response returned by [`process`](Self::process).
    pub fn output_type(&self) -> SvfOutput {
        self.output_type
    }

    /// Change the sample rate and re-clamp the cutoff. Invalid rates are ignored.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate > 0.0 && sample_rate.is_finite() {
            self.sample_rate = sample_rate;
            self.set_cutoff(self.cutoff);
        }
    }

    /// Zero the integrators.
    pub fn reset(&mut self) {
        self.s1 = 0.0;
        self.s2 = 0.0;
    }

    fn retune(&mut self) {
        self.g = tanf(PI * self.cutoff / self.sample_rate);
        self.k = 1.0 / self.resonance;
        self.a1 = 1.0 / (1.0 + self.g * (self.g + self.k));
        self.a2 = self.g * self.a1;
        self.a3 = self.g * self.a2;
    }

    /// Run one sample and return every response.
    #[inline]
    pub fn process_all(&mut self, input: f32) -> SvfResponses {
        let v3 = input - self.s2;
        let band = self.a1 * self.s1 + self.a2 * v3;
        let low = self.s2 + self.a2 * self.s1 + self.a3 * v3;

        self.s1 = flush_denormal(2.0 * band - self.s1);
        self.s2 = flush_denormal(2.0 * low - self.s2);

        let high = input - self.k * band - low;
        SvfResponses {
            low,
            high,
            band,
            notch: low + high,
        }
    }

    /// Run one sample and return the selected response.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.process_all(input).select(self.output_type)
    }
}
