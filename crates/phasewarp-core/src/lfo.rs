//! Low Frequency Oscillator for modulation.
//!
//! A phase accumulator producing bipolar control signals at sub-audio rates.

use core::f32::consts::PI;
use libm::sinf;

/// LFO waveform type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoWaveform {
    /// Smooth sine.
    #[default]
    Sine,
    /// Linear up/down ramps.
    Triangle,
    /// Rising ramp with an abrupt reset.
    Saw,
    /// Alternates between +1 and -1.
    Square,
}

impl LfoWaveform {
    /// Map a stepped selector value (0..=3) to a waveform.
    ///
    /// Values are rounded; anything out of range falls back to `Sine`.
    pub fn from_index(index: f32) -> Self {
        match libm::roundf(index) as i32 {
            1 => Self::Triangle,
            2 => Self::Saw,
            3 => Self::Square,
            _ => Self::Sine,
        }
    }

    /// Bipolar value of this waveform at `phase` in `[0, 1)`.
    #[inline]
    pub fn at(self, phase: f32) -> f32 {
        match self {
            Self::Sine => sinf(2.0 * PI * phase),
            Self::Triangle if phase < 0.5 => 4.0 * phase - 1.0,
            Self::Triangle => 3.0 - 4.0 * phase,
            Self::Saw => 2.0 * phase - 1.0,
            Self::Square if phase < 0.5 => 1.0,
            Self::Square => -1.0,
        }
    }
}

/// Low Frequency Oscillator.
///
/// Output is in `[-1.0, 1.0]`; phase runs over `[0.0, 1.0)`.
///
/// # Example
///
/// ```rust
/// use phasewarp_core::{Lfo, LfoWaveform};
///
/// let mut lfo = Lfo::new(44100.0, 2.0);
/// lfo.set_waveform(LfoWaveform::Triangle);
///
/// let value = lfo.next();
/// assert!((-1.0..=1.0).contains(&value));
/// ```
#[derive(Debug, Clone)]
pub struct Lfo {
    phase: f32,
    phase_inc: f32,
    sample_rate: f32,
    waveform: LfoWaveform,
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new(48000.0, 1.0)
    }
}

impl Lfo {
    /// Sine LFO at `freq_hz`. Non-positive sample rates fall back to 48 kHz.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        let mut lfo = Self {
            phase: 0.0,
            phase_inc: 0.0,
            sample_rate: if sample_rate > 0.0 { sample_rate } else { 48000.0 },
            waveform: LfoWaveform::Sine,
        };
        lfo.set_frequency(freq_hz);
        lfo
    }

    /// Set frequency in Hz. Negative or non-finite rates stop the LFO.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        let freq = if freq_hz.is_finite() { freq_hz.max(0.0) } else { 0.0 };
        // Increments of a full cycle or more would skip the wrap below.
        self.phase_inc = (freq / self.sample_rate).min(0.5);
    }

    /// Rate in Hz after clamping.
    pub fn frequency(&self) -> f32 {
        self.phase_inc * self.sample_rate
    }

    /// Choose the waveform. Phase is kept.
    pub fn set_waveform(&mut self, waveform: LfoWaveform) {
        self.waveform = waveform;
    }

    /// Active waveform.
    pub fn waveform(&self) -> LfoWaveform {
        self.waveform
    }

    /// Restart the cycle.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Phase in `[0, 1)`.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Value at the current phase, then advance by one sample.
    #[inline]
    pub fn next(&mut self) -> f32 {
        let value = self.waveform.at(self.phase);
        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        value
    }

    /// Set sample rate, keeping the frequency in Hz.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate > 0.0 && sample_rate.is_finite() {
            let freq = self.frequency();
            self.sample_rate = sample_rate;
            self.set_frequency(freq);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [LfoWaveform; 4] = [
        LfoWaveform::Sine,
        LfoWaveform::Triangle,
        LfoWaveform::Saw,
        LfoWaveform::Square,
    ];

    #[test]
    fn test_one_hertz_completes_one_cycle_per_second() {
        let mut lfo = Lfo::new(44100.0, 1.0);
        let mut wraps = 0;
        let mut previous = lfo.phase();
        for _ in 0..44100 {
            lfo.next();
            if lfo.phase() < previous {
                wraps += 1;
            }
            previous = lfo.phase();
        }
        let distance = lfo.phase().min(1.0 - lfo.phase());
        assert!(wraps <= 1 && distance < 0.01, "wraps {wraps}, phase {}", lfo.phase());
    }

    #[test]
    fn test_every_waveform_is_bipolar_unit() {
        for waveform in ALL {
            let mut lfo = Lfo::new(48000.0, 7.0);
            lfo.set_waveform(waveform);
            let (lo, hi) = (0..48000).map(|_| lfo.next()).fold((1.0f32, -1.0f32), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
            assert!(lo >= -1.0 && hi <= 1.0, "{waveform:?} in [{lo}, {hi}]");
            assert!(hi - lo > 1.9, "{waveform:?} only spans [{lo}, {hi}]");
        }
    }

    #[test]
    fn test_waveform_shapes_at_quarter_points() {
        assert!(LfoWaveform::Sine.at(0.25) > 0.999);
        assert_eq!(LfoWaveform::Triangle.at(0.0), -1.0);
        assert_eq!(LfoWaveform::Triangle.at(0.5), 1.0);
        assert_eq!(LfoWaveform::Saw.at(0.75), 0.5);
        assert_eq!(LfoWaveform::Square.at(0.49), 1.0);
        assert_eq!(LfoWaveform::Square.at(0.5), -1.0);
    }

    #[test]
    fn test_waveform_from_index() {
        assert_eq!(LfoWaveform::from_index(0.0), LfoWaveform::Sine);
        assert_eq!(LfoWaveform::from_index(1.0), LfoWaveform::Triangle);
        assert_eq!(LfoWaveform::from_index(2.2), LfoWaveform::Saw);
        assert_eq!(LfoWaveform::from_index(3.0), LfoWaveform::Square);
        assert_eq!(LfoWaveform::from_index(9.0), LfoWaveform::Sine);
        assert_eq!(LfoWaveform::from_index(-1.0), LfoWaveform::Sine);
    }

    #[test]
    fn test_sample_rate_change_keeps_frequency() {
        let mut lfo = Lfo::new(44100.0, 4.0);
        lfo.set_sample_rate(96000.0);
        assert!((lfo.frequency() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_negative_rate_is_stationary() {
        let mut lfo = Lfo::new(48000.0, -3.0);
        lfo.next();
        assert_eq!(lfo.phase(), 0.0);
    }
}
