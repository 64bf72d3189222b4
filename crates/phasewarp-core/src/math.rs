//! Mathematical utility functions for DSP.
//!
//! All functions are allocation-free and suitable for `no_std`.
//!
//! # Pitch Conversions
//!
//! - [`midi_to_freq`] - MIDI note (fractional) to Hz, A4 = 440 Hz
//! - [`cents_to_ratio`] - Detune in cents to frequency ratio
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`gain_to_db`] - Convert between dB and linear gain
//!
//! # Utilities
//!
//! - [`lerp`] - Linear interpolation
//! - [`wrap_phase`] - Wrap a phase value into `[0, period)`
//! - [`flush_denormal`] - Zero out values in the subnormal range

use libm::{expf, exp2f, logf};

/// Reference pitch for MIDI note 69 (A4).
pub const A4_FREQUENCY: f32 = 440.0;

/// Convert a (possibly fractional) MIDI note number to frequency in Hz.
///
/// Uses equal temperament with A4 (note 69) at 440 Hz. Fractional notes
/// carry tuning offsets, so `midi_to_freq(60.5)` is a quarter tone above
/// middle C.
///
/// # Example
/// ```rust
/// use phasewarp_core::midi_to_freq;
///
/// assert!((midi_to_freq(69.0) - 440.0).abs() < 1e-3);
/// assert!((midi_to_freq(81.0) - 880.0).abs() < 1e-2);
/// ```
#[inline]
pub fn midi_to_freq(note: f32) -> f32 {
    A4_FREQUENCY * exp2f((note - 69.0) / 12.0)
}

/// Convert a detune amount in cents to a frequency ratio.
///
/// 1200 cents is one octave, so `cents_to_ratio(1200.0) == 2.0`.
#[inline]
pub fn cents_to_ratio(cents: f32) -> f32 {
    exp2f(cents / 1200.0)
}

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use phasewarp_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Gains at or below `1e-10` are floored there, so silence maps to -200 dB
/// rather than negative infinity.
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(gain.max(1e-10)) * FACTOR
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Wrap `phase` into `[0, period)`.
///
/// Handles negative input and values many periods away. The result never
/// equals `period`, even when float rounding would produce it.
/// A non-positive or non-finite period yields `0.0`.
#[inline]
pub fn wrap_phase(phase: f32, period: f32) -> f32 {
    if period <= 0.0 || !period.is_finite() || !phase.is_finite() {
        return 0.0;
    }
    let mut wrapped = phase % period;
    if wrapped < 0.0 {
        wrapped += period;
    }
    if wrapped >= period { 0.0 } else { wrapped }
}

/// Flush denormal (subnormal) floats to zero.
///
/// Subnormal arithmetic is slow on most architectures. Values below 1e-20
/// are replaced with zero, well before the IEEE 754 subnormal range begins.
/// Use in filter integrators and other state that decays toward zero.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}
