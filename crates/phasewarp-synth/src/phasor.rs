//! Phase warping for phase-distortion synthesis.
//!
//! The oscillator reads a single sine cycle. Instead of bending the
//! waveform, the [`Phasor`] bends the *phase* that indexes it: a linear ramp
//! is mapped through a breakpoint function that lingers in one half of the
//! cycle and rushes through the other. Blending that shaped phase with the
//! linear one by an envelope- and LFO-driven amount sweeps the timbre from a
//! pure sine toward a saw or square.

use phasewarp_core::{ParamError, ParamHandle, ParameterStore};

use crate::params::ids;
use crate::wavetable::WAVETABLE_SIZE;

/// Target waveform the phase is warped toward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PhasorShape {
    /// Fast first 1 % of the cycle, slow remainder.
    #[default]
    Sawtooth,
    /// Slow around the edges, steep through the middle.
    Square,
}

impl PhasorShape {
    /// Decode the integer-valued shape control.
    ///
    /// Controls 1 and 2 both select `Square`; the control range has three
    /// positions for two shapes and both upper positions are kept.
    pub fn from_control(value: f32) -> Self {
        match value as i32 {
            1 | 2 => Self::Square,
            _ => Self::Sawtooth,
        }
    }

    /// Shaped phase for a normalized input phase `x` in `[0, 1)`.
    #[inline]
    pub fn evaluate(self, x: f32) -> f32 {
        match self {
            Self::Sawtooth => sawtooth(x),
            Self::Square => square(x),
        }
    }
}

/// Sawtooth breakpoint function: `[0, 0.01]` maps onto `[0, 0.5]`, the rest
/// of the cycle onto `(0.5, 1]`.
#[inline]
pub fn sawtooth(x: f32) -> f32 {
    const XB: f32 = 0.01;
    if x <= XB {
        (0.5 / XB) * x
    } else {
        (0.5 / (1.0 - XB)) * (x - XB) + 0.5
    }
}

/// Square breakpoint function, halved.
///
/// Shallow slope up to 0.49, a steep 0.98 rise across `[0.49, 0.51]`, then
/// shallow again. Output spans `[0, 0.5]`.
#[inline]
pub fn square(x: f32) -> f32 {
    const XB1: f32 = 0.49;
    const XB2: f32 = 0.51;
    const B1: f32 = 0.01;
    const B2: f32 = 0.979_591_83;

    let y = if x < XB1 {
        (0.01 / XB1) * x
    } else if x <= XB2 {
        0.98 * (x - XB1) / (XB2 - XB1) + B1
    } else {
        (0.01 / (1.0 - XB2)) * x + B2
    };

    y / 2.0
}

/// Envelope/LFO-controlled phase warper shared by both oscillators of a voice.
///
/// Stateless apart from its parameter handles: shape, envelope intensity and
/// LFO intensity are re-read on every call.
#[derive(Debug, Clone)]
pub struct Phasor {
    shape: ParamHandle,
    eg_intensity: ParamHandle,
    lfo_intensity: ParamHandle,
}

impl Phasor {
    /// Resolve the phasor's parameters.
    pub fn new(store: &ParameterStore) -> Result<Self, ParamError> {
        Ok(Self {
            shape: store.handle(ids::PHASOR_SHAPE)?,
            eg_intensity: store.handle(ids::PHASOR_EG_INTENSITY)?,
            lfo_intensity: store.handle(ids::PHASOR_LFO_INTENSITY)?,
        })
    }

    /// Currently selected shape.
    pub fn shape(&self) -> PhasorShape {
        PhasorShape::from_control(self.shape.get())
    }

    /// Warp `phase` (in table units, `[0, WAVETABLE_SIZE)`) and return the
    /// new phase in the same units.
    ///
    /// `eg_mod` comes from the phase envelope, `lfo_mod` from the LFO. The
    /// blend amount is not clamped, so the result may leave the table range
    /// and the caller must wrap it.
    #[inline]
    pub fn apply(&self, phase: f32, eg_mod: f32, lfo_mod: f32) -> f32 {
        const N: f32 = WAVETABLE_SIZE as f32;

        let eg_int = self.eg_intensity.get();
        let lfo_int = self.lfo_intensity.get();

        let envelope = eg_int * eg_mod * (1.0 - 0.5 * lfo_int);
        let lfo = lfo_int * (0.5 * lfo_mod + 0.5) * (1.0 - 0.5 * eg_int);
        let amount = envelope + lfo;

        let p = phase / N;
        let shaped = self.shape().evaluate(p);

        (shaped * amount + p * (1.0 - amount)) * N
    }
}
