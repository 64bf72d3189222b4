//! Single-cycle wavetable with wrapped, interpolated lookup.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::f32::consts::TAU;

use phasewarp_core::wrap_phase;

/// Length of the default table. Must be a power of two.
pub const WAVETABLE_SIZE: usize = 2048;

/// Immutable single-cycle waveform.
///
/// Shared between oscillators behind an `Arc`; lookups never allocate.
#[derive(Debug, Clone)]
pub struct Wavetable {
    samples: Box<[f32]>,
}

impl Wavetable {
    /// One cycle of a sine wave, [`WAVETABLE_SIZE`] samples long.
    pub fn sine() -> Self {
        let samples: Vec<f32> = (0..WAVETABLE_SIZE)
            .map(|i| libm::sinf(TAU * i as f32 / WAVETABLE_SIZE as f32))
            .collect();
        Self {
            samples: samples.into_boxed_slice(),
        }
    }

    /// Number of samples in one cycle.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`; tables hold at least one sample.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Table length as `f32`, the period of the phase it is indexed with.
    #[inline]
    pub fn period(&self) -> f32 {
        self.samples.len() as f32
    }

    /// Sample at fractional `index` with linear interpolation.
    ///
    /// The index is wrapped into the table first, so any finite value is a
    /// valid lookup. Interpolation between the last and first sample crosses
    /// the cycle boundary.
    #[inline]
    pub fn lookup(&self, index: f32) -> f32 {
        let len = self.samples.len();
        let wrapped = wrap_phase(index, self.period());
        let i0 = (wrapped as usize).min(len - 1);
        let i1 = (i0 + 1) & (len - 1);
        let frac = wrapped - i0 as f32;

        let a = self.samples[i0];
        let b = self.samples[i1];
        a + (b - a) * frac
    }
}

impl Default for Wavetable {
    fn default() -> Self {
        Self::sine()
    }
}
