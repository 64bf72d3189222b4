//! Sine wavefolder.

use core::f32::consts::FRAC_PI_2;
use libm::sinf;

/// Sine wavefolder blended with the dry signal.
///
/// At `amount = 0` the input passes unchanged. As the amount rises the
/// signal is driven harder into `sin`, folding peaks back on themselves, and
/// the folded signal is crossfaded in:
///
/// ```text
/// fold = sin(x * (1 + 4 * amount) * pi / 2)
/// y    = x + amount * (fold - x)
/// ```
///
/// Both terms stay in `[-1, 1]` for inputs in `[-1, 1]`, so the output does
/// too.
#[derive(Debug, Clone, Copy, Default)]
pub struct Waveshaper;

impl Waveshaper {
    /// Create a waveshaper.
    pub fn new() -> Self {
        Self
    }

    /// Shape one sample. `amount` is clamped to `[0, 1]`.
    #[inline]
    pub fn process(&self, x: f32, amount: f32) -> f32 {
        let amount = if amount.is_nan() { 0.0 } else { amount.clamp(0.0, 1.0) };
        if amount == 0.0 {
            return x;
        }
        let fold = sinf(x * (1.0 + 4.0 * amount) * FRAC_PI_2);
        x + amount * (fold - x)
    }
}
