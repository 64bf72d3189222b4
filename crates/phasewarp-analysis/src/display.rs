//! Mapping analyzer magnitudes to normalized display coordinates.
//!
//! Bins are spread on a log-like frequency axis,
//! `x = log10(1 + 39 * (i + 1) / bins) / log10(40)`, and levels are
//! normalized by `max(fft_size, peak)` then mapped from
//! [`DISPLAY_FLOOR_DB`]..[`DISPLAY_CEILING_DB`] onto `[0, 1]`.

use phasewarp_core::gain_to_db;

/// Level shown at the bottom of the display.
pub const DISPLAY_FLOOR_DB: f32 = -90.0;
/// Level shown at the top of the display.
pub const DISPLAY_CEILING_DB: f32 = -15.0;
/// Decibel value reported for silence.
pub const MINUS_INFINITY_DB: f32 = -100.0;

/// One bin in display coordinates, both axes in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayLevel {
    /// Horizontal position.
    pub x: f32,
    /// Vertical level, 0 at the floor and 1 at the ceiling.
    pub level: f32,
}

/// Convert linear gain to decibels, reporting anything at or below
/// [`MINUS_INFINITY_DB`] as exactly that.
pub fn gain_to_decibels(gain: f32) -> f32 {
    if gain > 0.0 {
        gain_to_db(gain).max(MINUS_INFINITY_DB)
    } else {
        MINUS_INFINITY_DB
    }
}

/// Horizontal position of bin `index` out of `bins`.
pub fn bin_position(index: usize, bins: usize) -> f32 {
    if bins == 0 {
        return 0.0;
    }
    let t = (index as f32 + 1.0) / bins as f32;
    (1.0 + 39.0 * t).log10() / 40.0f32.log10()
}

/// Map a level in decibels onto `[0, 1]`.
pub fn normalize_db(db: f32) -> f32 {
    ((db - DISPLAY_FLOOR_DB) / (DISPLAY_CEILING_DB - DISPLAY_FLOOR_DB)).clamp(0.0, 1.0)
}

/// Display coordinates for every bin of `magnitudes`.
pub fn display_levels(magnitudes: &[f32], fft_size: usize) -> Vec<DisplayLevel> {
    let peak = magnitudes.iter().copied().fold(0.0f32, f32::max);
    let scale = 1.0 / (fft_size as f32).max(peak).max(f32::MIN_POSITIVE);
    let bins = magnitudes.len();

    magnitudes
        .iter()
        .enumerate()
        .map(|(i, &m)| DisplayLevel {
            x: bin_position(i, bins),
            level: normalize_db(gain_to_decibels(m * scale)),
        })
        .collect()
}
