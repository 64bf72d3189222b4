//! Phasewarp Analysis - real-time spectrum display for the synth output
//!
//! - [`analyzer`] - Lock-free producer/consumer spectrum analyzer
//! - [`display`] - Log-frequency, decibel display mapping
//! - [`window`] - Window functions applied before the FFT
//!
//! ## Example
//!
//! ```rust
//! use phasewarp_analysis::{AnalyzerSettings, display_levels, spectrum_analyzer};
//!
//! let (mut producer, mut analyzer) = spectrum_analyzer(AnalyzerSettings::default());
//!
//! // Audio thread
//! producer.push_buffer(&vec![0.25; analyzer.fft_size()]);
//!
//! // UI timer
//! analyzer.tick();
//! let levels = display_levels(analyzer.magnitudes(), analyzer.fft_size());
//! assert_eq!(levels.len(), analyzer.fft_size() / 2);
//! ```

pub mod analyzer;
pub mod display;
pub mod window;

pub use analyzer::{
    AnalyzerSettings, DEFAULT_DECAY, DEFAULT_FFT_ORDER, DEFAULT_REFRESH_HZ, MAX_FFT_ORDER,
    MIN_FFT_ORDER, SpectrumAnalyzer, SpectrumProducer, spectrum_analyzer,
};
pub use display::{
    DISPLAY_CEILING_DB, DISPLAY_FLOOR_DB, DisplayLevel, bin_position, display_levels,
    gain_to_decibels, normalize_db,
};
pub use window::Window;
