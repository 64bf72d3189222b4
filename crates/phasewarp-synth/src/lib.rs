//! Phasewarp Synth - phase-warping synthesis voice
//!
//! A subtractive/phase-distortion synth voice that turns a note and a set of
//! parameters into audio, one sample at a time, without allocating on the
//! audio path.
//!
//! # Core Components
//!
//! ## Oscillator
//!
//! - [`Wavetable`] - One sine cycle, shared between oscillators
//! - [`Phasor`] - Warps the oscillator phase toward a saw or square shape
//! - [`Waveshaper`] - Sine wavefolder on the oscillator output
//! - [`Oscillator`] - All three together, pitched from MIDI note + tuning
//!
//! ## Envelopes
//!
//! - [`AdsrEnvelope`] - Linear ADSR model
//! - [`EnvelopeGenerator`] - Parameter-driven, smoothed ADSR for one [`EnvelopeRole`]
//!
//! ## Filter and Modulation
//!
//! - [`ModulatedFilter`] - SVF whose cutoff follows the filter envelope per sample
//! - [`VoiceLfo`] - Parameter-driven LFO
//!
//! ## Voice and Output
//!
//! - [`Voice`] / [`SynthVoice`] - The complete voice and its host interface
//! - [`Amplifier`] - Ramped master gain after the voice mix
//!
//! ## Parameters
//!
//! [`create_store`] builds a store holding every control listed by
//! [`parameter_layout`]; ids live in [`ids`].
//!
//! # Example
//!
//! ```rust
//! use phasewarp_synth::{Amplifier, SynthVoice, Voice, create_store, ids};
//!
//! let store = create_store().unwrap();
//! store.set(ids::FILTER_CUTOFF, 3000.0).unwrap();
//!
//! let mut voice = Voice::new(&store, 48000.0).unwrap();
//! let mut amp = Amplifier::new(&store).unwrap();
//!
//! voice.start_note(60, 1.0);
//! let mut block = vec![0.0f32; 512];
//! voice.render_next_block(&mut block, 0, 512);
//! amp.process_block(&mut block);
//!
//! assert!(block.iter().all(|s| s.is_finite()));
//! ```
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! phasewarp-synth = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod amplifier;
pub mod envelope;
pub mod filter;
pub mod lfo;
pub mod oscillator;
pub mod params;
pub mod phasor;
pub mod voice;
pub mod waveshaper;
pub mod wavetable;

pub use amplifier::Amplifier;
pub use envelope::{
    AdsrEnvelope, AdsrParameters, EnvelopeGenerator, EnvelopeRole, EnvelopeState, sustain_gain,
};
pub use filter::{
    CUTOFF_LOWER_BOUND, CUTOFF_MODULATION_MULTIPLIER, CUTOFF_UPPER_BOUND, FilterMode,
    ModulatedFilter,
};
pub use lfo::VoiceLfo;
pub use oscillator::{Oscillator, OscillatorSlot};
pub use params::{create_store, ids, parameter_layout};
pub use phasor::{Phasor, PhasorShape};
pub use voice::{DEFAULT_NOTE, SynthVoice, Voice};
pub use waveshaper::Waveshaper;
pub use wavetable::{WAVETABLE_SIZE, Wavetable};

// Re-export the core types callers need alongside the voice
pub use phasewarp_core::{ParamDescriptor, ParamError, ParamHandle, ParameterStore};
