//! Phasewarp Core - DSP primitives for the phasewarp synthesis engine
//!
//! This crate provides the building blocks shared by the synthesis engine,
//! designed for real-time audio processing with zero allocation in the
//! audio path.
//!
//! # Core Abstractions
//!
//! ## Parameter Store
//!
//! Lock-free named parameters shared between a control thread (writer) and
//! the audio thread (reader):
//!
//! - [`ParameterStore`] - Registry of named `f32` parameters
//! - [`ParamHandle`] - Resolve-once, read-many handle to one parameter
//! - [`ParamDescriptor`] - Range, default and display metadata
//!
//! ## Filters
//!
//! - [`StateVariableFilter`] - TPT state variable filter, safe to modulate per sample
//!
//! ## Modulation
//!
//! - [`Lfo`] - Low-frequency oscillator (4 waveforms)
//!
//! ## Utilities
//!
//! - Pitch conversions: [`midi_to_freq`], [`cents_to_ratio`]
//! - Level conversions: [`db_to_linear`], [`gain_to_db`]
//! - [`flush_denormal`], [`lerp`], [`wrap_phase`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! phasewarp-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use phasewarp_core::{ParameterStore, ParamDescriptor};
//!
//! let store = ParameterStore::with_params([
//!     ParamDescriptor::new("filter_cutoff", "Cutoff", 20.0, 20000.0, 1000.0),
//! ])
//! .unwrap();
//!
//! // Resolve once at construction time...
//! let cutoff = store.handle("filter_cutoff").unwrap();
//!
//! // ...read on every sample without touching the registry again.
//! store.set("filter_cutoff", 2500.0).unwrap();
//! assert_eq!(cutoff.get(), 2500.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod lfo;
pub mod math;
pub mod param;
pub mod svf;

pub use lfo::{Lfo, LfoWaveform};
pub use math::{
    cents_to_ratio, db_to_linear, flush_denormal, gain_to_db, lerp, midi_to_freq, wrap_phase,
};
pub use param::{AtomicParam, ParamDescriptor, ParamError, ParamHandle, ParameterStore};
pub use svf::{MIN_CUTOFF, StateVariableFilter, SvfOutput, SvfResponses};
