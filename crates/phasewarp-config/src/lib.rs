//! Engine configuration for phasewarp.
//!
//! Loads the settings an offline render or analysis run needs from TOML:
//! sample rate, block size, spectrum analyzer settings and parameter
//! overrides applied on top of the synth's parameter layout.
//!
//! # Example
//!
//! ```rust
//! use phasewarp_config::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str(
//!     r"
//!     sample_rate = 44100.0
//!
//!     [params]
//!     filter_cutoff = 1200.0
//!     ",
//! )
//! .unwrap();
//! config.validate().unwrap();
//!
//! let store = config.build_store().unwrap();
//! assert_eq!(store.get("filter_cutoff"), Some(1200.0));
//! ```

mod engine_config;
mod error;

/// Range checks for engine settings and parameter overrides.
pub mod validation;

pub use engine_config::{AnalyzerConfig, EngineConfig};
pub use error::ConfigError;
pub use validation::{ValidationError, ValidationResult, validate_config, validate_params};
