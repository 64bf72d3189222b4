//! Engine configuration validation.
//!
//! Checks engine settings against their supported ranges and `[params]`
//! entries against the synth's parameter layout. Every problem is
//! collected; a single one is reported as itself, several as
//! [`ValidationError::Multiple`].

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use phasewarp_analysis::{MAX_FFT_ORDER, MIN_FFT_ORDER, Window};
use phasewarp_synth::parameter_layout;
use thiserror::Error;

use crate::engine_config::EngineConfig;

/// Supported sample rates in Hz.
pub const SAMPLE_RATE_RANGE: RangeInclusive<f32> = 8_000.0..=384_000.0;
/// Supported block sizes in samples.
pub const BLOCK_SIZE_RANGE: RangeInclusive<usize> = 1..=8192;
/// Supported analyzer refresh rates in Hz.
pub const REFRESH_HZ_RANGE: RangeInclusive<f32> = 1.0..=240.0;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Setting outside its supported range.
    #[error("'{field}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Dotted name of the setting.
        field: String,
        /// The value that was out of range.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// `analyzer.window` names no window function.
    #[error("unknown window '{0}'")]
    UnknownWindow(String),

    /// Unknown parameter id in `[params]`.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// Parameter value outside its descriptor range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    ParamOutOfRange {
        /// Parameter id.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn check_range<T>(errors: &mut Vec<ValidationError>, field: &str, value: T, range: &RangeInclusive<T>)
where
    T: PartialOrd + Copy + Into<f64>,
{
    if !range.contains(&value) {
        errors.push(ValidationError::OutOfRange {
            field: field.to_string(),
            value: value.into(),
            min: (*range.start()).into(),
            max: (*range.end()).into(),
        });
    }
}

fn collect(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

/// Check `[params]` entries against the parameter layout.
pub fn validate_params(params: &BTreeMap<String, f32>) -> ValidationResult<()> {
    let mut errors = Vec::new();
    param_errors(params, &mut errors);
    collect(errors)
}

fn param_errors(params: &BTreeMap<String, f32>, errors: &mut Vec<ValidationError>) {
    for (id, &value) in params {
        match parameter_layout().find(|d| d.id == id.as_str()) {
            None => errors.push(ValidationError::UnknownParameter(id.clone())),
            Some(d) if !value.is_finite() || value < d.min || value > d.max => {
                errors.push(ValidationError::ParamOutOfRange {
                    param: id.clone(),
                    value,
                    min: d.min,
                    max: d.max,
                });
            }
            Some(_) => {}
        }
    }
}

/// Check every setting of `config`.
pub fn validate_config(config: &EngineConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    check_range(&mut errors, "sample_rate", config.sample_rate, &SAMPLE_RATE_RANGE);
    let block_size = config.block_size;
    if !BLOCK_SIZE_RANGE.contains(&block_size) {
        errors.push(ValidationError::OutOfRange {
            field: "block_size".to_string(),
            value: block_size as f64,
            min: *BLOCK_SIZE_RANGE.start() as f64,
            max: *BLOCK_SIZE_RANGE.end() as f64,
        });
    }
    check_range(
        &mut errors,
        "analyzer.fft_order",
        config.analyzer.fft_order,
        &(MIN_FFT_ORDER..=MAX_FFT_ORDER),
    );
    check_range(
        &mut errors,
        "analyzer.refresh_hz",
        config.analyzer.refresh_hz,
        &REFRESH_HZ_RANGE,
    );
    // strictly inside (0, 1)
    let decay = config.analyzer.decay;
    if !(decay > 0.0 && decay < 1.0) {
        errors.push(ValidationError::OutOfRange {
            field: "analyzer.decay".to_string(),
            value: f64::from(decay),
            min: 0.0,
            max: 1.0,
        });
    }

    if Window::from_name(&config.analyzer.window).is_none() {
        errors.push(ValidationError::UnknownWindow(config.analyzer.window.clone()));
    }

    param_errors(&config.params, &mut errors);
    collect(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&EngineConfig::default()), Ok(()));
    }

    #[test]
    fn test_single_error_reported_directly() {
        let config = EngineConfig {
            sample_rate: 1000.0,
            ..EngineConfig::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { ref field, .. } if field == "sample_rate"));
    }

    #[test]
    fn test_multiple_errors_collected() {
        let mut config = EngineConfig {
            block_size: 0,
            ..EngineConfig::default()
        };
        config.analyzer.fft_order = 20;
        config.analyzer.decay = 1.0;
        match validate_config(&config).unwrap_err() {
            ValidationError::Multiple(errors) => assert_eq!(errors.len(), 3),
            other => panic!("expected Multiple, got {other:?}"),
        }
    }

    #[test]
    fn test_nan_sample_rate_rejected() {
        let config = EngineConfig {
            sample_rate: f32::NAN,
            ..EngineConfig::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_decay_bounds_exclusive() {
        for decay in [0.0, 1.0, -0.5, f32::NAN] {
            let mut config = EngineConfig::default();
            config.analyzer.decay = decay;
            assert!(validate_config(&config).is_err(), "decay {decay}");
        }
    }

    #[test]
    fn test_unknown_window_rejected() {
        let mut config = EngineConfig::default();
        config.analyzer.window = "kaiser".to_string();
        assert_eq!(
            validate_config(&config),
            Err(ValidationError::UnknownWindow("kaiser".to_string()))
        );

        config.analyzer.window = "Blackman-Harris".to_string();
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_params_checked_against_layout() {
        let mut params = BTreeMap::new();
        params.insert("filter_cutoff".to_string(), 800.0);
        assert_eq!(validate_params(&params), Ok(()));

        params.insert("filter_cutof".to_string(), 800.0);
        assert_eq!(
            validate_params(&params),
            Err(ValidationError::UnknownParameter("filter_cutof".to_string()))
        );
    }

    #[test]
    fn test_param_out_of_range() {
        let mut params = BTreeMap::new();
        params.insert("osc_mix".to_string(), 1.5);
        let err = validate_params(&params).unwrap_err();
        assert_eq!(
            err.to_string(),
            "parameter 'osc_mix' value 1.5 out of range [0, 1]"
        );
    }

    #[test]
    fn test_multiple_display() {
        let err = ValidationError::Multiple(vec![
            ValidationError::UnknownParameter("a".to_string()),
            ValidationError::UnknownParameter("b".to_string()),
        ]);
        assert_eq!(
            err.to_string(),
            "multiple validation errors: unknown parameter 'a'; unknown parameter 'b'"
        );
    }
}
