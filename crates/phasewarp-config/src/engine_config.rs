//! Engine configuration file format and operations.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use phasewarp_analysis::{
    AnalyzerSettings, DEFAULT_DECAY, DEFAULT_FFT_ORDER, DEFAULT_REFRESH_HZ, SpectrumAnalyzer,
    Window,
};
use phasewarp_core::ParameterStore;
use phasewarp_synth::create_store;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::validation;

/// Settings for rendering and analysing the synth.
///
/// Every field has a default, so an empty file is a valid configuration.
///
/// # TOML Format
///
/// ```toml
/// sample_rate = 48000.0
/// block_size = 512
///
/// [analyzer]
/// fft_order = 11
/// refresh_hz = 30.0
/// decay = 0.7
/// window = "hann"
///
/// [params]
/// filter_cutoff = 2000.0
/// osc_mix = 0.25
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Samples rendered per block.
    pub block_size: usize,
    /// Spectrum analyzer settings.
    pub analyzer: AnalyzerConfig,
    /// Parameter overrides by id, applied on top of the layout defaults.
    pub params: BTreeMap<String, f32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            block_size: 512,
            analyzer: AnalyzerConfig::default(),
            params: BTreeMap::new(),
        }
    }
}

/// `[analyzer]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// FFT length is `2^fft_order`.
    pub fft_order: u32,
    /// Consumer ticks per second.
    pub refresh_hz: f32,
    /// Per-tick decay of the display buffer.
    pub decay: f32,
    /// Window name: `rectangular`, `hann`, `hamming` or `blackman-harris`.
    pub window: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fft_order: DEFAULT_FFT_ORDER,
            refresh_hz: DEFAULT_REFRESH_HZ,
            decay: DEFAULT_DECAY,
            window: Window::default().name().to_string(),
        }
    }
}

impl AnalyzerConfig {
    /// Analyzer construction settings.
    ///
    /// An unknown window name falls back to the default window; `validate`
    /// reports it.
    pub fn settings(&self) -> AnalyzerSettings {
        AnalyzerSettings {
            fft_order: self.fft_order,
            decay: self.decay,
            window: Window::from_name(&self.window).unwrap_or_default(),
            ..AnalyzerSettings::default()
        }
    }

    /// Time between consumer ticks.
    pub fn refresh_interval(&self) -> Duration {
        SpectrumAnalyzer::refresh_interval(self.refresh_hz)
    }
}

impl EngineConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            sample_rate = config.sample_rate,
            block_size = config.block_size,
            params = config.params.len(),
            "loaded engine config"
        );
        Ok(config)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every setting and parameter override.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate_config(self)?;
        Ok(())
    }

    /// Write the `[params]` overrides into `store`.
    ///
    /// Every id is resolved before anything is written, so an unknown id
    /// leaves the store untouched. Values are clamped by the store.
    /// Returns the number of parameters set.
    pub fn apply_params(&self, store: &ParameterStore) -> Result<usize, ConfigError> {
        if let Some(unknown) = self.params.keys().find(|id| store.get(id).is_none()) {
            return Err(ConfigError::UnknownParameter(unknown.clone()));
        }
        for (id, &value) in &self.params {
            store.set(id, value)?;
        }
        Ok(self.params.len())
    }

    /// Build the synth's parameter store with the overrides applied.
    pub fn build_store(&self) -> Result<ParameterStore, ConfigError> {
        let store = create_store()?;
        self.apply_params(&store)?;
        Ok(store)
    }
}
