//! Errors raised while loading, saving and applying an engine config.

use std::path::PathBuf;

use phasewarp_core::ParamError;
use thiserror::Error;

use crate::validation::ValidationError;

/// Engine config failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("cannot read engine config '{path}': {source}")]
    ReadFile {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file could not be written
    #[error("cannot write engine config '{path}': {source}")]
    WriteFile {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file's parent directory could not be created
    #[error("cannot create config directory '{path}': {source}")]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid engine config TOML
    #[error("malformed engine config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// The config could not be encoded as TOML
    #[error("cannot encode engine config as TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A `[params]` entry names no registered parameter
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// One or more settings are out of range
    #[error("invalid engine config: {0}")]
    Validation(#[from] ValidationError),

    /// The parameter store rejected an operation
    #[error(transparent)]
    Param(#[from] ParamError),
}

impl ConfigError {
    /// [`ConfigError::ReadFile`] for `path`.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// [`ConfigError::WriteFile`] for `path`.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// [`ConfigError::CreateDir`] for `path`.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}
