// src/error.rs
//! Error types shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used by all fallible operations in this crate.
pub type EcgResult<T> = Result<T, EcgError>;

/// Errors surfaced by preprocessing and augmentation components.
#[derive(Debug, Error)]
pub enum EcgError {
    /// A configuration value was rejected during validation.
    ///
    /// Raised eagerly at construction time; components never run with an
    /// invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A processing stage received input it cannot operate on.
    #[error("processing error: {0}")]
    Processing(String),

    /// A configuration file could not be read from disk.
    #[error("failed to read config file {path}")]
    ConfigRead {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file was not valid TOML for the expected schema.
    #[error("failed to parse config file {path}")]
    ConfigParse {
        /// Path of the offending file.
        path: PathBuf,
        /// TOML parser diagnostics.
        #[source]
        source: toml::de::Error,
    },
}

impl EcgError {
    /// Build a configuration error from anything stringly.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Build a processing error from anything stringly.
    pub fn processing(msg: impl Into<String>) -> Self {
        Self::Processing(msg.into())
    }

    /// True when the error indicates a rejected configuration.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig(_) | Self::ConfigRead { .. } | Self::ConfigParse { .. }
        )
    }
}

/// Rejects empty input signals before a stage runs.
pub(crate) fn ensure_non_empty(signal: &[f32], stage: &str) -> EcgResult<()> {
    if signal.is_empty() {
        return Err(EcgError::processing(format!(
            "{stage}: input signal is empty"
        )));
    }
    Ok(())
}
