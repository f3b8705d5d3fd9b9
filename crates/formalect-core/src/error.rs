//! Error types for formalect-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised by the transformation pipeline.
///
/// `Configuration`, `NotFound` and (under the strict terminology policy)
/// `Format` are fatal and abort a run before any report exists.
/// `Processing` is per-file: the orchestrator records it as a failed
/// outcome and keeps going.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Bad invocation parameters (intensity out of range, malformed glob, ...).
    #[error("configuration error: {message}")]
    Configuration {
        /// What was wrong, including the offending value.
        message: String,
    },

    /// A root directory or input file does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// The missing path.
        path: Utf8PathBuf,
    },

    /// A terminology document could not be parsed.
    #[error("invalid terminology document {path}: {message}")]
    Format {
        /// The terminology document.
        path: Utf8PathBuf,
        /// Parser message or the invalid entry.
        message: String,
    },

    /// A single document could not be transformed.
    #[error("failed to process {path}: {reason}")]
    Processing {
        /// The document that failed.
        path: Utf8PathBuf,
        /// Why it failed.
        reason: String,
    },
}

impl PipelineError {
    /// Shorthand for a [`PipelineError::Configuration`].
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if this error aborts the whole run.
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Processing { .. })
    }
}

/// Result type alias using [`PipelineError`].
pub type PipelineResult<T> = Result<T, PipelineError>;
