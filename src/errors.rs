//! Error types produced while loading trace maps or configuring an analysis.

use std::path::PathBuf;

use thiserror::Error;

/// Error returned when stress parameters or segment coordinates cannot be projected.
///
/// Only non-finite values are rejected. Physically odd but finite values (negative
/// friction, `sigma2 > sigma1`, negative cohesion) are computed through unchanged.
///
/// # Examples
///
/// ```
/// use fracpaq::{ParameterError, StressParameters};
///
/// let params = StressParameters {
///     sigma1: f64::NAN,
///     ..StressParameters::default()
/// };
/// let error = params.validate().expect_err("NaN is rejected");
/// assert!(matches!(error, ParameterError::NonFiniteParameter { name: "sigma1", .. }));
/// ```
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ParameterError {
    /// Returned when a stress parameter is NaN or infinite.
    #[error("stress parameter `{name}` must be finite (received {value})")]
    NonFiniteParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Returned when a segment has a NaN or infinite endpoint coordinate.
    #[error("segment {index} has a non-finite endpoint coordinate")]
    NonFiniteSegment {
        /// Position of the segment in the input sequence.
        index: usize,
    },
}

/// Error returned when a trace file cannot be read.
///
/// Malformed lines inside a readable file are skipped by the parser and never
/// surface here.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Returned when the file cannot be opened or read.
    #[error("failed to read trace file {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Error returned when a rose scalar name is not recognised.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown rose scalar `{0}` (expected count, slip-tendency, dilation-tendency, susceptibility or csf)")]
pub struct ParseScalarError(
    /// The rejected name.
    pub String,
);

/// Error returned when an analysis configuration file is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Returned when the configuration file cannot be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// Returned when the TOML document is malformed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// Returned when a stress parameter in the file is not finite.
    #[error("invalid stress parameters: {0}")]
    InvalidParameters(#[from] ParameterError),
    /// Returned when a rose bin count is zero.
    #[error("`{field}` must be at least 1")]
    ZeroBins {
        /// Name of the offending field.
        field: &'static str,
    },
}
