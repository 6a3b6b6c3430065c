//! TOML configuration for a complete analysis run.
//!
//! ```toml
//! [stress]
//! sigma1 = 120.0
//! sigma2 = 40.0
//! theta_deg = 30.0
//! friction = 0.6
//!
//! [view]
//! flip_x = true
//!
//! [rose]
//! bins = 18
//! dir_bins = 36
//! ```
//!
//! Every table and every key is optional.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::flip::AxisFlip;
use crate::rose::STRESS_ROSE_BINS;
use crate::stress::StressParameters;

/// Default sector count of the simple orientation rose.
pub const ORIENTATION_ROSE_BINS: usize = 18;

/// Rose sector counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoseConfig {
    /// Sectors of the simple orientation rose.
    pub bins: usize,
    /// Sectors of the stress roses.
    pub dir_bins: usize,
}

impl Default for RoseConfig {
    fn default() -> Self {
        Self {
            bins: ORIENTATION_ROSE_BINS,
            dir_bins: STRESS_ROSE_BINS,
        }
    }
}

/// Settings for an analysis run.
///
/// The `[stress]` table holds the stress parameters without their flips; the flips
/// live in `[view]` and are merged in by [`AnalysisConfig::parameters`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Regional stress state and rock properties.
    pub stress: StressParameters,
    /// Viewing flips.
    pub view: AxisFlip,
    /// Rose sector counts.
    pub rose: RoseConfig,
}

impl AnalysisConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and the errors of
    /// [`AnalysisConfig::validate`] for unusable values.
    ///
    /// # Examples
    /// ```
    /// use fracpaq::AnalysisConfig;
    ///
    /// let config = AnalysisConfig::from_toml_str("[stress]\nsigma1 = 80.0\n[view]\nflip_y = true")?;
    /// assert_eq!(config.stress.sigma1, 80.0);
    /// assert_eq!(config.stress.sigma2, 50.0);
    /// assert!(config.parameters().flip.flip_y);
    /// # Ok::<(), fracpaq::ConfigError>(())
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`AnalysisConfig::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check that stress values are finite and that rose sector counts are positive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParameters`] or [`ConfigError::ZeroBins`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.stress.validate()?;
        if self.rose.bins == 0 {
            return Err(ConfigError::ZeroBins { field: "rose.bins" });
        }
        if self.rose.dir_bins == 0 {
            return Err(ConfigError::ZeroBins {
                field: "rose.dir_bins",
            });
        }
        Ok(())
    }

    /// Stress parameters with the configured flips applied.
    #[must_use]
    pub fn parameters(&self) -> StressParameters {
        StressParameters {
            flip: self.view,
            ..self.stress
        }
    }
}
