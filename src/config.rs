//! Resolver configuration.

use crate::error::{CatalogError, ValidationError};

/// Environment variable read by [`ResolverConfig::from_env`].
pub const THRESHOLD_ENV: &str = "RESOLVE_THRESHOLD";

/// Immutable resolver settings, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverConfig {
    threshold: f64,
}

impl ResolverConfig {
    /// Default minimum confidence for accepting a fuzzy match.
    pub const DEFAULT_THRESHOLD: f64 = 0.8;

    /// Creates a config with the given threshold.
    ///
    /// # Errors
    ///
    /// [`ValidationError::ThresholdOutOfRange`] unless `threshold` is finite
    /// and within `[0.0, 1.0]`.
    pub fn new(threshold: f64) -> Result<Self, ValidationError> {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(ValidationError::ThresholdOutOfRange { value: threshold });
        }
        Ok(Self { threshold })
    }

    /// Reads the threshold from `RESOLVE_THRESHOLD`, falling back to the
    /// default when the variable is unset.
    ///
    /// # Errors
    ///
    /// `Config` if the value does not parse, `Validation` if it is out of range.
    pub fn from_env() -> Result<Self, CatalogError> {
        match std::env::var(THRESHOLD_ENV) {
            Ok(raw) => Self::parse(&raw),
            Err(std::env::VarError::NotPresent) => Ok(Self::default()),
            Err(err) => Err(CatalogError::config(format!("{THRESHOLD_ENV}: {err}"))),
        }
    }

    /// Parses a threshold given as text.
    ///
    /// # Errors
    ///
    /// Same as [`ResolverConfig::from_env`].
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|e| CatalogError::config(format!("invalid {THRESHOLD_ENV} {raw:?}: {e}")))?;
        Ok(Self::new(value)?)
    }

    /// Minimum confidence for accepting a fuzzy match.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }
}
