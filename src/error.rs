//! Error types for pantry-canon.
//!
//! All errors are strongly typed using thiserror so callers can match on
//! specific conditions. Mapping them to user-visible responses is left to
//! the request layer.

use thiserror::Error;

use crate::ingredient::IngredientId;
use crate::storage::StorageError;

/// Validation errors raised before any store access.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Ingredient name cannot be empty")]
    EmptyName,

    #[error("Resolve threshold {value} is out of range [0.0, 1.0]")]
    ThresholdOutOfRange {
        value: f64,
    },

    #[error("Cannot merge ingredient {id} into itself")]
    SelfMerge {
        id: IngredientId,
    },

    #[error("Ingredient {id} cannot substitute for itself")]
    SelfSubstitute {
        id: IngredientId,
    },

    #[error("Substitute ratio {value} must be finite and positive")]
    InvalidRatio {
        value: f64,
    },

    #[error("Conversion factor {value} must be finite and positive")]
    InvalidFactor {
        value: f64,
    },

    #[error("Unit cannot be empty")]
    EmptyUnit,

    #[error("Invalid ingredient id: {value}")]
    InvalidId {
        value: String,
    },
}

/// Top-level error type for pantry-canon.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {message}")]
    Config {
        message: String,
    },
}

impl CatalogError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if a referenced ingredient does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Storage(StorageError::IngredientNotFound(_) | StorageError::NameNotFound(_))
        )
    }

    /// Returns true if this error is retryable.
    ///
    /// Interrupted and backend failures roll back cleanly, so a fresh
    /// attempt may succeed. Validation and lookup failures will not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Validation(_) | Self::Config { .. } => false,
            Self::Storage(e) => matches!(
                e,
                StorageError::Cancelled
                    | StorageError::DeadlineExceeded
                    | StorageError::BackendError(_)
            ),
        }
    }
}

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
