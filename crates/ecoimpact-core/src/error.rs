//! Error types for the impact pipeline.

use ecoimpact_models::MaterialCategory;
use thiserror::Error;

/// Result type for pipeline operations.
pub type ImpactResult<T> = Result<T, ImpactError>;

/// Rejection of an aggregation batch, naming the first offending pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Unknown material '{material}' at position {index}")]
    UnknownMaterial { index: usize, material: String },

    #[error("Count must be greater than 0 for '{material}' at position {index} (got {count})")]
    NonPositiveCount {
        index: usize,
        material: String,
        count: i64,
    },
}

impl ValidationError {
    /// Position of the offending pair in the batch.
    pub fn index(&self) -> usize {
        match self {
            Self::UnknownMaterial { index, .. } | Self::NonPositiveCount { index, .. } => *index,
        }
    }

    /// Material code of the offending pair, as supplied.
    pub fn material(&self) -> &str {
        match self {
            Self::UnknownMaterial { material, .. } | Self::NonPositiveCount { material, .. } => {
                material
            }
        }
    }
}

/// Errors that can occur while producing an impact report.
#[derive(Debug, Error)]
pub enum ImpactError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unknown material: {0}")]
    UnknownMaterial(String),

    #[error("Count must be greater than 0 for '{material}' (got {count})")]
    NonPositiveCount { material: String, count: i64 },

    #[error("No weight calibration for material: {0}")]
    Uncalibrated(MaterialCategory),

    #[error("Invalid detection payload: {0}")]
    InvalidPayload(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ImpactError {
    /// Create an invalid payload error.
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// True for errors caused by caller input rather than pipeline setup.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::UnknownMaterial(_) | Self::NonPositiveCount { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_pair() {
        let err = ValidationError::UnknownMaterial {
            index: 1,
            material: "plastic_foam".to_string(),
        };
        assert_eq!(err.index(), 1);
        assert_eq!(err.material(), "plastic_foam");
        assert!(err.to_string().contains("plastic_foam"));

        let wrapped: ImpactError = err.into();
        assert!(wrapped.is_validation());
        assert!(wrapped.to_string().contains("plastic_foam"));
    }

    #[test]
    fn test_setup_errors_are_not_validation() {
        assert!(!ImpactError::Uncalibrated(MaterialCategory::GlassBottle).is_validation());
        assert!(!ImpactError::config("bad threshold").is_validation());
    }
}
