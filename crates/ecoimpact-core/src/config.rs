//! Pipeline configuration.

use crate::error::ImpactResult;
use crate::filter::{FilterThresholds, DEFAULT_AREA_MIN, DEFAULT_CONFIDENCE_MIN};

/// Pipeline configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    /// Detection filter thresholds
    pub thresholds: FilterThresholds,
    /// Compute per-material rows on the rayon pool
    pub parallel_aggregation: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            thresholds: FilterThresholds::default(),
            parallel_aggregation: true,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    ///
    /// Unset or unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self {
            thresholds: FilterThresholds {
                confidence_min: std::env::var("ECOIMPACT_CONFIDENCE_MIN")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_CONFIDENCE_MIN),
                area_min: std::env::var("ECOIMPACT_AREA_MIN")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_AREA_MIN),
            },
            parallel_aggregation: std::env::var("ECOIMPACT_PARALLEL_AGGREGATION")
                .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "no" | "off"))
                .unwrap_or(true),
        }
    }

    /// Builder-style setter for the confidence threshold (clamped to [0, 1]).
    pub fn with_confidence_min(mut self, confidence_min: f64) -> Self {
        self.thresholds = self.thresholds.with_confidence_min(confidence_min);
        self
    }

    /// Builder-style setter for the area threshold (clamped to >= 0).
    pub fn with_area_min(mut self, area_min: f64) -> Self {
        self.thresholds = self.thresholds.with_area_min(area_min);
        self
    }

    /// Builder-style setter for parallel aggregation.
    pub fn with_parallel_aggregation(mut self, enabled: bool) -> Self {
        self.parallel_aggregation = enabled;
        self
    }

    pub fn validate(&self) -> ImpactResult<()> {
        self.thresholds.validate()
    }
}
