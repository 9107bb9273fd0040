//! Noise filtering of raw detections.
//!
//! A detection is kept iff `confidence >= confidence_min` AND
//! `width * height >= area_min`. Missing values arrive as 0 and therefore
//! fail. The pass is order-preserving and monotonic in both thresholds.

use ecoimpact_models::{FilterStats, FilteredDetection, RawDetection};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ImpactError, ImpactResult};
use crate::metrics;

/// Default minimum detector confidence.
pub const DEFAULT_CONFIDENCE_MIN: f64 = 0.85;
/// Default minimum bounding-box area, in square pixels.
pub const DEFAULT_AREA_MIN: f64 = 5000.0;

/// Thresholds for [`filter_detections`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterThresholds {
    /// Minimum confidence (0.0-1.0)
    pub confidence_min: f64,
    /// Minimum area (width x height)
    pub area_min: f64,
}

impl Default for FilterThresholds {
    fn default() -> Self {
        Self {
            confidence_min: DEFAULT_CONFIDENCE_MIN,
            area_min: DEFAULT_AREA_MIN,
        }
    }
}

impl FilterThresholds {
    /// Create validated thresholds.
    pub fn new(confidence_min: f64, area_min: f64) -> ImpactResult<Self> {
        let thresholds = Self {
            confidence_min,
            area_min,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Reject NaN, confidence outside [0, 1] and negative areas.
    pub fn validate(&self) -> ImpactResult<()> {
        if !(0.0..=1.0).contains(&self.confidence_min) {
            return Err(ImpactError::config(format!(
                "confidence_min must be within [0, 1] (got {})",
                self.confidence_min
            )));
        }
        if self.area_min.is_nan() || self.area_min < 0.0 {
            return Err(ImpactError::config(format!(
                "area_min must be non-negative (got {})",
                self.area_min
            )));
        }
        Ok(())
    }

    /// Builder-style setter for the confidence threshold.
    pub fn with_confidence_min(mut self, confidence_min: f64) -> Self {
        self.confidence_min = confidence_min.clamp(0.0, 1.0);
        self
    }

    /// Builder-style setter for the area threshold.
    pub fn with_area_min(mut self, area_min: f64) -> Self {
        self.area_min = area_min.max(0.0);
        self
    }

    /// Whether a single detection passes both thresholds.
    pub fn accepts(&self, detection: &RawDetection) -> bool {
        detection.confidence >= self.confidence_min && detection.area() >= self.area_min
    }
}

/// Output of a filtering pass: surviving detections plus diagnostics.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub detections: Vec<FilteredDetection>,
    pub stats: FilterStats,
}

/// Filter detections, keeping input order.
pub fn filter_detections(
    detections: &[RawDetection],
    thresholds: &FilterThresholds,
) -> FilterOutcome {
    let mut stats = FilterStats {
        total: detections.len(),
        ..Default::default()
    };
    let mut kept = Vec::with_capacity(detections.len());

    for detection in detections {
        // NaN comparisons are false, so NaN fields are dropped here as well
        if !(detection.confidence >= thresholds.confidence_min) {
            stats.dropped_by_confidence += 1;
            continue;
        }
        if !(detection.area() >= thresholds.area_min) {
            stats.dropped_by_area += 1;
            continue;
        }
        kept.push(FilteredDetection::accepted(detection.clone()));
    }
    stats.kept = kept.len();

    debug!(
        total = stats.total,
        dropped_by_confidence = stats.dropped_by_confidence,
        dropped_by_area = stats.dropped_by_area,
        kept = stats.kept,
        "Detections filtered"
    );
    metrics::record_filter_pass(stats.total, stats.dropped_by_confidence, stats.dropped_by_area);

    FilterOutcome {
        detections: kept,
        stats,
    }
}
