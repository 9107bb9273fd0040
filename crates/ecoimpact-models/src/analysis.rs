//! End-to-end analysis result for one batch of detections.

use schemars::JsonSchema;
use serde::Serialize;

use crate::{FilterStats, FilteredDetection, ImpactReport, Tally};

/// Result of running a detection batch through the whole pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct DetectionAnalysis {
    /// Detections that survived filtering; the pre-filter count is `filter.total`
    pub total_detected: usize,
    /// Filtering diagnostics
    pub filter: FilterStats,
    /// Detections that survived filtering, in input order
    pub detections: Vec<FilteredDetection>,
    /// Per-category counts, including unclassified labels
    pub tally: Tally,
    /// Impact report; `None` when nothing was left to report
    pub impact: Option<ImpactReport>,
}

impl DetectionAnalysis {
    /// True when the batch produced no report.
    pub fn is_empty(&self) -> bool {
        self.impact.is_none()
    }
}
