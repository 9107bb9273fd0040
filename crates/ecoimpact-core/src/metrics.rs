//! Pipeline metrics.
//!
//! Counters are recorded through the `metrics` facade; they are no-ops
//! until the embedding service installs a recorder.

use metrics::counter;

/// Metric names as constants for consistency.
pub mod names {
    pub const DETECTIONS_TOTAL: &str = "ecoimpact_detections_total";
    pub const DETECTIONS_DROPPED_TOTAL: &str = "ecoimpact_detections_dropped_total";
    pub const UNCLASSIFIED_LABELS_TOTAL: &str = "ecoimpact_unclassified_labels_total";
    pub const REPORTS_TOTAL: &str = "ecoimpact_reports_total";
    pub const EMPTY_RESULTS_TOTAL: &str = "ecoimpact_empty_results_total";
    pub const VALIDATION_FAILURES_TOTAL: &str = "ecoimpact_validation_failures_total";
    pub const ECO_POINTS_TOTAL: &str = "ecoimpact_eco_points_total";
}

/// Record one filtering pass.
pub fn record_filter_pass(total: usize, dropped_by_confidence: usize, dropped_by_area: usize) {
    counter!(names::DETECTIONS_TOTAL).increment(total as u64);
    counter!(names::DETECTIONS_DROPPED_TOTAL, "reason" => "confidence")
        .increment(dropped_by_confidence as u64);
    counter!(names::DETECTIONS_DROPPED_TOTAL, "reason" => "area")
        .increment(dropped_by_area as u64);
}

/// Record labels that matched no synonym.
pub fn record_unclassified(count: u32) {
    if count > 0 {
        counter!(names::UNCLASSIFIED_LABELS_TOTAL).increment(u64::from(count));
    }
}

/// Record a completed report.
pub fn record_report(eco_points: u64) {
    counter!(names::REPORTS_TOTAL).increment(1);
    counter!(names::ECO_POINTS_TOTAL).increment(eco_points);
}

/// Record a batch with nothing to report.
pub fn record_empty_result() {
    counter!(names::EMPTY_RESULTS_TOTAL).increment(1);
}

/// Record a rejected aggregation batch.
pub fn record_validation_failure() {
    counter!(names::VALIDATION_FAILURES_TOTAL).increment(1);
}
