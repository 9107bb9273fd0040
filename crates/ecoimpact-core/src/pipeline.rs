//! End-to-end detection analysis.
//!
//! Filter -> Canonicalize + Tally -> {Weight -> Impact} per material ->
//! Aggregate. Every stage is pure; the pipeline holds only read-only
//! configuration and can be shared across threads.

use std::sync::Arc;

use ecoimpact_models::{DetectionAnalysis, RawDetection};
use tracing::{debug, info};

use crate::aggregate::{Aggregator, ImpactOutcome};
use crate::canonicalize::tally_detections;
use crate::config::PipelineConfig;
use crate::error::ImpactResult;
use crate::filter::filter_detections;
use crate::impact::ImpactCalculator;
use crate::weight::WeightEstimator;

/// Detection-to-impact pipeline.
#[derive(Debug, Clone)]
pub struct DetectionPipeline {
    config: PipelineConfig,
    aggregator: Aggregator,
}

impl Default for DetectionPipeline {
    fn default() -> Self {
        Self {
            config: PipelineConfig::default(),
            aggregator: Aggregator::default(),
        }
    }
}

impl DetectionPipeline {
    /// Create a pipeline with the default weight calibration.
    pub fn new(config: PipelineConfig) -> ImpactResult<Self> {
        config.validate()?;
        Ok(Self {
            aggregator: Aggregator::default().with_parallel(config.parallel_aggregation),
            config,
        })
    }

    /// Replace the weight estimator.
    pub fn with_estimator(mut self, estimator: Arc<dyn WeightEstimator>) -> Self {
        self.aggregator = Aggregator::new(ImpactCalculator::new(estimator))
            .with_parallel(self.config.parallel_aggregation);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Run a batch of raw detections through every stage.
    pub fn analyze(&self, detections: &[RawDetection]) -> ImpactResult<DetectionAnalysis> {
        let filtered = filter_detections(detections, &self.config.thresholds);
        let tally = tally_detections(&filtered.detections);

        let pairs = tally.to_pairs();
        debug!(pairs = pairs.len(), "Aggregating tallied materials");

        let impact = match self.aggregator.aggregate(&pairs)? {
            ImpactOutcome::Report(report) => Some(report),
            ImpactOutcome::Empty => {
                info!(
                    total = detections.len(),
                    kept = filtered.stats.kept,
                    unclassified = tally.unclassified,
                    "No recyclable detections to report"
                );
                None
            }
        };

        Ok(DetectionAnalysis {
            total_detected: filtered.detections.len(),
            filter: filtered.stats,
            detections: filtered.detections,
            tally,
            impact,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weight::ProportionalWeightEstimator;

    #[test]
    fn test_analyze_mixed_batch() {
        let detections = vec![
            RawDetection::new("plastic", 0.90, 100.0, 100.0),
            RawDetection::new("Botella Plastico", 0.92, 80.0, 120.0),
            RawDetection::new("lata", 0.99, 60.0, 100.0),
            RawDetection::new("plastic", 0.40, 100.0, 100.0),
            RawDetection::new("can", 0.95, 10.0, 10.0),
            RawDetection::new("cardboard", 0.97, 200.0, 200.0),
        ];

        let analysis = DetectionPipeline::default().analyze(&detections).unwrap();

        assert_eq!(analysis.filter.total, 6);
        assert_eq!(analysis.filter.kept, 4);
        // counted after filtering, unclassified labels included
        assert_eq!(analysis.total_detected, 4);
        assert_eq!(analysis.filter.dropped_by_confidence, 1);
        assert_eq!(analysis.filter.dropped_by_area, 1);
        assert_eq!(analysis.tally.plastic_bottle, 2);
        assert_eq!(analysis.tally.aluminum_can, 1);
        assert_eq!(analysis.tally.unclassified, 1);

        let report = analysis.impact.unwrap();
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].count, 2);
        assert_eq!(report.rows[1].count, 1);
        // 50 g + 15 g
        assert_eq!(report.totals.weight_grams, 65.0);
    }

    #[test]
    fn test_only_unclassified_is_empty() {
        let detections = vec![RawDetection::new("banana", 0.99, 100.0, 100.0)];
        let analysis = DetectionPipeline::default().analyze(&detections).unwrap();

        assert!(analysis.is_empty());
        assert_eq!(analysis.filter.kept, 1);
        assert_eq!(analysis.tally.unclassified, 1);
    }

    #[test]
    fn test_custom_thresholds_and_estimator() {
        let config = PipelineConfig::default()
            .with_confidence_min(0.3)
            .with_area_min(0.0);
        let pipeline = DetectionPipeline::new(config)
            .unwrap()
            .with_estimator(Arc::new(ProportionalWeightEstimator));

        let detections = vec![RawDetection::new("glass", 0.35, 0.0, 0.0)];
        let analysis = pipeline.analyze(&detections).unwrap();

        assert_eq!(analysis.tally.glass_bottle, 1);
        assert_eq!(analysis.impact.unwrap().totals.weight_grams, 250.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = PipelineConfig::default();
        config.thresholds.area_min = -5.0;
        assert!(DetectionPipeline::new(config).is_err());
    }
}
