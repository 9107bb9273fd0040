//! Detection-to-impact pipeline.
//!
//! This crate turns object-detection results from an external vision
//! service into an environmental-impact report:
//! - Noise filtering by confidence and bounding-box area
//! - Fuzzy canonicalization of labels onto the material taxonomy
//! - Per-category tallies
//! - Pluggable weight estimation
//! - CO2, energy and eco-point metrics
//! - Order-preserving batch aggregation
//!
//! Every stage is pure and synchronous. The crate performs no I/O; the only
//! shared state is the constant factor and synonym tables.

pub mod aggregate;
pub mod canonicalize;
pub mod config;
pub mod error;
pub mod filter;
pub mod impact;
pub mod metrics;
pub mod pipeline;
pub mod rounding;
pub mod weight;
pub mod workflow;

pub use aggregate::{validate_pairs, Aggregator, ImpactOutcome};
pub use canonicalize::{canonicalize, normalize_label, tally_detections, CanonicalLabel, SYNONYM_RULES};
pub use config::PipelineConfig;
pub use error::{ImpactError, ImpactResult, ValidationError};
pub use filter::{filter_detections, FilterOutcome, FilterThresholds};
pub use impact::{co2_avoided_kg, eco_points, energy_saved_kwh, ImpactCalculator};
pub use pipeline::DetectionPipeline;
pub use weight::{
    estimate_weight, CalibratedWeightEstimator, LinearFit, ProportionalWeightEstimator,
    WeightEstimator,
};
pub use workflow::{extract_detections, extract_detections_from_str};

pub use ecoimpact_models as models;
