//! Shared data models for the EcoImpact pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Raw and filtered detections produced by the vision service
//! - The closed recyclable-material taxonomy and its factor tables
//! - Per-category tallies
//! - Per-material metrics and aggregate impact reports

pub mod analysis;
pub mod detection;
pub mod material;
pub mod report;
pub mod tally;

// Re-export common types
pub use analysis::DetectionAnalysis;
pub use detection::{FilterStats, FilteredDetection, RawDetection};
pub use material::{material_catalog, MaterialCategory, MaterialParseError, MaterialProfile};
pub use report::{ImpactReport, ImpactTotals, MaterialCount, MaterialMetrics};
pub use tally::Tally;
