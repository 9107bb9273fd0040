//! Detection records produced by the external vision service.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// One detected object, as reported by the vision service.
///
/// Coordinates are in pixels; `x`/`y` are the box center. Missing numeric
/// fields deserialize as 0 so that incomplete records fail filtering rather
/// than parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawDetection {
    /// Class label as emitted by the detector (free-form)
    #[serde(alias = "class", default)]
    pub label: String,
    /// Detector confidence (0.0 to 1.0)
    #[serde(default)]
    pub confidence: f64,
    /// Box center X
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Box center Y
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Box width
    #[serde(default)]
    pub width: f64,
    /// Box height
    #[serde(default)]
    pub height: f64,
    /// Detector-assigned identifier
    #[serde(alias = "detection_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl RawDetection {
    /// Create a detection with a label, confidence and box size.
    pub fn new(label: impl Into<String>, confidence: f64, width: f64, height: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
            x: None,
            y: None,
            width,
            height,
            id: None,
        }
    }

    /// Builder-style setter for the box center.
    pub fn with_center(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Builder-style setter for the detector identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Bounding-box area (width x height).
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// A detection that passed both the confidence and the area threshold.
///
/// The wrapped record is unchanged; the type only records that it survived.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct FilteredDetection(RawDetection);

impl FilteredDetection {
    /// Mark a record as having passed filtering.
    pub fn accepted(detection: RawDetection) -> Self {
        Self(detection)
    }

    /// Unwrap into the underlying record.
    pub fn into_inner(self) -> RawDetection {
        self.0
    }
}

impl Deref for FilteredDetection {
    type Target = RawDetection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Counters describing one filtering pass.
///
/// A detection failing both thresholds is counted under confidence only,
/// so `dropped_by_confidence + dropped_by_area + kept == total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FilterStats {
    pub total: usize,
    pub dropped_by_confidence: usize,
    pub dropped_by_area: usize,
    pub kept: usize,
}
