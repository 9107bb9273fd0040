//! Mass estimation from item counts.
//!
//! Weight estimation sits behind the [`WeightEstimator`] trait so a
//! different calibration (non-linear, noise-fitted) can replace the current
//! one without touching the impact calculator.
//!
//! The default estimator fits an ordinary least-squares line per material
//! over calibration samples taken at counts 1, 2, 5, 10, 20, 50 and 100.
//! With the current samples (exact multiples of the unit weight) the fit is
//! `count * unit_weight` with a zero intercept.

use std::collections::HashMap;

use ecoimpact_models::MaterialCategory;

use crate::error::{ImpactError, ImpactResult};
use crate::rounding::{round_to, WEIGHT_PLACES};

/// Counts at which calibration samples are taken.
pub const CALIBRATION_COUNTS: &[u32] = &[1, 2, 5, 10, 20, 50, 100];

/// Converts an item count into an estimated mass in grams.
pub trait WeightEstimator: Send + Sync {
    /// Estimated mass in grams, rounded to 2 decimal places.
    ///
    /// `count` must be greater than 0.
    fn estimate(&self, material: MaterialCategory, count: u64) -> ImpactResult<f64>;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}

/// A fitted line `grams = slope * count + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Ordinary least-squares fit over `(count, grams)` samples.
    ///
    /// Returns `None` for fewer than two distinct counts.
    pub fn fit(samples: &[(f64, f64)]) -> Option<Self> {
        let n = samples.len() as f64;
        if samples.len() < 2 {
            return None;
        }

        let sum_x: f64 = samples.iter().map(|(x, _)| x).sum();
        let sum_y: f64 = samples.iter().map(|(_, y)| y).sum();
        let sum_xy: f64 = samples.iter().map(|(x, y)| x * y).sum();
        let sum_xx: f64 = samples.iter().map(|(x, _)| x * x).sum();

        let denominator = n * sum_xx - sum_x * sum_x;
        if denominator == 0.0 {
            return None;
        }

        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;
        Some(Self { slope, intercept })
    }

    pub fn predict(&self, count: f64) -> f64 {
        self.slope * count + self.intercept
    }
}

/// Per-material linear calibration.
#[derive(Debug, Clone)]
pub struct CalibratedWeightEstimator {
    fits: HashMap<MaterialCategory, LinearFit>,
}

impl CalibratedWeightEstimator {
    /// Fit every material in the taxonomy against its unit weight.
    pub fn from_unit_weights() -> Self {
        let fits = MaterialCategory::ALL
            .iter()
            .filter_map(|material| {
                let unit = material.unit_weight_grams();
                let samples: Vec<(f64, f64)> = CALIBRATION_COUNTS
                    .iter()
                    .map(|c| (f64::from(*c), f64::from(*c) * unit))
                    .collect();
                LinearFit::fit(&samples).map(|fit| (*material, fit))
            })
            .collect();

        Self { fits }
    }

    /// Build from explicit fits; materials without a fit are uncalibrated.
    pub fn with_fits(fits: impl IntoIterator<Item = (MaterialCategory, LinearFit)>) -> Self {
        Self {
            fits: fits.into_iter().collect(),
        }
    }

    pub fn fit_for(&self, material: MaterialCategory) -> Option<&LinearFit> {
        self.fits.get(&material)
    }
}

impl Default for CalibratedWeightEstimator {
    fn default() -> Self {
        Self::from_unit_weights()
    }
}

impl WeightEstimator for CalibratedWeightEstimator {
    fn estimate(&self, material: MaterialCategory, count: u64) -> ImpactResult<f64> {
        if count == 0 {
            return Err(ImpactError::NonPositiveCount {
                material: material.to_string(),
                count: 0,
            });
        }
        let fit = self
            .fits
            .get(&material)
            .ok_or(ImpactError::Uncalibrated(material))?;

        Ok(round_to(fit.predict(count as f64), WEIGHT_PLACES))
    }

    fn name(&self) -> &'static str {
        "calibrated_linear"
    }
}

/// Direct `count * unit_weight`; behaviorally identical to the calibrated
/// estimator with the current calibration data.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProportionalWeightEstimator;

impl WeightEstimator for ProportionalWeightEstimator {
    fn estimate(&self, material: MaterialCategory, count: u64) -> ImpactResult<f64> {
        if count == 0 {
            return Err(ImpactError::NonPositiveCount {
                material: material.to_string(),
                count: 0,
            });
        }
        Ok(round_to(
            count as f64 * material.unit_weight_grams(),
            WEIGHT_PLACES,
        ))
    }

    fn name(&self) -> &'static str {
        "proportional"
    }
}

/// Estimate weight for a raw material code and signed count.
pub fn estimate_weight(
    estimator: &dyn WeightEstimator,
    material: &str,
    count: i64,
) -> ImpactResult<f64> {
    let category: MaterialCategory = material
        .parse()
        .map_err(|_| ImpactError::UnknownMaterial(material.to_string()))?;
    let count = u64::try_from(count)
        .ok()
        .filter(|c| *c > 0)
        .ok_or_else(|| ImpactError::NonPositiveCount {
            material: material.to_string(),
            count,
        })?;

    estimator.estimate(category, count)
}
