//! Derived environmental metrics for one `(material, count)` pair.
//!
//! - `co2_kg = round(weight_kg * co2_factor, 3)`
//! - `energy_kwh = round(weight_kg * energy_factor, 3)`
//! - `eco_points = max(base_points * count + floor(weight_grams / 100), count)`

use std::sync::Arc;

use ecoimpact_models::{MaterialCategory, MaterialMetrics};

use crate::error::{ImpactError, ImpactResult};
use crate::rounding::{round_to, FACTOR_PLACES};
use crate::weight::{CalibratedWeightEstimator, WeightEstimator};

/// Grams of material per bonus eco point.
pub const GRAMS_PER_BONUS_POINT: f64 = 100.0;

/// CO2 avoided in kg, 3 decimal places.
pub fn co2_avoided_kg(material: MaterialCategory, weight_grams: f64) -> f64 {
    round_to(
        weight_grams / 1000.0 * material.profile().co2_kg_per_kg,
        FACTOR_PLACES,
    )
}

/// Energy saved in kWh, 3 decimal places.
pub fn energy_saved_kwh(material: MaterialCategory, weight_grams: f64) -> f64 {
    round_to(
        weight_grams / 1000.0 * material.profile().energy_kwh_per_kg,
        FACTOR_PLACES,
    )
}

/// Eco points: base points per unit plus one point per full 100 g, never
/// fewer than one point per unit.
pub fn eco_points(material: MaterialCategory, count: u64, weight_grams: f64) -> u64 {
    let base = material.profile().base_points_per_unit.saturating_mul(count);
    // Truncation toward zero; weights are non-negative and the cast saturates
    let bonus = (weight_grams / GRAMS_PER_BONUS_POINT).max(0.0) as u64;
    base.saturating_add(bonus).max(count)
}

/// Weight estimation plus derived metrics.
#[derive(Clone)]
pub struct ImpactCalculator {
    estimator: Arc<dyn WeightEstimator>,
}

impl std::fmt::Debug for ImpactCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImpactCalculator")
            .field("estimator", &self.estimator.name())
            .finish()
    }
}

impl Default for ImpactCalculator {
    fn default() -> Self {
        Self::new(Arc::new(CalibratedWeightEstimator::default()))
    }
}

impl ImpactCalculator {
    pub fn new(estimator: Arc<dyn WeightEstimator>) -> Self {
        Self { estimator }
    }

    pub fn estimator(&self) -> &dyn WeightEstimator {
        self.estimator.as_ref()
    }

    /// Compute all metrics for one material.
    pub fn process(&self, material: MaterialCategory, count: u64) -> ImpactResult<MaterialMetrics> {
        let weight_grams = self.estimator.estimate(material, count)?;

        Ok(MaterialMetrics {
            material,
            count,
            weight_grams,
            co2_kg: co2_avoided_kg(material, weight_grams),
            energy_kwh: energy_saved_kwh(material, weight_grams),
            eco_points: eco_points(material, count, weight_grams),
        })
    }

    /// Validate a raw code and count, then compute metrics.
    pub fn process_code(&self, material: &str, count: i64) -> ImpactResult<MaterialMetrics> {
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

        self.process(category, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plastic_row() {
        let row = ImpactCalculator::default()
            .process(MaterialCategory::PlasticBottle, 3)
            .unwrap();

        assert_eq!(row.weight_grams, 75.0);
        assert_eq!(row.co2_kg, 0.188);
        assert_eq!(row.energy_kwh, 0.413);
        assert_eq!(row.eco_points, 21);
    }

    #[test]
    fn test_aluminum_row() {
        let row = ImpactCalculator::default()
            .process(MaterialCategory::AluminumCan, 2)
            .unwrap();

        assert_eq!(row.weight_grams, 30.0);
        assert_eq!(row.co2_kg, 0.27);
        assert_eq!(row.energy_kwh, 0.42);
        assert_eq!(row.eco_points, 22);
    }

    #[test]
    fn test_glass_weight_bonus() {
        // 4 bottles = 1000 g: 9*4 + 10 bonus
        let row = ImpactCalculator::default()
            .process(MaterialCategory::GlassBottle, 4)
            .unwrap();

        assert_eq!(row.weight_grams, 1000.0);
        assert_eq!(row.co2_kg, 0.3);
        assert_eq!(row.energy_kwh, 0.4);
        assert_eq!(row.eco_points, 46);
    }

    #[test]
    fn test_bonus_truncates() {
        assert_eq!(eco_points(MaterialCategory::PlasticBottle, 1, 199.99), 8);
        assert_eq!(eco_points(MaterialCategory::PlasticBottle, 1, 99.0), 7);
    }

    #[test]
    fn test_process_code_validation() {
        let calc = ImpactCalculator::default();
        assert!(calc.process_code("aluminum_can", 5).is_ok());
        assert!(matches!(
            calc.process_code("plastic_foam", 1),
            Err(ImpactError::UnknownMaterial(_))
        ));
        assert!(matches!(
            calc.process_code("glass_bottle", 0),
            Err(ImpactError::NonPositiveCount { count: 0, .. })
        ));
    }

    #[test]
    fn test_large_count_processes() {
        let row = ImpactCalculator::default()
            .process_code("plastic_bottle", 5_000_000_000)
            .unwrap();

        assert_eq!(row.count, 5_000_000_000);
        assert_eq!(row.weight_grams, 125_000_000_000.0);
        // 7 per unit plus one per 100 g
        assert_eq!(row.eco_points, 35_000_000_000 + 1_250_000_000);
    }

    #[test]
    fn test_points_saturate() {
        assert_eq!(eco_points(MaterialCategory::AluminumCan, u64::MAX, 0.0), u64::MAX);
    }

    #[test]
    fn test_factors_proportional_to_weight() {
        let m = MaterialCategory::AluminumCan;
        assert_eq!(co2_avoided_kg(m, 1000.0), 9.0);
        assert_eq!(co2_avoided_kg(m, 2000.0), 18.0);
        assert_eq!(energy_saved_kwh(m, 500.0), 7.0);
        assert_eq!(co2_avoided_kg(m, 0.0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_points_floor(count in 1u64..1_000_000, weight in 0.0f64..1.0e7, idx in 0usize..3) {
            let material = MaterialCategory::ALL[idx];
            prop_assert!(eco_points(material, count, weight) >= count);
        }

        #[test]
        fn prop_metrics_non_negative(count in 1u64..10_000, idx in 0usize..3) {
            let row = ImpactCalculator::default()
                .process(MaterialCategory::ALL[idx], count)
                .unwrap();
            prop_assert!(row.co2_kg >= 0.0);
            prop_assert!(row.energy_kwh >= 0.0);
            prop_assert!(row.eco_points >= count);
        }
    }
}
