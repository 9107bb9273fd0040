//! Batch aggregation of `(material, count)` pairs into an impact report.
//!
//! Validation is fail-fast and atomic: the first invalid pair rejects the
//! whole batch. Valid pairs are processed independently (duplicates are not
//! merged) and may run in parallel; rows are always returned in input order.
//! Totals sum the already-rounded row values.

use ecoimpact_models::{ImpactReport, ImpactTotals, MaterialCategory, MaterialCount, MaterialMetrics};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{ImpactResult, ValidationError};
use crate::impact::ImpactCalculator;
use crate::metrics;
use crate::rounding::{round_to, FACTOR_PLACES, WEIGHT_PLACES};

/// Result of a successful aggregation.
#[derive(Debug, Clone, PartialEq)]
pub enum ImpactOutcome {
    Report(ImpactReport),
    /// Nothing to report: no pairs were supplied.
    Empty,
}

impl ImpactOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, ImpactOutcome::Empty)
    }

    pub fn report(&self) -> Option<&ImpactReport> {
        match self {
            ImpactOutcome::Report(report) => Some(report),
            ImpactOutcome::Empty => None,
        }
    }

    pub fn into_report(self) -> Option<ImpactReport> {
        match self {
            ImpactOutcome::Report(report) => Some(report),
            ImpactOutcome::Empty => None,
        }
    }
}

/// Validate every pair, returning typed pairs or the first offending one.
pub fn validate_pairs(
    pairs: &[MaterialCount],
) -> Result<Vec<(MaterialCategory, u64)>, ValidationError> {
    pairs
        .iter()
        .enumerate()
        .map(|(index, pair)| -> Result<(MaterialCategory, u64), ValidationError> {
            let material: MaterialCategory = pair.material.parse().map_err(|_| {
                ValidationError::UnknownMaterial {
                    index,
                    material: pair.material.clone(),
                }
            })?;
            let count = u64::try_from(pair.count)
                .ok()
                .filter(|c| *c > 0)
                .ok_or_else(|| ValidationError::NonPositiveCount {
                    index,
                    material: pair.material.clone(),
                    count: pair.count,
                })?;
            Ok((material, count))
        })
        .collect()
}

/// Sum rounded rows; re-rounding only strips binary residue.
pub fn sum_totals(rows: &[MaterialMetrics]) -> ImpactTotals {
    let totals = rows.iter().fold(ImpactTotals::default(), |mut acc, row| {
        acc.weight_grams += row.weight_grams;
        acc.co2_kg += row.co2_kg;
        acc.energy_kwh += row.energy_kwh;
        acc.eco_points = acc.eco_points.saturating_add(row.eco_points);
        acc
    });

    ImpactTotals {
        weight_grams: round_to(totals.weight_grams, WEIGHT_PLACES),
        co2_kg: round_to(totals.co2_kg, FACTOR_PLACES),
        energy_kwh: round_to(totals.energy_kwh, FACTOR_PLACES),
        eco_points: totals.eco_points,
    }
}

/// Runs the impact calculator over a batch.
#[derive(Debug, Clone)]
pub struct Aggregator {
    calculator: ImpactCalculator,
    parallel: bool,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(ImpactCalculator::default())
    }
}

impl Aggregator {
    pub fn new(calculator: ImpactCalculator) -> Self {
        Self {
            calculator,
            parallel: true,
        }
    }

    /// Builder-style setter for parallel row computation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn calculator(&self) -> &ImpactCalculator {
        &self.calculator
    }

    /// Aggregate a batch into a report, or `Empty` for an empty batch.
    pub fn aggregate(&self, pairs: &[MaterialCount]) -> ImpactResult<ImpactOutcome> {
        if pairs.is_empty() {
            debug!("Empty aggregation batch");
            metrics::record_empty_result();
            return Ok(ImpactOutcome::Empty);
        }

        let validated = validate_pairs(pairs).map_err(|e| {
            warn!(index = e.index(), material = %e.material(), "Aggregation batch rejected: {}", e);
            metrics::record_validation_failure();
            e
        })?;

        // Indexed parallel iterators collect in input order
        let rows: Vec<MaterialMetrics> = if self.parallel {
            validated
                .par_iter()
                .map(|(material, count)| self.calculator.process(*material, *count))
                .collect::<ImpactResult<_>>()?
        } else {
            validated
                .iter()
                .map(|(material, count)| self.calculator.process(*material, *count))
                .collect::<ImpactResult<_>>()?
        };

        let totals = sum_totals(&rows);
        info!(
            rows = rows.len(),
            weight_grams = totals.weight_grams,
            eco_points = totals.eco_points,
            "Impact report computed"
        );
        metrics::record_report(totals.eco_points);

        Ok(ImpactOutcome::Report(ImpactReport { totals, rows }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImpactError;

    fn pair(material: &str, count: i64) -> MaterialCount {
        MaterialCount::new(material, count)
    }

    #[test]
    fn test_empty_batch() {
        let outcome = Aggregator::default().aggregate(&[]).unwrap();
        assert!(outcome.is_empty());
        assert!(outcome.report().is_none());
    }

    #[test]
    fn test_two_material_report() {
        let outcome = Aggregator::default()
            .aggregate(&[pair("plastic_bottle", 3), pair("aluminum_can", 2)])
            .unwrap();
        let report = outcome.into_report().unwrap();

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.totals.weight_grams, 105.0);
        assert_eq!(report.totals.co2_kg, 0.458);
        assert_eq!(report.totals.energy_kwh, 0.833);
        assert_eq!(report.totals.eco_points, 43);
    }

    #[test]
    fn test_duplicates_not_merged() {
        let report = Aggregator::default()
            .aggregate(&[pair("plastic_bottle", 1), pair("plastic_bottle", 3)])
            .unwrap()
            .into_report()
            .unwrap();

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].count, 1);
        assert_eq!(report.rows[1].count, 3);
        // 7 + 21
        assert_eq!(report.totals.eco_points, 28);
        assert_eq!(report.totals.weight_grams, 100.0);
    }

    #[test]
    fn test_validation_names_first_offender() {
        let err = validate_pairs(&[
            pair("glass_bottle", 1),
            pair("plastic_foam", 1),
            pair("aluminum_can", 0),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            ValidationError::UnknownMaterial {
                index: 1,
                material: "plastic_foam".to_string(),
            }
        );
    }

    #[test]
    fn test_non_positive_count_rejects_batch() {
        let result = Aggregator::default()
            .aggregate(&[pair("glass_bottle", 2), pair("aluminum_can", -1)]);

        match result {
            Err(ImpactError::Validation(ValidationError::NonPositiveCount { index, count, .. })) => {
                assert_eq!(index, 1);
                assert_eq!(count, -1);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_count_beyond_u32_range_accepted() {
        let report = Aggregator::default()
            .aggregate(&[pair("plastic_bottle", 5_000_000_000), pair("glass_bottle", 1)])
            .unwrap()
            .into_report()
            .unwrap();

        assert_eq!(report.rows[0].count, 5_000_000_000);
        assert_eq!(report.rows[0].weight_grams, 125_000_000_000.0);
        assert_eq!(report.item_count(), 5_000_000_001);
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let pairs: Vec<MaterialCount> = (1..50)
            .map(|i| {
                let code = MaterialCategory::ALL[i as usize % 3].as_str();
                pair(code, i)
            })
            .collect();

        let parallel = Aggregator::default().aggregate(&pairs).unwrap();
        let sequential = Aggregator::default()
            .with_parallel(false)
            .aggregate(&pairs)
            .unwrap();

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_totals_sum_rounded_rows() {
        let rows = vec![
            MaterialMetrics {
                material: MaterialCategory::PlasticBottle,
                count: 1,
                weight_grams: 25.0,
                co2_kg: 0.063,
                energy_kwh: 0.138,
                eco_points: 7,
            },
            MaterialMetrics {
                material: MaterialCategory::PlasticBottle,
                count: 1,
                weight_grams: 25.0,
                co2_kg: 0.063,
                energy_kwh: 0.138,
                eco_points: 7,
            },
        ];
        let totals = sum_totals(&rows);

        // Unrounded: 0.125 and 0.275; rounded rows give 0.126 and 0.276
        assert_eq!(totals.co2_kg, 0.126);
        assert_eq!(totals.energy_kwh, 0.276);
        assert_eq!(totals.eco_points, 14);
    }
}
