//! Impact report types.
//!
//! The JSON shape of [`ImpactReport`] is consumed by the points ledger and
//! the reporting surface; field names and rounding precision are stable:
//!
//! ```text
//! {
//!   "totals": {"weight_grams": f, "co2_kg": f, "energy_kwh": f, "eco_points": i},
//!   "rows": [{"material": s, "count": i, "weight_grams": f, "co2_kg": f,
//!             "energy_kwh": f, "eco_points": i}, ...]
//! }
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::MaterialCategory;

/// One `(material, count)` entry of an aggregation batch.
///
/// The material is kept as the raw code and the count as a signed integer so
/// that invalid entries can be reported back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MaterialCount {
    pub material: String,
    pub count: i64,
}

impl MaterialCount {
    pub fn new(material: impl Into<String>, count: i64) -> Self {
        Self {
            material: material.into(),
            count,
        }
    }
}

/// Metrics for one processed `(material, count)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MaterialMetrics {
    pub material: MaterialCategory,
    pub count: u64,
    /// Estimated mass, 2 decimal places
    pub weight_grams: f64,
    /// CO2 avoided, 3 decimal places
    pub co2_kg: f64,
    /// Energy saved, 3 decimal places
    pub energy_kwh: f64,
    pub eco_points: u64,
}

/// Element-wise sum of the (already rounded) row metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ImpactTotals {
    pub weight_grams: f64,
    pub co2_kg: f64,
    pub energy_kwh: f64,
    pub eco_points: u64,
}

/// Aggregate output: per-material rows in input order plus totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ImpactReport {
    pub totals: ImpactTotals,
    pub rows: Vec<MaterialMetrics>,
}

impl ImpactReport {
    /// Number of items across all rows.
    pub fn item_count(&self) -> u64 {
        self.rows
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.count))
    }

    /// Human-readable one-line summary for ledger entries.
    ///
    /// Format: "Recycled 3 plastic_bottle, 2 aluminum_can (43 eco points)"
    pub fn to_description(&self) -> String {
        let items: Vec<String> = self
            .rows
            .iter()
            .map(|r| format!("{} {}", r.count, r.material))
            .collect();

        format!(
            "Recycled {} ({} eco points)",
            items.join(", "),
            self.totals.eco_points
        )
    }
}
