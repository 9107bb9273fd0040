//! Per-category detection counts.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{MaterialCategory, MaterialCount};

/// Count of canonicalized detections per material.
///
/// All three categories are always present. Labels that matched no synonym
/// are kept apart in `unclassified` and never folded into a category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Tally {
    pub plastic_bottle: u32,
    pub glass_bottle: u32,
    pub aluminum_can: u32,
    pub unclassified: u32,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for one category.
    pub fn get(&self, material: MaterialCategory) -> u32 {
        match material {
            MaterialCategory::PlasticBottle => self.plastic_bottle,
            MaterialCategory::GlassBottle => self.glass_bottle,
            MaterialCategory::AluminumCan => self.aluminum_can,
        }
    }

    /// Record one classified detection.
    pub fn increment(&mut self, material: MaterialCategory) {
        match material {
            MaterialCategory::PlasticBottle => self.plastic_bottle += 1,
            MaterialCategory::GlassBottle => self.glass_bottle += 1,
            MaterialCategory::AluminumCan => self.aluminum_can += 1,
        }
    }

    /// Record one detection whose label matched nothing.
    pub fn increment_unclassified(&mut self) {
        self.unclassified += 1;
    }

    /// Total of classified detections (excludes `unclassified`).
    pub fn total(&self) -> u32 {
        MaterialCategory::ALL.iter().map(|m| self.get(*m)).sum()
    }

    /// True when no detection was classified.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Share of each category among classified detections, in percent with
    /// one decimal place. All zeros when nothing was classified.
    pub fn percentages(&self) -> Vec<(MaterialCategory, f64)> {
        let total = self.total();
        MaterialCategory::ALL
            .iter()
            .map(|m| {
                let share = if total == 0 {
                    0.0
                } else {
                    (self.get(*m) as f64 * 1000.0 / total as f64).round() / 10.0
                };
                (*m, share)
            })
            .collect()
    }

    /// Aggregation input: one pair per non-zero category, in taxonomy order.
    pub fn to_pairs(&self) -> Vec<MaterialCount> {
        MaterialCategory::ALL
            .iter()
            .filter(|m| self.get(**m) > 0)
            .map(|m| MaterialCount::new(m.as_str(), i64::from(self.get(*m))))
            .collect()
    }
}
