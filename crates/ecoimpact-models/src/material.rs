//! Recyclable-material taxonomy and per-material factor tables.
//!
//! The taxonomy is closed: every detection either maps onto one of the
//! three categories below or is reported as unclassified.
//!
//! | Material | Unit weight (g) | CO2 kg/kg | Energy kWh/kg | Base points |
//! |----------|-----------------|-----------|---------------|-------------|
//! | `plastic_bottle` | 25 | 2.5 | 5.5 | 7 |
//! | `glass_bottle` | 250 | 0.3 | 0.4 | 9 |
//! | `aluminum_can` | 15 | 9.0 | 14.0 | 11 |

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Canonical recyclable-material category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MaterialCategory {
    /// PET / plastic bottles.
    PlasticBottle,
    /// Glass bottles.
    GlassBottle,
    /// Aluminum beverage cans.
    AluminumCan,
}

impl MaterialCategory {
    /// All categories in taxonomy order.
    pub const ALL: &'static [MaterialCategory] = &[
        MaterialCategory::PlasticBottle,
        MaterialCategory::GlassBottle,
        MaterialCategory::AluminumCan,
    ];

    /// Returns the wire code (snake_case).
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialCategory::PlasticBottle => "plastic_bottle",
            MaterialCategory::GlassBottle => "glass_bottle",
            MaterialCategory::AluminumCan => "aluminum_can",
        }
    }

    /// Returns a human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            MaterialCategory::PlasticBottle => "Plastic bottle",
            MaterialCategory::GlassBottle => "Glass bottle",
            MaterialCategory::AluminumCan => "Aluminum can",
        }
    }

    /// Returns the constant factor table for this material.
    pub fn profile(&self) -> MaterialProfile {
        match self {
            MaterialCategory::PlasticBottle => MaterialProfile {
                material: *self,
                unit_weight_grams: 25.0,
                co2_kg_per_kg: 2.5,
                energy_kwh_per_kg: 5.5,
                base_points_per_unit: 7,
            },
            MaterialCategory::GlassBottle => MaterialProfile {
                material: *self,
                unit_weight_grams: 250.0,
                co2_kg_per_kg: 0.3,
                energy_kwh_per_kg: 0.4,
                base_points_per_unit: 9,
            },
            MaterialCategory::AluminumCan => MaterialProfile {
                material: *self,
                unit_weight_grams: 15.0,
                co2_kg_per_kg: 9.0,
                energy_kwh_per_kg: 14.0,
                base_points_per_unit: 11,
            },
        }
    }

    /// Assumed mass of a single item, in grams.
    pub fn unit_weight_grams(&self) -> f64 {
        self.profile().unit_weight_grams
    }
}

impl fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MaterialCategory {
    type Err = MaterialParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plastic_bottle" => Ok(MaterialCategory::PlasticBottle),
            "glass_bottle" => Ok(MaterialCategory::GlassBottle),
            "aluminum_can" => Ok(MaterialCategory::AluminumCan),
            _ => Err(MaterialParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown material: {0}")]
pub struct MaterialParseError(pub String);

/// Read-only conversion factors for one material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MaterialProfile {
    pub material: MaterialCategory,
    /// Grams per detected unit
    pub unit_weight_grams: f64,
    /// kg of CO2 avoided per kg recycled
    pub co2_kg_per_kg: f64,
    /// kWh saved per kg recycled
    pub energy_kwh_per_kg: f64,
    /// Eco points awarded per unit before the weight bonus
    pub base_points_per_unit: u64,
}

/// Factor tables for every supported material, in taxonomy order.
pub fn material_catalog() -> Vec<MaterialProfile> {
    MaterialCategory::ALL.iter().map(|m| m.profile()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_parse() {
        assert_eq!(
            "plastic_bottle".parse::<MaterialCategory>().unwrap(),
            MaterialCategory::PlasticBottle
        );
        assert_eq!(
            " Glass_Bottle ".parse::<MaterialCategory>().unwrap(),
            MaterialCategory::GlassBottle
        );
        assert_eq!(
            "aluminum_can".parse::<MaterialCategory>().unwrap(),
            MaterialCategory::AluminumCan
        );

        let err = "plastic_foam".parse::<MaterialCategory>().unwrap_err();
        assert_eq!(err.0, "plastic_foam");
        assert_eq!(err.to_string(), "Unknown material: plastic_foam");
    }

    #[test]
    fn test_material_display_roundtrip() {
        for material in MaterialCategory::ALL {
            assert_eq!(material.to_string().parse::<MaterialCategory>().unwrap(), *material);
        }
    }

    #[test]
    fn test_serde_codes() {
        let json = serde_json::to_string(&MaterialCategory::AluminumCan).unwrap();
        assert_eq!(json, "\"aluminum_can\"");

        let parsed: MaterialCategory = serde_json::from_str("\"glass_bottle\"").unwrap();
        assert_eq!(parsed, MaterialCategory::GlassBottle);
    }

    #[test]
    fn test_catalog_factors() {
        let catalog = material_catalog();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog[0].material, MaterialCategory::PlasticBottle);

        let glass = MaterialCategory::GlassBottle.profile();
        assert_eq!(glass.unit_weight_grams, 250.0);
        assert_eq!(glass.co2_kg_per_kg, 0.3);
        assert_eq!(glass.energy_kwh_per_kg, 0.4);
        assert_eq!(glass.base_points_per_unit, 9);

        assert_eq!(MaterialCategory::AluminumCan.unit_weight_grams(), 15.0);
    }
}
