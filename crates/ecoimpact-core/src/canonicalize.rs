//! Fuzzy mapping of free-form detector labels onto the material taxonomy.
//!
//! Labels are normalized (lowercased, spaces replaced by underscores) and
//! then resolved against [`SYNONYM_RULES`]:
//!
//! 1. exact match on a rule key;
//! 2. otherwise the first rule, in declared order, whose key contains the
//!    label or is contained in it;
//! 3. otherwise [`CanonicalLabel::Unclassified`].
//!
//! Step 2 is order-dependent: "lata_de_vidrio" contains both `vidrio` and
//! `lata`, and resolves to glass because the glass rules are declared first.
//! An empty label is contained in every key and so resolves to the first
//! rule (plastic bottle); a detection with no label is counted that way.

use ecoimpact_models::{FilteredDetection, MaterialCategory, Tally};
use tracing::{debug, warn};

use crate::metrics;

/// Priority-ordered synonym rules. Order is significant for substring matches.
pub const SYNONYM_RULES: &[(&str, MaterialCategory)] = &[
    ("botella_plastico", MaterialCategory::PlasticBottle),
    ("botella_plastica", MaterialCategory::PlasticBottle),
    ("plastic", MaterialCategory::PlasticBottle),
    ("plastico", MaterialCategory::PlasticBottle),
    ("pet", MaterialCategory::PlasticBottle),
    ("botella_vidrio", MaterialCategory::GlassBottle),
    ("glass", MaterialCategory::GlassBottle),
    ("vidrio", MaterialCategory::GlassBottle),
    ("lata_aluminio", MaterialCategory::AluminumCan),
    ("lata", MaterialCategory::AluminumCan),
    ("can", MaterialCategory::AluminumCan),
    ("aluminum", MaterialCategory::AluminumCan),
    ("aluminio", MaterialCategory::AluminumCan),
];

/// Outcome of canonicalizing one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalLabel {
    Material(MaterialCategory),
    Unclassified,
}

impl CanonicalLabel {
    pub fn material(&self) -> Option<MaterialCategory> {
        match self {
            CanonicalLabel::Material(m) => Some(*m),
            CanonicalLabel::Unclassified => None,
        }
    }
}

/// Lowercase and replace spaces with underscores.
pub fn normalize_label(label: &str) -> String {
    label.to_lowercase().replace(' ', "_")
}

/// Map a raw label onto the taxonomy.
pub fn canonicalize(label: &str) -> CanonicalLabel {
    let normalized = normalize_label(label);

    if let Some((_, material)) = SYNONYM_RULES.iter().find(|(key, _)| *key == normalized) {
        return CanonicalLabel::Material(*material);
    }

    SYNONYM_RULES
        .iter()
        .find(|(key, _)| normalized.contains(key) || key.contains(normalized.as_str()))
        .map(|(_, material)| CanonicalLabel::Material(*material))
        .unwrap_or(CanonicalLabel::Unclassified)
}

/// Canonicalize filtered detections and count them per category.
pub fn tally_detections(detections: &[FilteredDetection]) -> Tally {
    let mut tally = Tally::new();

    for detection in detections {
        match canonicalize(&detection.label) {
            CanonicalLabel::Material(material) => tally.increment(material),
            CanonicalLabel::Unclassified => {
                warn!(label = %detection.label, "Unclassified detection label");
                tally.increment_unclassified();
            }
        }
    }

    debug!(
        plastic_bottle = tally.plastic_bottle,
        glass_bottle = tally.glass_bottle,
        aluminum_can = tally.aluminum_can,
        unclassified = tally.unclassified,
        "Detections tallied"
    );
    metrics::record_unclassified(tally.unclassified);

    tally
}
