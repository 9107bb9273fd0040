//! Extraction of detection records from vision-service workflow output.
//!
//! Workflow responses are loosely shaped. The first element of a top-level
//! list is the result object; predictions live under `predictions` or
//! `detections`, either directly on the result or inside one of its nested
//! output objects (a nested hit wins over a top-level one). A top-level list
//! with no such key is read as a bare list of detections.

use ecoimpact_models::RawDetection;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ImpactError, ImpactResult};

const PREDICTION_KEYS: &[&str] = &["predictions", "detections"];

fn prediction_entry(object: &serde_json::Map<String, Value>) -> Option<&Value> {
    PREDICTION_KEYS.iter().find_map(|key| object.get(*key))
}

/// Locate the prediction list inside a workflow result object.
fn find_predictions(result: &serde_json::Map<String, Value>) -> Option<&Vec<Value>> {
    let mut found = prediction_entry(result);

    // Nested outputs are scanned in key order
    for value in result.values() {
        if let Value::Object(nested) = value {
            if let Some(entry) = prediction_entry(nested) {
                found = Some(entry);
                break;
            }
        }
    }

    match found? {
        Value::Array(items) => Some(items),
        Value::Object(inner) => match prediction_entry(inner) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

/// Deserialize prediction entries, skipping malformed ones.
fn parse_entries(items: &[Value]) -> Vec<RawDetection> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            if !item.is_object() {
                warn!(index, "Skipping non-object prediction entry");
                return None;
            }
            match serde_json::from_value::<RawDetection>(item.clone()) {
                Ok(detection) => Some(detection),
                Err(e) => {
                    warn!(index, error = %e, "Skipping malformed prediction entry");
                    None
                }
            }
        })
        .collect()
}

/// Extract raw detections from a workflow payload or a bare detection list.
pub fn extract_detections(payload: &Value) -> ImpactResult<Vec<RawDetection>> {
    let result = match payload {
        Value::Array(items) => match items.first() {
            None => return Ok(Vec::new()),
            Some(Value::Object(first)) => {
                if let Some(predictions) = find_predictions(first) {
                    predictions
                } else {
                    return Ok(parse_entries(items));
                }
            }
            Some(_) => {
                return Err(ImpactError::invalid_payload(
                    "expected a list of objects",
                ))
            }
        },
        Value::Object(object) => find_predictions(object).ok_or_else(|| {
            ImpactError::invalid_payload("no 'predictions' or 'detections' list found")
        })?,
        _ => {
            return Err(ImpactError::invalid_payload(
                "expected a JSON object or a list",
            ))
        }
    };

    let detections = parse_entries(result);
    debug!(
        entries = result.len(),
        parsed = detections.len(),
        "Predictions extracted from workflow payload"
    );
    Ok(detections)
}

/// Parse a JSON document and extract detections from it.
pub fn extract_detections_from_str(json: &str) -> ImpactResult<Vec<RawDetection>> {
    let payload: Value = serde_json::from_str(json)?;
    extract_detections(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_level_predictions() {
        let payload = json!([{
            "predictions": [
                {"class": "plastic", "confidence": 0.9, "width": 100, "height": 100},
                {"class": "lata", "confidence": 0.95, "width": 80, "height": 90}
            ]
        }]);

        let detections = extract_detections(&payload).unwrap();
        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].label, "plastic");
        assert_eq!(detections[1].width, 80.0);
    }

    #[test]
    fn test_nested_output_wins() {
        let payload = json!([{
            "detections": [{"class": "ignored", "confidence": 0.9}],
            "model_output": {
                "predictions": [{"class": "vidrio", "confidence": 0.97, "width": 90, "height": 200}]
            }
        }]);

        let detections = extract_detections(&payload).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].label, "vidrio");
    }

    #[test]
    fn test_wrapped_prediction_object() {
        let payload = json!({
            "predictions": {
                "image": {"width": 640, "height": 480},
                "predictions": [{"class": "pet", "confidence": 0.88, "width": 70, "height": 100,
                                 "detection_id": "p-1"}]
            }
        });

        let detections = extract_detections(&payload).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].id.as_deref(), Some("p-1"));
    }

    #[test]
    fn test_bare_detection_list() {
        let payload = json!([
            {"label": "can", "confidence": 0.9, "width": 100, "height": 60},
            {"label": "glass", "confidence": 0.99, "width": 100, "height": 100}
        ]);

        let detections = extract_detections(&payload).unwrap();
        assert_eq!(detections.len(), 2);
        assert_eq!(detections[1].label, "glass");
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let payload = json!({
            "predictions": [
                "not an object",
                {"class": "plastic", "confidence": "high"},
                {"class": "plastic", "confidence": 0.9, "width": 100, "height": 100}
            ]
        });

        let detections = extract_detections(&payload).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].confidence, 0.9);
    }

    #[test]
    fn test_empty_and_invalid_payloads() {
        assert!(extract_detections(&json!([])).unwrap().is_empty());
        assert!(extract_detections(&json!({"foo": 1})).is_err());
        assert!(extract_detections(&json!(42)).is_err());
        assert!(extract_detections(&json!([1, 2])).is_err());
        assert!(matches!(
            extract_detections_from_str("{not json"),
            Err(ImpactError::Json(_))
        ));
    }
}
