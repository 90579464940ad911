// src/matching/signature.rs
// Deterministic complaint signatures used for exact-match detection.

use std::fmt;

use super::normalize::normalize_text;
use crate::models::{ComplaintConditions, ConditionKey};

/// Coordinates with an absolute value at or below this are treated as unset.
pub const COORDINATE_EPSILON: f64 = 0.001;
/// Case-insensitive values that mean "no value supplied".
const ABSENT_SENTINELS: [&str; 5] = ["", "n/a", "none", "null", "undefined"];
const TEXT_CONDITION_SEPARATOR: char = '|';

/// Hex-encoded 128-bit digest of normalized text plus canonical conditions.
/// Only ever compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lower-cased, whitespace-collapsed value, or `None` for sentinel values.
fn canonical_text(value: &str) -> Option<String> {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    if ABSENT_SENTINELS.contains(&collapsed.as_str()) {
        None
    } else {
        Some(collapsed)
    }
}

/// Six-decimal rendering of a coordinate, or `None` when it is near zero.
fn canonical_coordinate(value: f64) -> Option<String> {
    if !value.is_finite() || value.abs() <= COORDINATE_EPSILON {
        return None;
    }
    let rounded = (value * 1_000_000.0).round() / 1_000_000.0;
    Some(format!("{:.6}", rounded))
}

fn canonical_value(conditions: &ComplaintConditions, key: ConditionKey) -> Option<String> {
    if key.is_coordinate() {
        conditions.coordinate(key).and_then(canonical_coordinate)
    } else {
        conditions.text(key).and_then(canonical_text)
    }
}

/// `key:value` pairs for every allow-listed condition that carries a value,
/// sorted by the full pair string.
pub fn canonical_condition_pairs(conditions: &ComplaintConditions) -> Vec<String> {
    let mut pairs: Vec<String> = ConditionKey::ALL
        .iter()
        .filter_map(|key| canonical_value(conditions, *key).map(|value| format!("{}:{}", key.as_str(), value)))
        .collect();
    pairs.sort();
    pairs
}

/// Builds the signature for a complaint.
///
/// Two calls agree whenever the texts normalize to the same lower-cased string
/// and the conditions carry the same canonical values, regardless of the
/// casing or spacing of either.
pub fn build_signature(complaint_text: &str, conditions: &ComplaintConditions) -> Signature {
    let normalized = normalize_text(complaint_text).to_lowercase().trim().to_string();
    let pairs = canonical_condition_pairs(conditions).join("|");
    let input = format!("{}{}{}", normalized, TEXT_CONDITION_SEPARATOR, pairs);
    Signature(format!("{:x}", md5::compute(input.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_conditions() -> ComplaintConditions {
        ComplaintConditions {
            device_settings: Some("APN configured".to_string()),
            signal_strength: Some("Weak".to_string()),
            quality_of_signal: Some("Poor".to_string()),
            site_kpi_alarm: Some("N/A".to_string()),
            longitude: Some(79.861243),
            latitude: Some(6.927079),
            ..Default::default()
        }
    }

    #[test]
    fn test_pairs_skip_sentinels_and_sort() {
        let pairs = canonical_condition_pairs(&sample_conditions());
        assert_eq!(
            pairs,
            vec![
                "device_type_settings_vpn_apn:apn configured",
                "latitude:6.927079",
                "longitude:79.861243",
                "quality_of_signal:poor",
                "signal_strength:weak",
            ]
        );
    }

    #[test]
    fn test_near_zero_coordinates_are_unset() {
        let conditions = ComplaintConditions {
            longitude: Some(0.0009),
            latitude: Some(-0.001),
            ..Default::default()
        };
        assert!(canonical_condition_pairs(&conditions).is_empty());
        assert_eq!(
            build_signature("No signal", &conditions),
            build_signature("No signal", &ComplaintConditions::default())
        );
    }

    #[test]
    fn test_coordinates_rounded_to_six_places() {
        let a = ComplaintConditions {
            longitude: Some(79.8612431),
            ..Default::default()
        };
        let b = ComplaintConditions {
            longitude: Some(79.8612429),
            ..Default::default()
        };
        assert_eq!(build_signature("x", &a), build_signature("x", &b));
    }

    #[test]
    fn test_signature_ignores_case_and_whitespace() {
        let mut shouty = sample_conditions();
        shouty.signal_strength = Some("  WEAK ".to_string());
        shouty.device_settings = Some("apn   Configured".to_string());

        assert_eq!(
            build_signature("Call drops  at HOME", &sample_conditions()),
            build_signature("  call drops at home ", &shouty)
        );
    }

    #[test]
    fn test_signature_changes_with_any_condition() {
        let base = build_signature("Call drops", &sample_conditions());

        let mut changed = sample_conditions();
        changed.quality_of_signal = Some("Good".to_string());
        assert_ne!(base, build_signature("Call drops", &changed));

        let mut located = sample_conditions();
        located.location_name = Some("Kandy".to_string());
        assert_ne!(base, build_signature("Call drops", &located));
    }

    #[test]
    fn test_signature_strips_location_tokens_before_hashing() {
        let conditions = ComplaintConditions::default();
        assert_eq!(
            build_signature("Drops near COL12 since 3 days", &conditions),
            build_signature("Drops near KDY7 since days", &conditions)
        );
        assert_eq!(build_signature("x", &conditions).as_str().len(), 32);
    }
}
