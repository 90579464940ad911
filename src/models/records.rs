// src/models/records.rs
// Typed corpus records and the incoming complaint shape.

use serde::{Deserialize, Serialize};

/// Condition keys that participate in complaint signatures, in canonical order.
///
/// The string forms are the field names used by the request payload, so a
/// signature built from a request and one rebuilt from a stored record agree
/// on every `key:value` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConditionKey {
    DeviceSettings,
    SignalStrength,
    QualityOfSignal,
    SiteKpiAlarm,
    PastDataAnalysis,
    IndoorOutdoorCoverage,
    Location,
    Longitude,
    Latitude,
}

impl ConditionKey {
    pub const ALL: [ConditionKey; 9] = [
        ConditionKey::DeviceSettings,
        ConditionKey::SignalStrength,
        ConditionKey::QualityOfSignal,
        ConditionKey::SiteKpiAlarm,
        ConditionKey::PastDataAnalysis,
        ConditionKey::IndoorOutdoorCoverage,
        ConditionKey::Location,
        ConditionKey::Longitude,
        ConditionKey::Latitude,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionKey::DeviceSettings => "device_type_settings_vpn_apn",
            ConditionKey::SignalStrength => "signal_strength",
            ConditionKey::QualityOfSignal => "quality_of_signal",
            ConditionKey::SiteKpiAlarm => "site_kpi_alarm",
            ConditionKey::PastDataAnalysis => "past_data_analysis",
            ConditionKey::IndoorOutdoorCoverage => "indoor_outdoor_coverage_issue",
            ConditionKey::Location => "location",
            ConditionKey::Longitude => "longitude",
            ConditionKey::Latitude => "latitude",
        }
    }

    pub fn is_coordinate(&self) -> bool {
        matches!(self, ConditionKey::Longitude | ConditionKey::Latitude)
    }
}

/// Structured diagnostic attributes attached to a complaint. Every field is
/// optional; `None` is the single canonical "absent" value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplaintConditions {
    #[serde(default, rename = "device_type_settings_vpn_apn")]
    pub device_settings: Option<String>,
    #[serde(default)]
    pub signal_strength: Option<String>,
    #[serde(default)]
    pub quality_of_signal: Option<String>,
    #[serde(default)]
    pub site_kpi_alarm: Option<String>,
    #[serde(default)]
    pub past_data_analysis: Option<String>,
    #[serde(default, rename = "indoor_outdoor_coverage_issue")]
    pub indoor_outdoor_coverage: Option<String>,
    #[serde(default, rename = "location")]
    pub location_name: Option<String>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
}

impl ComplaintConditions {
    /// Text value for a string-valued key. Coordinate keys always yield `None`;
    /// use [`ComplaintConditions::coordinate`] for those.
    pub fn text(&self, key: ConditionKey) -> Option<&str> {
        let value = match key {
            ConditionKey::DeviceSettings => &self.device_settings,
            ConditionKey::SignalStrength => &self.signal_strength,
            ConditionKey::QualityOfSignal => &self.quality_of_signal,
            ConditionKey::SiteKpiAlarm => &self.site_kpi_alarm,
            ConditionKey::PastDataAnalysis => &self.past_data_analysis,
            ConditionKey::IndoorOutdoorCoverage => &self.indoor_outdoor_coverage,
            ConditionKey::Location => &self.location_name,
            ConditionKey::Longitude | ConditionKey::Latitude => return None,
        };
        value.as_deref()
    }

    pub fn coordinate(&self, key: ConditionKey) -> Option<f64> {
        match key {
            ConditionKey::Longitude => self.longitude,
            ConditionKey::Latitude => self.latitude,
            _ => None,
        }
    }
}

/// One transient complaint submitted for resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomingComplaint {
    #[serde(default)]
    pub msisdn: Option<String>,
    pub complaint: String,
    #[serde(flatten)]
    pub conditions: ComplaintConditions,
}

impl IncomingComplaint {
    pub fn new(complaint: impl Into<String>) -> Self {
        Self {
            msisdn: None,
            complaint: complaint.into(),
            conditions: ComplaintConditions::default(),
        }
    }
}

/// A historical complaint and its recorded solution. Identity is positional
/// within the corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComplaintRecord {
    pub issue_description: String,
    pub solution: String,
    pub device_settings: Option<String>,
    pub signal_strength: Option<String>,
    pub quality_of_signal: Option<String>,
    pub site_kpi_alarm: Option<String>,
    pub past_data_analysis: Option<String>,
    pub indoor_outdoor_coverage: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

impl ComplaintRecord {
    /// Rebuilds the condition set a matching request would carry for this record.
    ///
    /// Historical data has no location name. Blank text values are dropped and
    /// coordinates are kept only when they are meaningfully non-zero.
    pub fn signature_conditions(&self) -> ComplaintConditions {
        fn present(value: &Option<String>) -> Option<String> {
            value
                .as_ref()
                .filter(|v| !v.trim().is_empty())
                .cloned()
        }

        ComplaintConditions {
            device_settings: present(&self.device_settings),
            signal_strength: present(&self.signal_strength),
            quality_of_signal: present(&self.quality_of_signal),
            site_kpi_alarm: present(&self.site_kpi_alarm),
            past_data_analysis: present(&self.past_data_analysis),
            indoor_outdoor_coverage: present(&self.indoor_outdoor_coverage),
            location_name: None,
            longitude: self.longitude.filter(|v| v.abs() > crate::matching::signature::COORDINATE_EPSILON),
            latitude: self.latitude.filter(|v| v.abs() > crate::matching::signature::COORDINATE_EPSILON),
        }
    }
}

/// A site row from the location table. RSRP buckets are kept as their raw
/// cell text (e.g. `"82.5%"`) and parsed where they are used.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocationRecord {
    pub site_name: String,
    pub rsrp_above_105: Option<String>,
    pub rsrp_105_to_110: Option<String>,
    pub rsrp_110_to_115: Option<String>,
    pub rsrp_below_115: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_conditions_drop_blank_and_near_zero_values() {
        let record = ComplaintRecord {
            issue_description: "Call drops".to_string(),
            solution: "Reset APN".to_string(),
            device_settings: Some("  ".to_string()),
            signal_strength: Some("Weak".to_string()),
            longitude: Some(0.0005),
            latitude: Some(6.9271),
            ..Default::default()
        };

        let conditions = record.signature_conditions();
        assert_eq!(conditions.device_settings, None);
        assert_eq!(conditions.signal_strength.as_deref(), Some("Weak"));
        assert_eq!(conditions.longitude, None);
        assert_eq!(conditions.latitude, Some(6.9271));
        assert_eq!(conditions.location_name, None);
    }

    #[test]
    fn test_incoming_complaint_uses_request_field_names() {
        let json = r#"{
            "msisdn": "0771234567",
            "complaint": "No data in the evening",
            "device_type_settings_vpn_apn": "APN ok",
            "indoor_outdoor_coverage_issue": "Indoor",
            "location": "Kandy",
            "longitude": 80.63,
            "latitude": 7.29
        }"#;

        let complaint: IncomingComplaint = serde_json::from_str(json).unwrap();
        assert_eq!(complaint.msisdn.as_deref(), Some("0771234567"));
        assert_eq!(complaint.conditions.device_settings.as_deref(), Some("APN ok"));
        assert_eq!(complaint.conditions.indoor_outdoor_coverage.as_deref(), Some("Indoor"));
        assert_eq!(complaint.conditions.location_name.as_deref(), Some("Kandy"));
        assert_eq!(complaint.conditions.longitude, Some(80.63));
        assert_eq!(complaint.conditions.signal_strength, None);
    }

    #[test]
    fn test_text_accessor_ignores_coordinate_keys() {
        let conditions = ComplaintConditions {
            longitude: Some(79.86),
            ..Default::default()
        };
        assert_eq!(conditions.text(ConditionKey::Longitude), None);
        assert_eq!(conditions.coordinate(ConditionKey::Longitude), Some(79.86));
        assert!(ConditionKey::Latitude.is_coordinate());
        assert!(!ConditionKey::Location.is_coordinate());
    }
}
