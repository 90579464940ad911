// src/corpus/snapshot.rs
// Reads the JSON corpus snapshot produced by the offline dataset export.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;
use std::path::Path;

use super::CorpusIndex;
use crate::models::{ComplaintRecord, LocationRecord};

/// Accepts a spreadsheet-style cell: string, number, bool or null.
fn lenient_cell<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parses a coordinate cell. Unparsable or non-finite values are treated as absent.
fn parse_coordinate(raw: &Option<String>, field: &str, row: usize) -> Option<f64> {
    let text = raw.as_deref()?.trim();
    if text.is_empty() {
        return None;
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            debug!("Row {}: unparsable {} {:?}, treating as absent", row, field, text);
            None
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ComplaintRow {
    #[serde(rename = "Issue Description", default, deserialize_with = "lenient_cell")]
    pub issue_description: Option<String>,
    #[serde(rename = "Solution", default, deserialize_with = "lenient_cell")]
    pub solution: Option<String>,
    #[serde(rename = "Device type/settings/VPN/APN", default, deserialize_with = "lenient_cell")]
    pub device_settings: Option<String>,
    #[serde(rename = "Signal Strength", default, deserialize_with = "lenient_cell")]
    pub signal_strength: Option<String>,
    // Column name carries the source sheet's spelling.
    #[serde(rename = "Qulity of Signal", default, deserialize_with = "lenient_cell")]
    pub quality_of_signal: Option<String>,
    #[serde(rename = "Site KPI/Alarm", default, deserialize_with = "lenient_cell")]
    pub site_kpi_alarm: Option<String>,
    #[serde(rename = "Past Data analysis", default, deserialize_with = "lenient_cell")]
    pub past_data_analysis: Option<String>,
    #[serde(rename = "Indoor/Outdoor coverage issue", default, deserialize_with = "lenient_cell")]
    pub indoor_outdoor_coverage: Option<String>,
    #[serde(rename = "Lon", default, deserialize_with = "lenient_cell")]
    pub longitude: Option<String>,
    #[serde(rename = "Lat", default, deserialize_with = "lenient_cell")]
    pub latitude: Option<String>,
}

impl ComplaintRow {
    /// `None` when the row lacks an issue description or a solution.
    pub fn into_record(self, row: usize) -> Option<ComplaintRecord> {
        let longitude = parse_coordinate(&self.longitude, "Lon", row);
        let latitude = parse_coordinate(&self.latitude, "Lat", row);
        Some(ComplaintRecord {
            issue_description: non_blank(self.issue_description)?,
            solution: non_blank(self.solution)?,
            device_settings: self.device_settings,
            signal_strength: self.signal_strength,
            quality_of_signal: self.quality_of_signal,
            site_kpi_alarm: self.site_kpi_alarm,
            past_data_analysis: self.past_data_analysis,
            indoor_outdoor_coverage: self.indoor_outdoor_coverage,
            longitude,
            latitude,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LocationRow {
    #[serde(rename = "Site Name", default, deserialize_with = "lenient_cell")]
    pub site_name: Option<String>,
    #[serde(rename = "RSRP Range 1 (>-105dBm) %", default, deserialize_with = "lenient_cell")]
    pub rsrp_range_1: Option<String>,
    #[serde(rename = "RSRP Range 2 (-105~-110dBm) %", default, deserialize_with = "lenient_cell")]
    pub rsrp_range_2: Option<String>,
    #[serde(rename = "RSRP Range 3 (-110~-115dBm) %", default, deserialize_with = "lenient_cell")]
    pub rsrp_range_3: Option<String>,
    #[serde(rename = "RSRP < -115dBm", default, deserialize_with = "lenient_cell")]
    pub rsrp_below_115: Option<String>,
    #[serde(rename = "location_corrected.lat", default, deserialize_with = "lenient_cell")]
    pub latitude: Option<String>,
    #[serde(rename = "location_corrected.lon", default, deserialize_with = "lenient_cell")]
    pub longitude: Option<String>,
}

impl LocationRow {
    /// `None` when the row has no site name.
    pub fn into_record(self, row: usize) -> Option<LocationRecord> {
        let latitude = parse_coordinate(&self.latitude, "location_corrected.lat", row);
        let longitude = parse_coordinate(&self.longitude, "location_corrected.lon", row);
        Some(LocationRecord {
            site_name: non_blank(self.site_name)?.trim().to_string(),
            rsrp_above_105: self.rsrp_range_1,
            rsrp_105_to_110: self.rsrp_range_2,
            rsrp_110_to_115: self.rsrp_range_3,
            rsrp_below_115: self.rsrp_below_115,
            latitude,
            longitude,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SnapshotMetadata {
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub complaint_records: Option<usize>,
    #[serde(default)]
    pub location_records: Option<usize>,
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CorpusSnapshot {
    #[serde(default)]
    pub complaint_data: Vec<ComplaintRow>,
    #[serde(default)]
    pub location_data: Vec<LocationRow>,
    #[serde(default)]
    pub metadata: Option<SnapshotMetadata>,
}

impl CorpusSnapshot {
    /// Applies the load-time cleaning rules and builds the read-only index.
    pub fn into_index(self) -> CorpusIndex {
        if let Some(meta) = &self.metadata {
            info!(
                "Snapshot metadata: type={}, version={}, created={}, declared {} complaints / {} locations",
                meta.model_type.as_deref().unwrap_or("unknown"),
                meta.version.as_deref().unwrap_or("unknown"),
                meta.created_date.as_deref().unwrap_or("unknown"),
                meta.complaint_records.map_or("?".to_string(), |n| n.to_string()),
                meta.location_records.map_or("?".to_string(), |n| n.to_string()),
            );
        }

        let raw_complaints = self.complaint_data.len();
        let complaints: Vec<ComplaintRecord> = self
            .complaint_data
            .into_iter()
            .enumerate()
            .filter_map(|(row, data)| data.into_record(row))
            .collect();

        let raw_locations = self.location_data.len();
        let locations: Vec<LocationRecord> = self
            .location_data
            .into_iter()
            .enumerate()
            .filter_map(|(row, data)| data.into_record(row))
            .collect();

        if complaints.len() < raw_complaints {
            warn!(
                "Dropped {} complaint rows without an issue description or solution",
                raw_complaints - complaints.len()
            );
        }
        if locations.len() < raw_locations {
            warn!(
                "Dropped {} location rows without a site name",
                raw_locations - locations.len()
            );
        }
        info!(
            "Loaded corpus with {} complaints and {} locations",
            complaints.len(),
            locations.len()
        );

        CorpusIndex::new(complaints, locations)
    }
}

pub fn parse_snapshot(json: &str) -> Result<CorpusIndex> {
    let snapshot: CorpusSnapshot =
        serde_json::from_str(json).context("Failed to parse corpus snapshot JSON")?;
    Ok(snapshot.into_index())
}

/// Loads the snapshot at `path`. A missing or unreadable file is an error the
/// caller must treat as fatal; an empty but valid snapshot is not.
pub async fn load_snapshot(path: impl AsRef<Path>) -> Result<CorpusIndex> {
    let path = path.as_ref();
    info!("Loading corpus snapshot from {}", path.display());
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read corpus snapshot {}", path.display()))?;
    parse_snapshot(&json).with_context(|| format!("Invalid corpus snapshot {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SNAPSHOT: &str = r#"{
        "complaint_data": [
            {
                "Issue Description": "Call drops near KDY12",
                "Solution": "Optimised tilt",
                "Signal Strength": "Weak",
                "Qulity of Signal": null,
                "Lon": 80.6337,
                "Lat": "7.2906"
            },
            {
                "Issue Description": "No data",
                "Solution": "Reset APN",
                "Lon": "n/a",
                "Lat": ""
            },
            { "Issue Description": "Missing solution" },
            { "Issue Description": "   ", "Solution": "Blank issue" }
        ],
        "location_data": [
            {
                "Site Name": "Kandy Town",
                "RSRP Range 1 (>-105dBm) %": "82%",
                "RSRP Range 2 (-105~-110dBm) %": 10,
                "RSRP < -115dBm": null,
                "location_corrected.lat": 7.2906,
                "location_corrected.lon": 80.6337
            },
            { "RSRP Range 1 (>-105dBm) %": "50%" }
        ],
        "metadata": { "model_type": "unified_simple_model", "version": "1.0" }
    }"#;

    #[test]
    fn test_parse_snapshot_cleans_rows() {
        let corpus = parse_snapshot(SNAPSHOT).unwrap();
        assert_eq!(corpus.complaints().len(), 2);
        assert_eq!(corpus.locations().len(), 1);

        let first = &corpus.complaints()[0];
        assert_eq!(first.signal_strength.as_deref(), Some("Weak"));
        assert_eq!(first.quality_of_signal, None);
        assert_eq!(first.longitude, Some(80.6337));
        assert_eq!(first.latitude, Some(7.2906));

        let second = &corpus.complaints()[1];
        assert_eq!(second.longitude, None);
        assert_eq!(second.latitude, None);

        let site = &corpus.locations()[0];
        assert_eq!(site.site_name, "Kandy Town");
        assert_eq!(site.rsrp_above_105.as_deref(), Some("82%"));
        assert_eq!(site.rsrp_105_to_110.as_deref(), Some("10"));
        assert_eq!(site.rsrp_below_115, None);
    }

    #[test]
    fn test_empty_snapshot_is_valid() {
        let corpus = parse_snapshot("{}").unwrap();
        assert!(corpus.is_empty());
    }

    #[test]
    fn test_malformed_snapshot_is_an_error() {
        assert!(parse_snapshot("[1, 2").is_err());
    }

    #[tokio::test]
    async fn test_load_snapshot_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();

        let corpus = load_snapshot(file.path()).await.unwrap();
        assert_eq!(corpus.complaints().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_snapshot(dir.path().join("absent.json")).await;
        assert!(result.is_err());
    }
}
