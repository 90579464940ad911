// src/matching/location.rs
// Location context: nearest site by raw coordinate distance, or by site name.

use log::debug;

use crate::corpus::CorpusIndex;
use crate::models::{CoverageQuality, LocationContext, LocationRecord};

/// Fixed description of the three-tier signal convention attached to every context.
pub const SIGNAL_DISTRIBUTION_LABEL: &str =
    "Good coverage, Fair coverage, Poor coverage based on area signal quality";

/// Parses an RSRP bucket such as `"82.5%"`. Missing or unparsable values read as 0.
pub fn parse_percentage(raw: Option<&str>) -> f64 {
    raw.map(|value| value.trim().trim_end_matches('%').trim())
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// "Good" when more than `good_coverage_percent` of samples sit above -105dBm.
pub fn classify_coverage(site: &LocationRecord, good_coverage_percent: f64) -> CoverageQuality {
    if parse_percentage(site.rsrp_above_105.as_deref()) > good_coverage_percent {
        CoverageQuality::Good
    } else {
        CoverageQuality::Poor
    }
}

fn context_for(site: &LocationRecord, good_coverage_percent: f64) -> LocationContext {
    LocationContext {
        site_name: site.site_name.clone(),
        coverage_quality: classify_coverage(site, good_coverage_percent),
        signal_distribution: SIGNAL_DISTRIBUTION_LABEL,
    }
}

/// Closest site by planar distance in raw degrees, if any lies under `proximity_threshold`.
/// Sites whose coordinates did not parse are skipped.
pub fn closest_site_by_coordinates<'a>(
    corpus: &'a CorpusIndex,
    longitude: f64,
    latitude: f64,
    proximity_threshold: f64,
) -> Option<&'a LocationRecord> {
    let mut closest: Option<(&LocationRecord, f64)> = None;

    for site in corpus.locations() {
        let (Some(site_lon), Some(site_lat)) = (site.longitude, site.latitude) else {
            continue;
        };
        let distance = ((longitude - site_lon).powi(2) + (latitude - site_lat).powi(2)).sqrt();
        if !(distance < proximity_threshold) {
            continue;
        }
        if closest.map_or(true, |(_, best)| distance < best) {
            closest = Some((site, distance));
        }
    }

    closest.map(|(site, _)| site)
}

/// First site (in table order) whose name contains the query or is contained by it.
pub fn site_by_name<'a>(corpus: &'a CorpusIndex, location_name: &str) -> Option<&'a LocationRecord> {
    let query = location_name.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    corpus.locations().iter().find(|site| {
        let site_name = site.site_name.trim().to_lowercase();
        !site_name.is_empty() && (site_name.contains(&query) || query.contains(&site_name))
    })
}

/// Resolves the location context for a complaint. Coordinates are tried first
/// (both must be present and finite); the site name is the fallback.
pub fn locate(
    corpus: &CorpusIndex,
    longitude: Option<f64>,
    latitude: Option<f64>,
    location_name: Option<&str>,
    proximity_threshold: f64,
    good_coverage_percent: f64,
) -> Option<LocationContext> {
    if corpus.locations().is_empty() {
        return None;
    }

    let finite = |value: Option<f64>| value.filter(|v| v.is_finite());
    if let (Some(lon), Some(lat)) = (finite(longitude), finite(latitude)) {
        if let Some(site) = closest_site_by_coordinates(corpus, lon, lat, proximity_threshold) {
            debug!("Location context from coordinates: {}", site.site_name);
            return Some(context_for(site, good_coverage_percent));
        }
    }

    let site = site_by_name(corpus, location_name?)?;
    debug!("Location context from site name: {}", site.site_name);
    Some(context_for(site, good_coverage_percent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::engine_config::{COORDINATE_PROXIMITY_THRESHOLD, GOOD_COVERAGE_PERCENT};

    fn site(name: &str, above_105: &str, lat: f64, lon: f64) -> LocationRecord {
        LocationRecord {
            site_name: name.to_string(),
            rsrp_above_105: Some(above_105.to_string()),
            latitude: Some(lat),
            longitude: Some(lon),
            ..Default::default()
        }
    }

    fn corpus() -> CorpusIndex {
        CorpusIndex::new(
            Vec::new(),
            vec![
                site("Colombo Fort", "85%", 6.9344, 79.8428),
                site("Kandy Town", "55.5%", 7.2906, 80.6337),
                site("Colombo Fort South", "71", 6.9300, 79.8430),
            ],
        )
    }

    fn locate_default(lon: Option<f64>, lat: Option<f64>, name: Option<&str>) -> Option<LocationContext> {
        locate(&corpus(), lon, lat, name, COORDINATE_PROXIMITY_THRESHOLD, GOOD_COVERAGE_PERCENT)
    }

    #[test]
    fn test_parse_percentage() {
        assert_eq!(parse_percentage(Some("82.5%")), 82.5);
        assert_eq!(parse_percentage(Some(" 70 % ")), 70.0);
        assert_eq!(parse_percentage(Some("n/a")), 0.0);
        assert_eq!(parse_percentage(None), 0.0);
    }

    #[test]
    fn test_coordinate_mode_picks_closest_within_threshold() {
        let context = locate_default(Some(79.8431), Some(6.9302), None).unwrap();
        assert_eq!(context.site_name, "Colombo Fort South");
        assert_eq!(context.coverage_quality, CoverageQuality::Good);
        assert_eq!(context.signal_distribution, SIGNAL_DISTRIBUTION_LABEL);
    }

    #[test]
    fn test_far_coordinates_fall_back_to_name() {
        let context = locate_default(Some(81.0), Some(8.0), Some("KANDY")).unwrap();
        assert_eq!(context.site_name, "Kandy Town");
        assert_eq!(context.coverage_quality, CoverageQuality::Poor);

        assert!(locate_default(Some(81.0), Some(8.0), None).is_none());
    }

    #[test]
    fn test_name_mode_matches_in_both_directions() {
        assert_eq!(
            locate_default(None, None, Some("colombo fort")).unwrap().site_name,
            "Colombo Fort"
        );
        assert_eq!(
            locate_default(None, None, Some("Near Kandy Town clock tower")).unwrap().site_name,
            "Kandy Town"
        );
        assert!(locate_default(None, None, Some("  ")).is_none());
    }

    #[test]
    fn test_single_coordinate_uses_name_only() {
        assert!(locate_default(Some(79.8428), None, None).is_none());
    }

    #[test]
    fn test_good_iff_bucket_exceeds_seventy() {
        assert_eq!(classify_coverage(&site("a", "70%", 0.0, 0.0), GOOD_COVERAGE_PERCENT), CoverageQuality::Poor);
        assert_eq!(classify_coverage(&site("a", "70.1%", 0.0, 0.0), GOOD_COVERAGE_PERCENT), CoverageQuality::Good);
        assert_eq!(classify_coverage(&site("a", "garbage", 0.0, 0.0), GOOD_COVERAGE_PERCENT), CoverageQuality::Poor);
    }

    #[test]
    fn test_non_finite_query_coordinates_are_absent() {
        let corpus = CorpusIndex::new(Vec::new(), vec![site("Far", "90%", 7.0, 80.0)]);
        assert!(locate(&corpus, Some(f64::NAN), Some(6.0), None, 0.01, 70.0).is_none());
        assert!(locate(&corpus, Some(80.0), Some(f64::INFINITY), None, 0.01, 70.0).is_none());
        assert!(closest_site_by_coordinates(&corpus, f64::NAN, 7.0, 0.01).is_none());

        let by_name = locate(&corpus, Some(f64::NAN), Some(f64::NAN), Some("far"), 0.01, 70.0).unwrap();
        assert_eq!(by_name.site_name, "Far");
    }

    #[test]
    fn test_sites_without_coordinates_are_skipped() {
        let corpus = CorpusIndex::new(
            Vec::new(),
            vec![LocationRecord {
                site_name: "Galle".to_string(),
                rsrp_above_105: Some("90%".to_string()),
                ..Default::default()
            }],
        );
        assert!(closest_site_by_coordinates(&corpus, 80.2, 6.03, COORDINATE_PROXIMITY_THRESHOLD).is_none());
        assert!(locate(&CorpusIndex::empty(), Some(80.2), Some(6.03), Some("Galle"), 0.01, 70.0).is_none());
    }
}
