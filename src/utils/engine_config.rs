// src/utils/engine_config.rs
use log::{info, warn};
use std::env;
use std::str::FromStr;

/// Minimum Jaccard score a historical record must exceed to count as similar.
pub const SIMILARITY_THRESHOLD: f64 = 0.1;
/// Maximum number of similar records returned per complaint.
pub const DEFAULT_TOP_N: usize = 5;
/// Raw coordinate-degree distance under which a site counts as the complaint's location.
/// Planar and unit-inconsistent with the km radius used by nearest-site lookup.
pub const COORDINATE_PROXIMITY_THRESHOLD: f64 = 0.01;
/// Share of samples above -105dBm (percent) a site needs to be labelled "Good".
pub const GOOD_COVERAGE_PERCENT: f64 = 70.0;
/// Similar records needed, together with a location context, for comprehensive analysis.
pub const COMPREHENSIVE_MIN_SIMILAR: usize = 3;
/// Great-circle radius for the nearby-site list.
pub const NEARBY_SITE_RADIUS_KM: f64 = 2.0;
pub const DEFAULT_SNAPSHOT_PATH: &str = "models/unified_complaint_model.json";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub similarity_threshold: f64,
    pub top_n: usize,
    pub proximity_threshold: f64,
    pub good_coverage_percent: f64,
    pub comprehensive_min_similar: usize,
    pub nearby_radius_km: f64,
    pub snapshot_path: String,
    pub max_concurrent_resolutions: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: SIMILARITY_THRESHOLD,
            top_n: DEFAULT_TOP_N,
            proximity_threshold: COORDINATE_PROXIMITY_THRESHOLD,
            good_coverage_percent: GOOD_COVERAGE_PERCENT,
            comprehensive_min_similar: COMPREHENSIVE_MIN_SIMILAR,
            nearby_radius_km: NEARBY_SITE_RADIUS_KM,
            snapshot_path: DEFAULT_SNAPSHOT_PATH.to_string(),
            max_concurrent_resolutions: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    num_cpus::get().min(8)
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring unparsable {}={:?}, using default", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            similarity_threshold: env_or("SIMILARITY_THRESHOLD", defaults.similarity_threshold),
            top_n: env_or("SIMILARITY_TOP_N", defaults.top_n),
            proximity_threshold: env_or("LOCATION_PROXIMITY_DEGREES", defaults.proximity_threshold),
            good_coverage_percent: env_or("GOOD_COVERAGE_PERCENT", defaults.good_coverage_percent),
            comprehensive_min_similar: env_or(
                "COMPREHENSIVE_MIN_SIMILAR",
                defaults.comprehensive_min_similar,
            ),
            nearby_radius_km: env_or("NEARBY_SITE_RADIUS_KM", defaults.nearby_radius_km),
            snapshot_path: env::var("CORPUS_SNAPSHOT_PATH").unwrap_or(defaults.snapshot_path),
            max_concurrent_resolutions: env_or(
                "MAX_CONCURRENT_RESOLUTIONS",
                defaults.max_concurrent_resolutions,
            )
            .max(1),
        }
    }

    pub fn log_config(&self) {
        info!("Complaint resolution engine configuration:");
        info!("   Corpus snapshot: {}", self.snapshot_path);
        info!(
            "   Similarity: threshold > {}, top {}",
            self.similarity_threshold, self.top_n
        );
        info!(
            "   Location context: proximity < {} degree units, Good coverage > {}%",
            self.proximity_threshold, self.good_coverage_percent
        );
        info!(
            "   Comprehensive analysis needs {} similar cases plus location context",
            self.comprehensive_min_similar
        );
        info!("   Nearby-site radius: {} km", self.nearby_radius_km);
        info!("   Max concurrent resolutions: {}", self.max_concurrent_resolutions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_named_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.similarity_threshold, 0.1);
        assert_eq!(config.top_n, 5);
        assert_eq!(config.proximity_threshold, 0.01);
        assert_eq!(config.good_coverage_percent, 70.0);
        assert_eq!(config.comprehensive_min_similar, 3);
        assert_eq!(config.nearby_radius_km, 2.0);
        assert!(config.max_concurrent_resolutions >= 1);
    }

    #[test]
    fn test_from_env_overrides_and_falls_back() {
        env::set_var("SIMILARITY_TOP_N", "3");
        env::set_var("NEARBY_SITE_RADIUS_KM", "not-a-number");

        let config = EngineConfig::from_env();
        assert_eq!(config.top_n, 3);
        assert_eq!(config.nearby_radius_km, NEARBY_SITE_RADIUS_KM);

        // Cleanup
        env::remove_var("SIMILARITY_TOP_N");
        env::remove_var("NEARBY_SITE_RADIUS_KM");
    }
}
