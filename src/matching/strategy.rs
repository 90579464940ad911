// src/matching/strategy.rs
// Picks a resolution strategy for each incoming complaint and gathers its evidence.

use log::debug;

use super::exact::find_exact_match;
use super::location::locate;
use super::nearest_site::find_nearest_site;
use super::similarity::find_similar;
use crate::corpus::CorpusIndex;
use crate::models::{
    ComplaintConditions, ComplaintRecord, Evidence, IncomingComplaint, LocationContext,
    NearestSiteReport, Resolution, StrategyLabel,
};
use crate::utils::engine_config::EngineConfig;

/// Strategy for a complaint with no exact match, given how much evidence was found.
pub fn select_strategy(
    similar_count: usize,
    has_location_context: bool,
    comprehensive_min_similar: usize,
) -> StrategyLabel {
    if similar_count == 0 {
        StrategyLabel::NewComplaint
    } else if has_location_context && similar_count >= comprehensive_min_similar {
        StrategyLabel::ComprehensiveAnalysis
    } else {
        StrategyLabel::PatternAnalysis
    }
}

/// Read-only matching engine over a loaded corpus.
///
/// Built once at startup and shared by reference (or `Arc`) across requests.
/// Nothing here mutates the corpus, so concurrent `resolve` calls need no locking.
#[derive(Debug)]
pub struct ResolutionEngine {
    corpus: CorpusIndex,
    config: EngineConfig,
}

impl ResolutionEngine {
    pub fn new(corpus: CorpusIndex, config: EngineConfig) -> Self {
        Self { corpus, config }
    }

    pub fn find_exact_match(&self, complaint_text: &str, conditions: &ComplaintConditions) -> Option<String> {
        find_exact_match(&self.corpus, complaint_text, conditions)
    }

    pub fn find_similar(&self, complaint_text: &str, top_n: usize) -> Vec<ComplaintRecord> {
        find_similar(&self.corpus, complaint_text, top_n, self.config.similarity_threshold)
    }

    pub fn locate(
        &self,
        longitude: Option<f64>,
        latitude: Option<f64>,
        location_name: Option<&str>,
    ) -> Option<LocationContext> {
        locate(
            &self.corpus,
            longitude,
            latitude,
            location_name,
            self.config.proximity_threshold,
            self.config.good_coverage_percent,
        )
    }

    /// Resolves one complaint. An exact match short-circuits everything else.
    pub fn resolve(&self, complaint: &IncomingComplaint) -> Resolution {
        let conditions = &complaint.conditions;

        if let Some(solution) = self.find_exact_match(&complaint.complaint, conditions) {
            debug!("Strategy {} selected", StrategyLabel::ExactMatch);
            return Resolution {
                strategy: StrategyLabel::ExactMatch,
                evidence: Evidence::ExactMatch { solution },
            };
        }

        let location_context = self.locate(
            conditions.longitude,
            conditions.latitude,
            conditions.location_name.as_deref(),
        );
        let similar_cases = self.find_similar(&complaint.complaint, self.config.top_n);

        let strategy = select_strategy(
            similar_cases.len(),
            location_context.is_some(),
            self.config.comprehensive_min_similar,
        );
        debug!(
            "Strategy {} selected ({} similar cases, location context: {})",
            strategy,
            similar_cases.len(),
            location_context.is_some()
        );

        Resolution {
            strategy,
            evidence: Evidence::Retrieved {
                similar_cases,
                location_context,
            },
        }
    }

    pub fn nearest_site(&self, lat: f64, lon: f64) -> Option<NearestSiteReport> {
        find_nearest_site(&self.corpus, lat, lon, self.config.nearby_radius_km)
    }
}
