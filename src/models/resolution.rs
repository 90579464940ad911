// src/models/resolution.rs
// Derived values produced by a resolution call.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::records::ComplaintRecord;

/// The four terminal states of the strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyLabel {
    ExactMatch,
    ComprehensiveAnalysis,
    PatternAnalysis,
    NewComplaint,
}

impl StrategyLabel {
    pub const ALL: [StrategyLabel; 4] = [
        StrategyLabel::ExactMatch,
        StrategyLabel::ComprehensiveAnalysis,
        StrategyLabel::PatternAnalysis,
        StrategyLabel::NewComplaint,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyLabel::ExactMatch => "exact_match",
            StrategyLabel::ComprehensiveAnalysis => "comprehensive_analysis",
            StrategyLabel::PatternAnalysis => "pattern_analysis",
            StrategyLabel::NewComplaint => "new_complaint",
        }
    }
}

impl fmt::Display for StrategyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CoverageQuality {
    Good,
    Poor,
}

/// Coarse coverage picture for the site nearest to (or named by) a complaint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationContext {
    pub site_name: String,
    pub coverage_quality: CoverageQuality,
    pub signal_distribution: &'static str,
}

/// A historical record annotated with its Jaccard score against the query.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityCandidate {
    pub record: ComplaintRecord,
    pub score: f64,
}

/// Supporting evidence handed to the downstream generation step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Evidence {
    /// The stored solution of a record whose signature matched, pre-formatted.
    ExactMatch { solution: String },
    /// Similar historical cases (location tokens stripped) plus optional site context.
    Retrieved {
        similar_cases: Vec<ComplaintRecord>,
        location_context: Option<LocationContext>,
    },
}

/// Exactly one of these is produced per incoming complaint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub strategy: StrategyLabel,
    pub evidence: Evidence,
}

impl Resolution {
    pub fn similar_cases(&self) -> &[ComplaintRecord] {
        match &self.evidence {
            Evidence::Retrieved { similar_cases, .. } => similar_cases,
            Evidence::ExactMatch { .. } => &[],
        }
    }

    pub fn location_context(&self) -> Option<&LocationContext> {
        match &self.evidence {
            Evidence::Retrieved { location_context, .. } => location_context.as_ref(),
            Evidence::ExactMatch { .. } => None,
        }
    }

    /// Solution text usable when no downstream generation is available.
    ///
    /// Exact matches return the matched solution; peer-backed strategies return
    /// the best similar case's solution formatted under their own label. A new
    /// complaint has nothing historical to offer.
    pub fn draft_solution(&self) -> Option<String> {
        match (&self.evidence, self.strategy) {
            (Evidence::ExactMatch { solution }, _) => Some(solution.clone()),
            (_, StrategyLabel::NewComplaint) => None,
            (Evidence::Retrieved { similar_cases, .. }, label) => similar_cases
                .first()
                .map(|case| crate::matching::formatting::format_solution_paragraphs(&case.solution, label)),
        }
    }
}

/// One row of a nearest-site report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbySite {
    pub site_name: String,
    pub rsrp_range_1: Option<String>,
    pub rsrp_range_2: Option<String>,
    pub rsrp_range_3: Option<String>,
    pub rsrp_below_115: Option<String>,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestSiteReport {
    pub nearest_site: NearbySite,
    pub nearby_sites: Vec<NearbySite>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_label_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&StrategyLabel::ComprehensiveAnalysis).unwrap(),
            "\"comprehensive_analysis\""
        );
        assert_eq!(StrategyLabel::NewComplaint.to_string(), "new_complaint");
    }

    #[test]
    fn test_draft_solution_per_strategy() {
        let exact = Resolution {
            strategy: StrategyLabel::ExactMatch,
            evidence: Evidence::ExactMatch {
                solution: "1. Reset APN\n\n[Solution type: exact_match]".to_string(),
            },
        };
        assert_eq!(
            exact.draft_solution().as_deref(),
            Some("1. Reset APN\n\n[Solution type: exact_match]")
        );

        let case = ComplaintRecord {
            issue_description: "slow data".to_string(),
            solution: "Clear the cache".to_string(),
            ..Default::default()
        };
        let pattern = Resolution {
            strategy: StrategyLabel::PatternAnalysis,
            evidence: Evidence::Retrieved {
                similar_cases: vec![case],
                location_context: None,
            },
        };
        assert_eq!(
            pattern.draft_solution().as_deref(),
            Some("1. Clear the cache\n\n[Solution type: pattern_analysis]")
        );

        let fresh = Resolution {
            strategy: StrategyLabel::NewComplaint,
            evidence: Evidence::Retrieved {
                similar_cases: Vec::new(),
                location_context: None,
            },
        };
        assert!(fresh.draft_solution().is_none());
        assert!(fresh.similar_cases().is_empty());
    }
}
