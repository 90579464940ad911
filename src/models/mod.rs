pub mod records;
pub mod resolution;
pub mod stats_models;

pub use records::{ComplaintConditions, ComplaintRecord, ConditionKey, IncomingComplaint, LocationRecord};
pub use resolution::{
    CoverageQuality, Evidence, LocationContext, NearbySite, NearestSiteReport, Resolution,
    SimilarityCandidate, StrategyLabel,
};
