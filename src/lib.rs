// src/lib.rs
pub mod batch;
pub mod corpus;
pub mod matching;
pub mod models;
pub mod utils;

pub use corpus::CorpusIndex;
pub use matching::ResolutionEngine;
pub use models::{
    ComplaintConditions, ComplaintRecord, Evidence, IncomingComplaint, LocationContext,
    LocationRecord, NearestSiteReport, Resolution, StrategyLabel,
};
