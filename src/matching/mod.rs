// src/matching/mod.rs
pub mod exact;
pub mod formatting;
pub mod location;
pub mod nearest_site;
pub mod normalize;
pub mod signature;
pub mod similarity;
pub mod strategy;

pub use strategy::{select_strategy, ResolutionEngine};
