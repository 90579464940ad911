// src/corpus/mod.rs
pub mod snapshot;

use crate::models::{ComplaintRecord, LocationRecord};

/// The historical complaint table and the site table, in load order.
///
/// Constructed once at startup and never mutated afterwards; there are no
/// `&mut self` methods. Every lookup is a linear scan.
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    complaints: Vec<ComplaintRecord>,
    locations: Vec<LocationRecord>,
}

impl CorpusIndex {
    pub fn new(complaints: Vec<ComplaintRecord>, locations: Vec<LocationRecord>) -> Self {
        Self { complaints, locations }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn complaints(&self) -> &[ComplaintRecord] {
        &self.complaints
    }

    pub fn locations(&self) -> &[LocationRecord] {
        &self.locations
    }

    pub fn is_empty(&self) -> bool {
        self.complaints.is_empty() && self.locations.is_empty()
    }
}
