// src/matching/similarity.rs
// Token-overlap retrieval of similar historical complaints.

use log::debug;
use std::collections::HashSet;

use super::normalize::normalize_text;
use crate::corpus::CorpusIndex;
use crate::models::{ComplaintRecord, SimilarityCandidate};

/// Lower-cased whitespace tokens of the normalized text.
pub fn token_set(text: &str) -> HashSet<String> {
    normalize_text(text)
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

pub fn jaccard_similarity(set1: &HashSet<String>, set2: &HashSet<String>) -> f64 {
    let intersection = set1.intersection(set2).count();
    let union = set1.union(set2).count();

    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Jaccard score between two free texts after normalization.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    jaccard_similarity(&token_set(a), &token_set(b))
}

/// Every record scoring above `threshold`, best first, at most `top_n` long.
/// Ties keep corpus order. Returned records carry the stored texts as they
/// are, see [`find_similar`] for the location-stripped form.
pub fn find_similar_scored(
    corpus: &CorpusIndex,
    complaint_text: &str,
    top_n: usize,
    threshold: f64,
) -> Vec<SimilarityCandidate> {
    let query = token_set(complaint_text);

    let mut candidates: Vec<SimilarityCandidate> = corpus
        .complaints()
        .iter()
        .filter_map(|record| {
            let score = jaccard_similarity(&query, &token_set(&record.issue_description));
            (score > threshold).then(|| SimilarityCandidate {
                record: record.clone(),
                score,
            })
        })
        .collect();

    // sort_by is stable, so equal scores stay in corpus order
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.truncate(top_n);

    debug!(
        "Similarity: {} of {} records above {} (returning top {})",
        candidates.len(),
        corpus.complaints().len(),
        threshold,
        top_n
    );
    candidates
}

/// Similar records with issue and solution text stripped of location tokens.
pub fn find_similar(
    corpus: &CorpusIndex,
    complaint_text: &str,
    top_n: usize,
    threshold: f64,
) -> Vec<ComplaintRecord> {
    find_similar_scored(corpus, complaint_text, top_n, threshold)
        .into_iter()
        .map(|candidate| {
            let mut record = candidate.record;
            record.issue_description = normalize_text(&record.issue_description);
            record.solution = normalize_text(&record.solution);
            record
        })
        .collect()
}
