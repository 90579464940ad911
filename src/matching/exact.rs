// src/matching/exact.rs
// Exact-match detection by signature equality over the historical corpus.

use log::debug;

use super::formatting::format_solution_paragraphs;
use super::normalize::normalize_text;
use super::signature::{build_signature, Signature};
use crate::corpus::CorpusIndex;
use crate::models::{ComplaintConditions, ComplaintRecord, StrategyLabel};

/// Signature of a stored record, rebuilt from its own issue text and conditions.
pub fn historical_signature(record: &ComplaintRecord) -> Signature {
    let issue = normalize_text(&record.issue_description);
    build_signature(&issue, &record.signature_conditions())
}

/// First record (in corpus order) whose signature equals the complaint's.
pub fn find_exact_match_record<'a>(
    corpus: &'a CorpusIndex,
    complaint_text: &str,
    conditions: &ComplaintConditions,
) -> Option<(usize, &'a ComplaintRecord)> {
    if corpus.complaints().is_empty() {
        return None;
    }

    let incoming = build_signature(complaint_text, conditions);
    let found = corpus
        .complaints()
        .iter()
        .enumerate()
        .find(|(_, record)| historical_signature(record) == incoming);

    match found {
        Some((position, _)) => debug!("Exact match at corpus position {} (signature {})", position, incoming),
        None => debug!(
            "No exact match for signature {} across {} records",
            incoming,
            corpus.complaints().len()
        ),
    }
    found
}

/// The matched record's solution, formatted as an `exact_match` answer.
pub fn find_exact_match(
    corpus: &CorpusIndex,
    complaint_text: &str,
    conditions: &ComplaintConditions,
) -> Option<String> {
    find_exact_match_record(corpus, complaint_text, conditions)
        .map(|(_, record)| format_solution_paragraphs(&record.solution, StrategyLabel::ExactMatch))
}
