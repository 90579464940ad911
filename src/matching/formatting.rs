// src/matching/formatting.rs
// Renders stored solution text as a short numbered list.

use regex::Regex;

use super::normalize::normalize_text;
use crate::models::StrategyLabel;

pub const MAX_SOLUTION_ITEMS: usize = 4;
pub const NO_SOLUTION_MESSAGE: &str = "No solution generated.";
const FALLBACK_ITEM: &str =
    "Please contact technical support for detailed analysis and assistance with this issue.";

// `N.` or `N)` at the start of the text or after whitespace.
const ITEM_MARKER: &str = r"(?:^|\s)\d+[.)]\s+";

fn starts_with_marker(text: &str) -> bool {
    Regex::new(r"^\d+[.)]\s+").map_or(false, |re| re.is_match(text))
}

fn split_with(pattern: &str, text: &str) -> Vec<String> {
    match Regex::new(pattern) {
        Ok(re) => re
            .split(text)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        Err(_) => vec![text.trim().to_string()],
    }
}

/// Drops a leading upper-case heading such as `PRIMARY SOLUTION:`.
fn strip_heading(paragraph: &str) -> String {
    match Regex::new(r"^\s*[A-Z ]+:\s*") {
        Ok(re) => re.replace(paragraph, "").trim().to_string(),
        Err(_) => paragraph.trim().to_string(),
    }
}

/// Formats solution text as up to four numbered, location-free paragraphs
/// followed by a `[Solution type: <label>]` marker.
///
/// Items are split on `N.` markers when the text opens with one or holds at
/// least two, otherwise on blank lines.
pub fn format_solution_paragraphs(solution_text: &str, label: StrategyLabel) -> String {
    let trimmed = solution_text.trim();
    if trimmed.is_empty() {
        return NO_SOLUTION_MESSAGE.to_string();
    }

    let mut raw_items = split_with(ITEM_MARKER, trimmed);
    if raw_items.len() < 2 && !starts_with_marker(trimmed) {
        raw_items = split_with(r"\n\s*\n", trimmed);
    }

    let mut paragraphs: Vec<String> = raw_items
        .iter()
        .map(|item| strip_heading(&normalize_text(item)))
        .filter(|item| !item.is_empty())
        .take(MAX_SOLUTION_ITEMS)
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect();

    if paragraphs.is_empty() {
        paragraphs.push(format!("1. {}", FALLBACK_ITEM));
    }

    format!("{}\n\n[Solution type: {}]", paragraphs.join("\n\n"), label)
}
