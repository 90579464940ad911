// src/matching/normalize.rs
// Strips location-identifying tokens from complaint and solution text.

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

/// Neutral phrase substituted for site/cell identifiers such as `KDY123A`.
pub const SITE_PLACEHOLDER: &str = "the area";
pub const SIGNAL_LEVEL_PLACEHOLDER: &str = "current signal level";

// Applied in order. Percentages go before bare numbers, otherwise the number
// rule eats the digits and leaves a stray `%` behind.
const LOCATION_PATTERNS: [(&str, &str); 5] = [
    (r"\b[A-Z]+\d+[A-Z]*\b", SITE_PLACEHOLDER),
    (r"-?\b\d+(?:\.\d+)?\s?dBm\b", SIGNAL_LEVEL_PLACEHOLDER),
    (r"\b\d+(?:\.\d+)?%", ""),
    (r"\b\d+\.\d+\b", ""),
    (r"\b\d+\b", ""),
];

// Cleanup of artifacts left by the removals above.
const CLEANUP_PATTERNS: [(&str, &str); 3] = [
    (r"\s+", " "),
    (r",(?:\s*,)+", ","),
    (r"\s+,", ","),
];

fn compile(patterns: &[(&'static str, &'static str)]) -> Vec<(Regex, &'static str)> {
    patterns
        .iter()
        .filter_map(|(pattern, replacement)| match Regex::new(pattern) {
            Ok(re) => Some((re, *replacement)),
            Err(e) => {
                warn!("Skipping invalid normalization pattern {}: {}", pattern, e);
                None
            }
        })
        .collect()
}

static LOCATION_REGEXES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| compile(&LOCATION_PATTERNS));
static CLEANUP_REGEXES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| compile(&CLEANUP_PATTERNS));

/// Removes site codes, measurements and percentages, then tidies whitespace and
/// comma runs. Case is preserved. Empty or whitespace-only input is returned as is.
///
/// The function is a fixed point on its own output.
pub fn normalize_text(text: &str) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    let mut result = text.to_string();
    for (re, replacement) in LOCATION_REGEXES.iter().chain(CLEANUP_REGEXES.iter()) {
        result = re.replace_all(&result, *replacement).into_owned();
    }

    result.trim().to_string()
}
