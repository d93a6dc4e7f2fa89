//! Per-pair token overlap metrics.

use crate::tokenize::word_tokens;
use std::collections::HashSet;

/// Token-level F1 over lowercased word tokens.
///
/// Overlap is the size of the intersection of the two token *sets*, while
/// precision and recall divide by the full token counts, so repeated tokens
/// lower the score. Returns 0.0 when either side has no tokens or nothing is
/// shared.
pub fn token_f1(prediction: &str, reference: &str) -> f64 {
    let predicted = word_tokens(prediction);
    let gold = word_tokens(reference);
    if predicted.is_empty() || gold.is_empty() {
        return 0.0;
    }

    let predicted_set: HashSet<&str> = predicted.iter().map(String::as_str).collect();
    let gold_set: HashSet<&str> = gold.iter().map(String::as_str).collect();
    let common = predicted_set.intersection(&gold_set).count();
    if common == 0 {
        return 0.0;
    }

    let precision = common as f64 / predicted.len() as f64;
    let recall = common as f64 / gold.len() as f64;
    2.0 * precision * recall / (precision + recall)
}

/// 1 when the trimmed, lowercased strings are equal, else 0.
pub fn exact_match(prediction: &str, reference: &str) -> u8 {
    u8::from(prediction.trim().to_lowercase() == reference.trim().to_lowercase())
}
