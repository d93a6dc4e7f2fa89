//! ROUGE-L: longest-common-subsequence overlap between token sequences.

use crate::tokenize::rouge_tokens;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RougeScore {
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
}

fn lcs_len(a: &[String], b: &[String]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            curr[j + 1] = if x == y { prev[j] + 1 } else { curr[j].max(prev[j + 1]) };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// ROUGE-L for one prediction/reference pair.
pub fn rouge_l(prediction: &str, reference: &str) -> RougeScore {
    let predicted = rouge_tokens(prediction);
    let gold = rouge_tokens(reference);
    if predicted.is_empty() || gold.is_empty() {
        return RougeScore::default();
    }

    let lcs = lcs_len(&gold, &predicted) as f64;
    let precision = lcs / predicted.len() as f64;
    let recall = lcs / gold.len() as f64;
    let fmeasure = if precision + recall > 0.0 { 2.0 * precision * recall / (precision + recall) } else { 0.0 };
    RougeScore { precision, recall, fmeasure }
}
