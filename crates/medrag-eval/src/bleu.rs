//! Corpus-level BLEU with add-one smoothing on the n-gram precisions.

use crate::tokenize::tokenize_13a;
use serde::Serialize;
use std::collections::HashMap;

pub const MAX_ORDER: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BleuScore {
    pub bleu: f64,
    /// Modified n-gram precision for orders 1..=MAX_ORDER.
    pub precisions: Vec<f64>,
    pub brevity_penalty: f64,
    pub length_ratio: f64,
    pub translation_length: usize,
    pub reference_length: usize,
}

fn ngram_counts(tokens: &[String], max_order: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    for order in 1..=max_order {
        for gram in tokens.windows(order) {
            *counts.entry(gram).or_insert(0) += 1;
        }
    }
    counts
}

/// BLEU over all pairs at once: n-gram matches and lengths are pooled across
/// the corpus before precisions are taken. Each prediction has exactly one
/// reference. With `smooth`, every precision is `(matches + 1) / (possible + 1)`.
pub fn corpus_bleu(predictions: &[String], references: &[String], max_order: usize, smooth: bool) -> BleuScore {
    let mut matches_by_order = vec![0usize; max_order];
    let mut possible_by_order = vec![0usize; max_order];
    let mut translation_length = 0;
    let mut reference_length = 0;

    for (prediction, reference) in predictions.iter().zip(references) {
        let translation = tokenize_13a(prediction);
        let gold = tokenize_13a(reference);
        translation_length += translation.len();
        reference_length += gold.len();

        let gold_counts = ngram_counts(&gold, max_order);
        for (gram, count) in ngram_counts(&translation, max_order) {
            let clipped = count.min(gold_counts.get(gram).copied().unwrap_or(0));
            matches_by_order[gram.len() - 1] += clipped;
        }
        for order in 1..=max_order {
            possible_by_order[order - 1] += translation.len().saturating_sub(order - 1);
        }
    }

    let precisions: Vec<f64> = matches_by_order
        .iter()
        .zip(&possible_by_order)
        .map(|(&matches, &possible)| {
            if smooth {
                (matches as f64 + 1.0) / (possible as f64 + 1.0)
            } else if possible > 0 {
                matches as f64 / possible as f64
            } else {
                0.0
            }
        })
        .collect();

    let geo_mean = if precisions.iter().all(|&p| p > 0.0) {
        (precisions.iter().map(|p| p.ln()).sum::<f64>() / max_order as f64).exp()
    } else {
        0.0
    };

    let length_ratio = translation_length as f64 / reference_length.max(1) as f64;
    let brevity_penalty = if length_ratio > 1.0 {
        1.0
    } else if length_ratio == 0.0 {
        0.0
    } else {
        (1.0 - 1.0 / length_ratio).exp()
    };

    BleuScore {
        bleu: geo_mean * brevity_penalty,
        precisions,
        brevity_penalty,
        length_ratio,
        translation_length,
        reference_length,
    }
}
