use crate::bleu::{corpus_bleu, BleuScore, MAX_ORDER};
use crate::meteor::meteor_score;
use crate::rouge::rouge_l;
use crate::token::{exact_match, token_f1};
use medrag_core::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate and per-example scores for one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricReport {
    pub count: usize,
    pub bleu: BleuScore,
    /// Mean ROUGE-L F-measure over pairs.
    pub rouge_l: f64,
    pub meteor: f64,
    /// Mean of `f1_scores`.
    pub token_f1: f64,
    /// Mean of `em_scores`.
    pub exact_match: f64,
    pub f1_scores: Vec<f64>,
    pub em_scores: Vec<u8>,
}

impl MetricReport {
    /// Named scalar scores, in a stable order for printing.
    pub fn scores(&self) -> BTreeMap<String, f64> {
        let mut scores = BTreeMap::new();
        for (order, precision) in self.bleu.precisions.iter().enumerate() {
            scores.insert(format!("BLEU-{}", order + 1), *precision);
        }
        scores.insert("BLEU".to_string(), self.bleu.bleu);
        scores.insert("ROUGE-L".to_string(), self.rouge_l);
        scores.insert("METEOR".to_string(), self.meteor);
        scores.insert("Token F1".to_string(), self.token_f1);
        scores.insert("Exact Match".to_string(), self.exact_match);
        scores
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Score `predictions` against `references` pairwise.
pub fn evaluate(predictions: &[String], references: &[String]) -> Result<MetricReport> {
    if predictions.len() != references.len() {
        return Err(Error::InvalidInput(format!(
            "{} predictions but {} references",
            predictions.len(),
            references.len()
        )));
    }
    if predictions.is_empty() {
        return Err(Error::InvalidInput("nothing to evaluate".to_string()));
    }

    let pairs = || predictions.iter().zip(references);
    let f1_scores: Vec<f64> = pairs().map(|(p, r)| token_f1(p, r)).collect();
    let em_scores: Vec<u8> = pairs().map(|(p, r)| exact_match(p, r)).collect();
    let bleu = corpus_bleu(predictions, references, MAX_ORDER, true);
    let rouge_l = mean(pairs().map(|(p, r)| rouge_l(p, r).fmeasure));
    let meteor = mean(pairs().map(|(p, r)| meteor_score(p, r)));

    tracing::debug!(count = predictions.len(), bleu = bleu.bleu, rouge_l, meteor, "Computed metrics");

    Ok(MetricReport {
        count: predictions.len(),
        token_f1: mean(f1_scores.iter().copied()),
        exact_match: mean(em_scores.iter().map(|&e| f64::from(e))),
        bleu,
        rouge_l,
        meteor,
        f1_scores,
        em_scores,
    })
}
