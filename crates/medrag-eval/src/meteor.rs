//! METEOR with exact and stem alignment stages (no synonym stage).
//!
//! Stems come from the Snowball English (Porter2) stemmer rather than the
//! original Porter stemmer, so a few stem matches differ from NLTK's
//! `meteor_score` (for example on `generously`).

use crate::tokenize::word_tokens;
use rust_stemmers::{Algorithm, Stemmer};

const ALPHA: f64 = 0.9;
const BETA: f64 = 3.0;
const GAMMA: f64 = 0.5;

type Enumerated = Vec<(usize, String)>;

/// Greedy matching from the end of both sequences; matched words are removed
/// from the candidate pools.
fn match_enums(hypothesis: &mut Enumerated, reference: &mut Enumerated) -> Vec<(usize, usize)> {
    let mut matches = Vec::new();
    for i in (0..hypothesis.len()).rev() {
        if let Some(j) = (0..reference.len()).rev().find(|&j| hypothesis[i].1 == reference[j].1) {
            matches.push((hypothesis[i].0, reference[j].0));
            hypothesis.remove(i);
            reference.remove(j);
        }
    }
    matches
}

fn align(hypothesis: &[String], reference: &[String]) -> Vec<(usize, usize)> {
    let mut hyp: Enumerated = hypothesis.iter().cloned().enumerate().collect();
    let mut gold: Enumerated = reference.iter().cloned().enumerate().collect();
    let mut matches = match_enums(&mut hyp, &mut gold);

    let stemmer = Stemmer::create(Algorithm::English);
    let mut hyp_stems: Enumerated = hyp.iter().map(|(i, w)| (*i, stemmer.stem(w).into_owned())).collect();
    let mut gold_stems: Enumerated = gold.iter().map(|(i, w)| (*i, stemmer.stem(w).into_owned())).collect();
    matches.extend(match_enums(&mut hyp_stems, &mut gold_stems));

    matches.sort_by_key(|&(h, _)| h);
    matches
}

/// Number of runs of matches that are contiguous in both sequences.
fn count_chunks(matches: &[(usize, usize)]) -> usize {
    if matches.is_empty() {
        return 0;
    }
    1 + matches.windows(2).filter(|w| !(w[1].0 == w[0].0 + 1 && w[1].1 == w[0].1 + 1)).count()
}

/// METEOR for one prediction/reference pair.
pub fn meteor_score(prediction: &str, reference: &str) -> f64 {
    let hypothesis = word_tokens(prediction);
    let gold = word_tokens(reference);
    if hypothesis.is_empty() || gold.is_empty() {
        return 0.0;
    }

    let matches = align(&hypothesis, &gold);
    let matched = matches.len() as f64;
    if matched == 0.0 {
        return 0.0;
    }

    let precision = matched / hypothesis.len() as f64;
    let recall = matched / gold.len() as f64;
    let fmean = precision * recall / (ALPHA * precision + (1.0 - ALPHA) * recall);
    let fragmentation = count_chunks(&matches) as f64 / matched;
    let penalty = GAMMA * fragmentation.powf(BETA);
    (1.0 - penalty) * fmean
}
