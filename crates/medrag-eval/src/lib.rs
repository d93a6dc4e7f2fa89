//! medrag-eval
//!
//! Text-similarity metrics for generated answers against gold references:
//! token F1 and exact match per pair, corpus BLEU (orders 1-4), ROUGE-L and
//! METEOR, collected into a [`MetricReport`] by [`evaluate`].

pub mod bleu;
pub mod meteor;
pub mod report;
pub mod rouge;
pub mod token;
pub mod tokenize;

pub use bleu::{corpus_bleu, BleuScore};
pub use meteor::meteor_score;
pub use report::{evaluate, MetricReport};
pub use rouge::{rouge_l, RougeScore};
pub use token::{exact_match, token_f1};
