//! Domain types shared by the index, retriever, generator and evaluator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One question/answer pair of the source corpus. Never mutated after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusRecord {
    pub question: String,
    pub answer: String,
}

impl CorpusRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self { question: question.into(), answer: answer.into() }
    }
}

/// A single nearest-neighbour result.
///
/// `distance` is the squared Euclidean distance to the query (lower is
/// better). `index` is the position of the passage in the training pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub distance: f32,
    pub index: usize,
}

/// A passage returned by the retriever, nearest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    pub distance: f32,
    pub index: usize,
    pub text: String,
}

/// One held-out question together with its gold and generated answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub question: String,
    pub reference_answer: String,
    pub predicted_answer: String,
}

/// Pipeline stage, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Split,
    Index,
    Retrieve,
    Generate,
    Evaluate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Split => "split",
            Stage::Index => "index",
            Stage::Retrieve => "retrieve",
            Stage::Generate => "generate",
            Stage::Evaluate => "evaluate",
        };
        f.write_str(name)
    }
}

/// A per-record failure isolated during batch evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFailure {
    /// Position of the question in the test set.
    pub position: usize,
    pub question: String,
    pub stage: Stage,
    pub message: String,
}

impl fmt::Display for RecordFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] question #{} ({:?}): {}", self.stage, self.position, self.question, self.message)
    }
}
