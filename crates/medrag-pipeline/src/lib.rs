//! medrag-pipeline
//!
//! Ties the pieces together behind an explicit [`RagContext`]: building the
//! split and index artifacts, answering a single question, and batch
//! evaluation over the held-out set.

pub mod build;
pub mod context;
pub mod evaluate;

pub use build::{build_artifacts, BuildSummary, EMBED_BATCH_SIZE};
pub use context::{Answer, RagContext};
pub use evaluate::EvaluationRun;
