//! Batch evaluation over the held-out set.
//!
//! Retrieval runs sequentially. Generation runs with at most
//! `evaluation.concurrency` requests in flight; every result lands in the slot
//! of its test-set position, so predictions stay aligned with references
//! whatever order the requests complete in. A failing record is logged,
//! recorded as a [`RecordFailure`] and left out of the metrics.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};

use medrag_core::error::{Error, Result};
use medrag_core::types::{EvaluationRecord, RecordFailure, Stage};
use medrag_eval::MetricReport;
use medrag_generate::GenerationRequest;

use crate::context::RagContext;

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationRun {
    pub generated_at: DateTime<Utc>,
    /// Questions offered for evaluation (after `evaluation.limit`).
    pub attempted: usize,
    /// Successfully answered records, in test-set order.
    pub records: Vec<EvaluationRecord>,
    /// Records that failed, in test-set order.
    pub failures: Vec<RecordFailure>,
    pub report: MetricReport,
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} answers ({percent}%) {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

impl RagContext {
    /// Answer every question and score the answers against `references`.
    ///
    /// Fails with `InvalidInput` when the inputs are empty or of different
    /// lengths, or when no record could be answered.
    pub async fn evaluate(&self, questions: &[String], references: &[String]) -> Result<EvaluationRun> {
        if questions.len() != references.len() {
            return Err(Error::InvalidInput(format!(
                "{} questions but {} reference answers",
                questions.len(),
                references.len()
            )));
        }
        if questions.is_empty() {
            return Err(Error::InvalidInput("no questions to evaluate".to_string()));
        }

        let settings = self.settings();
        let n = settings.evaluation.limit.map_or(questions.len(), |limit| limit.min(questions.len()));
        let questions = &questions[..n];
        let references = &references[..n];
        let k = settings.retrieval.k;
        info!(questions = n, k, concurrency = settings.evaluation.concurrency, "evaluating");

        let failure = |position: usize, stage: Stage, err: &Error| {
            warn!(position, %stage, error = %err, "record failed");
            RecordFailure { position, question: questions[position].clone(), stage, message: err.to_string() }
        };

        let mut failures = Vec::new();
        let mut pending: Vec<(usize, GenerationRequest)> = Vec::with_capacity(n);
        let retriever = self.retriever()?;
        for (position, question) in questions.iter().enumerate() {
            match retriever.retrieve_texts(question, k) {
                Ok(passages) => pending.push((position, self.request(question, &passages))),
                Err(err) => failures.push(failure(position, Stage::Retrieve, &err)),
            }
        }

        let pb = progress_bar(pending.len());
        let generator = self.generator();
        let mut slots: Vec<Option<String>> = vec![None; n];
        let mut responses = stream::iter(pending)
            .map(|(position, request)| async move { (position, generator.generate(&request).await) })
            .buffer_unordered(settings.evaluation.concurrency);
        while let Some((position, result)) = responses.next().await {
            match result {
                Ok(text) => slots[position] = Some(text),
                Err(err) => failures.push(failure(position, Stage::Generate, &err)),
            }
            pb.inc(1);
        }
        pb.finish_with_message("done");
        failures.sort_by_key(|f| f.position);

        let records: Vec<EvaluationRecord> = slots
            .into_iter()
            .enumerate()
            .filter_map(|(position, slot)| {
                slot.map(|predicted_answer| EvaluationRecord {
                    question: questions[position].clone(),
                    reference_answer: references[position].clone(),
                    predicted_answer,
                })
            })
            .collect();
        if records.is_empty() {
            return Err(Error::InvalidInput(format!("all {n} records failed; nothing to score")));
        }

        let predictions: Vec<String> = records.iter().map(|r| r.predicted_answer.clone()).collect();
        let gold: Vec<String> = records.iter().map(|r| r.reference_answer.clone()).collect();
        let report = medrag_eval::evaluate(&predictions, &gold)?;
        info!(scored = records.len(), failed = failures.len(), "evaluation finished");

        Ok(EvaluationRun { generated_at: Utc::now(), attempted: n, records, failures, report })
    }
}
