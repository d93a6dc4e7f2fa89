use std::path::PathBuf;
use tracing::info;

use medrag_core::config::Settings;
use medrag_core::corpus::SplitFiles;
use medrag_core::error::Result;
use medrag_core::split::{split, Split};
use medrag_core::traits::Embedder;
use medrag_core::types::CorpusRecord;
use medrag_vector::embed_and_build;

pub const EMBED_BATCH_SIZE: usize = 32;

/// What [`build_artifacts`] wrote.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub split: Split,
    pub split_files: SplitFiles,
    pub index_path: PathBuf,
    pub vectors: usize,
    pub dim: usize,
}

/// Split the (normalised) corpus, persist the three split files, embed the
/// training answers and persist the index.
pub fn build_artifacts(settings: &Settings, corpus: &[CorpusRecord], embedder: &dyn Embedder) -> Result<BuildSummary> {
    let ev = &settings.evaluation;
    let split = split(corpus, ev.test_size, ev.seed)?;
    let partition = split.partition(corpus)?;

    let split_files = SplitFiles::from(&settings.paths);
    split_files.persist(&partition)?;

    let index = embed_and_build(embedder, &partition.train_answers, EMBED_BATCH_SIZE)?;
    index.save(&settings.paths.index_path)?;
    info!(train = split.train_indices.len(), test = split.test_indices.len(), "artifacts built");

    Ok(BuildSummary {
        split,
        split_files,
        index_path: settings.paths.index_path.clone(),
        vectors: index.len(),
        dim: index.dim(),
    })
}
