use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use medrag_core::error::{Error, Result};
use medrag_core::traits::Embedder;

use crate::index::FlatIndex;

/// Embed `passages` in batches and build an index tagged with the embedder's
/// model id. Row `j` of the index is the embedding of `passages[j]`.
pub fn embed_and_build(embedder: &dyn Embedder, passages: &[String], batch_size: usize) -> Result<FlatIndex> {
    if passages.is_empty() {
        return Err(Error::InvalidInput("no passages to index".to_string()));
    }
    let batch_size = batch_size.max(1);
    info!(passages = passages.len(), model = embedder.model_id(), "embedding training pool");
    let pb = ProgressBar::new(passages.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} passages ({percent}%) {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    let mut embeddings = Vec::with_capacity(passages.len());
    for batch in passages.chunks(batch_size) {
        let vectors = embedder.embed_batch(batch)?;
        if vectors.len() != batch.len() {
            return Err(Error::Embedding(format!(
                "embedder returned {} vectors for {} inputs",
                vectors.len(),
                batch.len()
            )));
        }
        embeddings.extend(vectors);
        pb.set_position(embeddings.len() as u64);
    }
    pb.finish_with_message("done");

    let index = FlatIndex::build(&embeddings)?.with_model_id(embedder.model_id());
    info!(vectors = index.len(), dim = index.dim(), "index built");
    Ok(index)
}
