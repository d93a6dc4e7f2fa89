use tracing::debug;

use medrag_core::error::{Error, Result};
use medrag_core::normalize::normalize;
use medrag_core::traits::Embedder;
use medrag_core::types::RetrievedPassage;

use crate::index::FlatIndex;

/// Maps a question to the nearest training-pool passages.
///
/// Borrows the index, the passage list it was built from and the embedder
/// that produced it; holds no state of its own.
pub struct Retriever<'a> {
    index: &'a FlatIndex,
    passages: &'a [String],
    embedder: &'a dyn Embedder,
}

impl<'a> Retriever<'a> {
    pub fn new(index: &'a FlatIndex, passages: &'a [String], embedder: &'a dyn Embedder) -> Result<Self> {
        if index.len() != passages.len() {
            return Err(Error::InvalidInput(format!(
                "index holds {} vectors but {} passages were supplied",
                index.len(),
                passages.len()
            )));
        }
        if index.dim() != embedder.dim() {
            return Err(Error::InvalidConfiguration(format!(
                "index dimension {} does not match embedder dimension {}",
                index.dim(),
                embedder.dim()
            )));
        }
        if !index.model_id().is_empty() && index.model_id() != embedder.model_id() {
            return Err(Error::InvalidConfiguration(format!(
                "index was built with '{}' but the embedder is '{}'",
                index.model_id(),
                embedder.model_id()
            )));
        }
        Ok(Self { index, passages, embedder })
    }

    /// Top-`k` passages for `query_text`, nearest first.
    pub fn retrieve(&self, query_text: &str, k: usize) -> Result<Vec<RetrievedPassage>> {
        let query = normalize(query_text);
        let vector = self.embedder.embed_one(&query)?;
        let hits = self.index.search(&vector, k)?;
        debug!(query = %query, hits = hits.len(), "retrieved");
        Ok(hits
            .into_iter()
            .map(|h| RetrievedPassage { distance: h.distance, index: h.index, text: self.passages[h.index].clone() })
            .collect())
    }

    pub fn retrieve_texts(&self, query_text: &str, k: usize) -> Result<Vec<String>> {
        Ok(self.retrieve(query_text, k)?.into_iter().map(|p| p.text).collect())
    }
}
