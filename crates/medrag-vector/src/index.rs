use std::cmp::Ordering;

use medrag_core::error::{Error, Result};
use medrag_core::types::SearchHit;

/// Brute-force index under squared Euclidean distance.
///
/// Vectors are stored row-major in insertion order; row `j` is the embedding
/// of passage `j` of the training pool.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatIndex {
    pub(crate) dim: usize,
    pub(crate) data: Vec<f32>,
    pub(crate) model_id: String,
}

impl FlatIndex {
    /// Build from one embedding per passage. All embeddings must share one
    /// non-zero dimension.
    pub fn build(embeddings: &[Vec<f32>]) -> Result<Self> {
        let first = embeddings
            .first()
            .ok_or_else(|| Error::InvalidInput("cannot build an index from zero embeddings".to_string()))?;
        let dim = first.len();
        if dim == 0 {
            return Err(Error::InvalidInput("embeddings must have at least one dimension".to_string()));
        }
        let mut data = Vec::with_capacity(dim * embeddings.len());
        for (position, e) in embeddings.iter().enumerate() {
            if e.len() != dim {
                return Err(Error::DimensionMismatch { expected: dim, found: e.len(), position });
            }
            data.extend_from_slice(e);
        }
        Ok(Self { dim, data, model_id: String::new() })
    }

    /// Tag the index with the embedding model that produced it.
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn dim(&self) -> usize { self.dim }

    pub fn len(&self) -> usize { self.data.len() / self.dim }

    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    pub fn model_id(&self) -> &str { &self.model_id }

    pub fn vector(&self, i: usize) -> Option<&[f32]> {
        self.data.get(i * self.dim..(i + 1) * self.dim)
    }

    /// The `k` nearest stored vectors, nearest first.
    ///
    /// `k` larger than the index is clamped to the index size; `k == 0` is
    /// rejected. Equal distances are ordered by ascending stored index.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if query.len() != self.dim {
            return Err(Error::InvalidQuery { expected: self.dim, found: query.len() });
        }
        if k == 0 {
            return Err(Error::InvalidK(k));
        }
        let k = k.min(self.len());
        let mut hits: Vec<SearchHit> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(index, row)| SearchHit { distance: squared_l2(query, row), index })
            .collect();
        if k < hits.len() {
            hits.select_nth_unstable_by(k - 1, hit_order);
            hits.truncate(k);
        }
        hits.sort_unstable_by(hit_order);
        Ok(hits)
    }
}

fn hit_order(a: &SearchHit, b: &SearchHit) -> Ordering {
    a.distance.total_cmp(&b.distance).then(a.index.cmp(&b.index))
}

pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| { let d = x - y; d * d }).sum()
}
