/// Text embedding capability.
///
/// Implementations must return one vector per input, in input order, and every
/// vector must have length `dim()` for the lifetime of the embedder.
pub trait Embedder: Send + Sync {
    /// Stable identifier of the underlying model, recorded in index artifacts.
    fn model_id(&self) -> &str;
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> crate::Result<Vec<Vec<f32>>>;

    fn embed_one(&self, text: &str) -> crate::Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| crate::Error::Embedding("embedder returned no vector".to_string()))
    }
}
