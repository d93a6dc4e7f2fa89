use async_trait::async_trait;

use medrag_core::error::Result;

use crate::prompt::context_passages;
use crate::{GenerationRequest, Generator};

pub const NO_ANSWER: &str = "I don't know";

/// Offline generator: answers with the nearest retrieved passage.
///
/// Useful as a retrieval-only baseline and for runs without network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractiveGenerator;

#[async_trait]
impl Generator for ExtractiveGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        Ok(context_passages(&request.prompt)
            .first()
            .map(|p| p.to_string())
            .unwrap_or_else(|| NO_ANSWER.to_string()))
    }
}
