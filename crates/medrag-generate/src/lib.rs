//! medrag-generate
//!
//! Prompt construction and the text-generation gateway. The gateway is a
//! trait so the pipeline can run against a remote chat-completions service,
//! the offline [`ExtractiveGenerator`], or a test stub.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use medrag_core::config::ModelsConfig;
use medrag_core::error::Result;

pub mod extractive;
pub mod openai;
pub mod prompt;

pub use extractive::ExtractiveGenerator;
pub use openai::OpenAiGenerator;
pub use prompt::build_prompt;

/// One generation call. `model` is the remote model identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Text-generation capability.
///
/// Failures surface as `Error::Generation`; implementations do not retry.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

fn use_fake_generation() -> bool {
    std::env::var("APP_USE_FAKE_GENERATION")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// The chat-completions client for `models`, or the [`ExtractiveGenerator`]
/// when `APP_USE_FAKE_GENERATION` is set.
pub fn get_default_generator(models: &ModelsConfig) -> Result<Box<dyn Generator>> {
    if use_fake_generation() {
        warn!("using ExtractiveGenerator; answers are copied from the top passage");
        return Ok(Box::new(ExtractiveGenerator));
    }
    Ok(Box::new(OpenAiGenerator::from_env(&models.api_base_url)?))
}
