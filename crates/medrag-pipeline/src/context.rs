use tracing::info;

use medrag_core::config::Settings;
use medrag_core::corpus::SplitFiles;
use medrag_core::error::Result;
use medrag_core::normalize::normalize;
use medrag_core::traits::Embedder;
use medrag_core::types::RetrievedPassage;
use medrag_generate::{build_prompt, GenerationRequest, Generator};
use medrag_vector::{FlatIndex, Retriever};

/// Everything a query needs, loaded once and passed by reference.
pub struct RagContext {
    settings: Settings,
    index: FlatIndex,
    passages: Vec<String>,
    embedder: Box<dyn Embedder>,
    generator: Box<dyn Generator>,
}

/// A generated answer together with the passages it was conditioned on.
#[derive(Debug, Clone)]
pub struct Answer {
    pub question: String,
    pub passages: Vec<RetrievedPassage>,
    pub text: String,
}

impl RagContext {
    /// Assemble a context, checking that the index, passages and embedder agree.
    pub fn new(
        settings: Settings,
        index: FlatIndex,
        passages: Vec<String>,
        embedder: Box<dyn Embedder>,
        generator: Box<dyn Generator>,
    ) -> Result<Self> {
        Retriever::new(&index, &passages, embedder.as_ref())?;
        Ok(Self { settings, index, passages, embedder, generator })
    }

    /// Load the persisted index and training answers named by `settings`.
    pub fn load(settings: Settings, embedder: Box<dyn Embedder>, generator: Box<dyn Generator>) -> Result<Self> {
        let index = FlatIndex::load(&settings.paths.index_path)?;
        let passages = SplitFiles::from(&settings.paths).load_train_answers()?;
        info!(vectors = index.len(), dim = index.dim(), model = index.model_id(), "context loaded");
        Self::new(settings, index, passages, embedder, generator)
    }

    pub fn settings(&self) -> &Settings { &self.settings }

    pub fn index(&self) -> &FlatIndex { &self.index }

    pub fn passages(&self) -> &[String] { &self.passages }

    pub(crate) fn generator(&self) -> &dyn Generator { self.generator.as_ref() }

    pub fn retriever(&self) -> Result<Retriever<'_>> {
        Retriever::new(&self.index, &self.passages, self.embedder.as_ref())
    }

    /// Generation request for `question` with the configured model and limits.
    pub fn request(&self, question: &str, passages: &[String]) -> GenerationRequest {
        GenerationRequest {
            prompt: build_prompt(question, passages),
            model: self.settings.models.generation_model.clone(),
            temperature: self.settings.evaluation.temperature,
            max_tokens: self.settings.evaluation.max_output_tokens,
        }
    }

    /// Retrieve `retrieval.k` passages for `question` and generate an answer.
    /// The prompt carries the normalised question.
    pub async fn answer(&self, question: &str) -> Result<Answer> {
        let normalized = normalize(question);
        let passages = self.retriever()?.retrieve(&normalized, self.settings.retrieval.k)?;
        let texts: Vec<String> = passages.iter().map(|p| p.text.clone()).collect();
        let request = self.request(&normalized, &texts);
        let text = self.generator.generate(&request).await?;
        Ok(Answer { question: question.to_string(), passages, text })
    }
}
