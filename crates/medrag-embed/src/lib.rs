//! medrag-embed
//!
//! Embedding capability implementations. [`BertEmbedder`] runs a BERT-family
//! sentence-embedding model (e.g. `all-MiniLM-L6-v2`) locally with candle and
//! mean-pools the token states; [`FakeEmbedder`] hashes tokens into a fixed
//! vector and is selected by `APP_USE_FAKE_EMBEDDINGS=1` for fast and
//! deterministic runs in tests and development.

use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};
use twox_hash::XxHash64;

use medrag_core::config::ModelsConfig;
use medrag_core::error::Error;
use medrag_core::traits::Embedder;

pub mod device;
pub mod pool;
pub mod tokenize;

pub use pool::masked_mean_l2;

/// Dimension of the hashing embedder; matches MiniLM-class models.
pub const FAKE_EMBEDDING_DIM: usize = 384;

pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    model_id: String,
    dim: usize,
    max_len: usize,
}

impl BertEmbedder {
    /// Load `config.json`, `tokenizer.json` and the weights from `model_dir`.
    pub fn load(model_id: &str, model_dir: &Path) -> Result<Self> {
        let device = device::select_device();
        info!(model = model_id, dir = %model_dir.display(), "loading embedding model");

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;

        let config_path = model_dir.join("config.json");
        let raw: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(&config_path).with_context(|| format!("reading {}", config_path.display()))?,
        )?;
        let dim = raw["hidden_size"].as_u64().ok_or_else(|| anyhow!("config.json lacks hidden_size"))? as usize;
        let max_len = raw["max_position_embeddings"].as_u64().unwrap_or(512).min(512) as usize;
        let config: BertConfig = serde_json::from_value(raw)?;

        let weights = load_weights(model_dir, &device)?;
        let vb = VarBuilder::from_tensors(weights, DType::F32, &device);
        let model = BertModel::load(vb, &config)?;
        info!(dim, max_len, "embedding model loaded");
        Ok(Self { model, tokenizer, device, model_id: model_id.to_string(), dim, max_len })
    }

    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let start = Instant::now();
        let (input_ids, attention_mask) = tokenize::tokenize_on_device(&self.tokenizer, text, self.max_len, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        let v: Vec<f32> = pooled.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1()?;
        if v.len() != self.dim { return Err(anyhow!("model produced {} values, expected {}", v.len(), self.dim)); }
        if start.elapsed().as_millis() > 250 { debug!(ms = start.elapsed().as_millis() as u64, "slow embedding"); }
        Ok(v)
    }
}

fn load_weights(model_dir: &Path, device: &Device) -> Result<HashMap<String, Tensor>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        return Ok(candle_core::safetensors::load(&safetensors, device)?);
    }
    let pickle = model_dir.join("pytorch_model.bin");
    if pickle.exists() {
        let weights = candle_core::pickle::read_all(&pickle)?;
        return Ok(weights.into_iter().collect());
    }
    Err(anyhow!("no model.safetensors or pytorch_model.bin in {}", model_dir.display()))
}

impl Embedder for BertEmbedder {
    fn model_id(&self) -> &str { &self.model_id }
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { self.max_len }
    fn embed_batch(&self, texts: &[String]) -> medrag_core::Result<Vec<Vec<f32>>> {
        texts
            .iter()
            .map(|t| self.embed_text(t).map_err(|e| Error::Embedding(format!("{e:#}"))))
            .collect()
    }
}

/// Bag-of-hashed-tokens embedder. Identical texts map to identical unit vectors
/// and texts sharing tokens land close together.
pub struct FakeEmbedder { dim: usize, model_id: String }

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim, model_id: format!("fake:xxhash64:d{dim}") } }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v { *x /= norm; }
        v
    }
}

impl Embedder for FakeEmbedder {
    fn model_id(&self) -> &str { &self.model_id }
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { usize::MAX }
    fn embed_batch(&self, texts: &[String]) -> medrag_core::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

fn use_fake_embeddings() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// The embedder for `models`, or the [`FakeEmbedder`] when
/// `APP_USE_FAKE_EMBEDDINGS` is set.
pub fn get_default_embedder(models: &ModelsConfig) -> Result<Box<dyn Embedder>> {
    if use_fake_embeddings() {
        warn!("using FakeEmbedder; retrieval quality is not meaningful");
        return Ok(Box::new(FakeEmbedder::new(FAKE_EMBEDDING_DIM)));
    }
    let dir = resolve_model_dir(models)?;
    Ok(Box::new(BertEmbedder::load(&models.embedding_model, &dir)?))
}

fn resolve_model_dir(models: &ModelsConfig) -> Result<PathBuf> {
    if let Some(dir) = &models.embedding_model_dir {
        if dir.exists() { return Ok(dir.clone()); }
        return Err(anyhow!("models.embedding_model_dir {} does not exist", dir.display()));
    }
    for var in ["APP_MODEL_DIR", "MODEL_DIR"] {
        if let Ok(dir) = std::env::var(var) {
            let p = PathBuf::from(&dir);
            if p.exists() { info!("using {}: {}", var, p.display()); return Ok(p); }
        }
    }
    let name = models.embedding_model.rsplit('/').next().unwrap_or(&models.embedding_model);
    let local = Path::new("models").join(name);
    if local.exists() { return Ok(local); }
    Err(anyhow!("Could not locate model directory for {}", models.embedding_model))
}
