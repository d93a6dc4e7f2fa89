//! Layered, typed configuration.
//!
//! Uses Figment to merge a TOML file + `config.<env>.toml` + `APP_*` env vars
//! (nested keys separated by `__`, e.g. `APP_RETRIEVAL__K=5`), then extracts
//! and validates [`Settings`]. Provides helpers to expand `~` and `${VAR}` and
//! to resolve relative paths against the config file's directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub paths: PathsConfig,
    pub models: ModelsConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
    pub train_answers_path: PathBuf,
    pub test_questions_path: PathBuf,
    pub test_answers_path: PathBuf,
    pub index_path: PathBuf,
    #[serde(default)]
    pub report_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsConfig {
    pub embedding_model: String,
    #[serde(default)]
    pub embedding_model_dir: Option<PathBuf>,
    pub generation_model: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self { Self { k: 3 } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub test_size: usize,
    pub seed: u64,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub concurrency: usize,
    pub limit: Option<usize>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self { test_size: 1000, seed: 42, temperature: 0.0, max_output_tokens: 256, concurrency: 4, limit: None }
    }
}

fn default_api_base_url() -> String { DEFAULT_API_BASE_URL.to_string() }

impl Settings {
    /// Range checks that can be made without seeing the corpus.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidConfiguration(msg));
        if self.retrieval.k == 0 {
            return invalid("retrieval.k must be at least 1".to_string());
        }
        let ev = &self.evaluation;
        if ev.test_size == 0 {
            return invalid("evaluation.test_size must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&ev.temperature) {
            return invalid(format!("evaluation.temperature must be within 0.0..=2.0, got {}", ev.temperature));
        }
        if ev.max_output_tokens == 0 {
            return invalid("evaluation.max_output_tokens must be greater than 0".to_string());
        }
        if ev.concurrency == 0 {
            return invalid("evaluation.concurrency must be at least 1".to_string());
        }
        if ev.limit == Some(0) {
            return invalid("evaluation.limit must be greater than 0 when set".to_string());
        }
        if self.models.embedding_model.trim().is_empty() {
            return invalid("models.embedding_model must not be empty".to_string());
        }
        if self.models.generation_model.trim().is_empty() {
            return invalid("models.generation_model must not be empty".to_string());
        }
        Ok(())
    }

    /// Expand and anchor every configured path at `base`.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let p = &mut self.paths;
        for path in [
            &mut p.data_dir,
            &mut p.train_answers_path,
            &mut p.test_questions_path,
            &mut p.test_answers_path,
            &mut p.index_path,
        ] {
            *path = resolve_with_base(base, path.to_string_lossy());
        }
        if let Some(report) = p.report_path.as_mut() {
            *report = resolve_with_base(base, report.to_string_lossy());
        }
        if let Some(dir) = self.models.embedding_model_dir.as_mut() {
            *dir = resolve_with_base(base, dir.to_string_lossy());
        }
        self
    }
}

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    /// Load `config.toml` from the working directory.
    pub fn load() -> Result<Self> { Self::from_file("config.toml") }

    /// Load `path`, then the environment overlay next to it, then `APP_*` vars.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = expand_path(path.as_ref().to_string_lossy());
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file(&path));
        let overlay = match env_name.as_str() {
            "dev" | "development" => Some("config.dev.toml"),
            "prod" | "production" => Some("config.prod.toml"),
            "test" | "testing" => Some("config.test.toml"),
            _ => None,
        };
        if let Some(name) = overlay {
            figment = figment.merge(Toml::file(base_dir.join(name)));
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));
        Ok(Self { figment, base_dir })
    }

    /// Build from an in-memory value; used by tests and embedding callers.
    pub fn from_settings(settings: &Settings, base_dir: impl Into<PathBuf>) -> Self {
        Self { figment: Figment::from(Serialized::defaults(settings)), base_dir: base_dir.into() }
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfiguration(format!("failed to get '{key}': {e}")))
    }

    /// Extract, path-resolve and validate the typed settings.
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfiguration(e.to_string()))?;
        let settings = settings.resolve_paths(&self.base_dir);
        settings.validate()?;
        Ok(settings)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
