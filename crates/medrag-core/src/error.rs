use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Dimension mismatch at embedding {position}: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize, position: usize },

    #[error("Invalid query: expected dimension {expected}, found {found}")]
    InvalidQuery { expected: usize, found: usize },

    #[error("Invalid k: {0} (must be at least 1)")]
    InvalidK(usize),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Corrupt index artifact: {0}")]
    CorruptIndex(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
