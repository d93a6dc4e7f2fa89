//! medrag-core
//!
//! Shared building blocks for the retrieval-augmented QA pipeline: error type,
//! typed settings, domain types, capability traits, text normalisation, the
//! reproducible corpus splitter and JSONL persistence of the split.

pub mod config;
pub mod corpus;
pub mod error;
pub mod normalize;
pub mod split;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use normalize::normalize;
pub use split::{split, Split};
