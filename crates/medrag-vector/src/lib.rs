//! medrag-vector
//!
//! Exact nearest-neighbour index over passage embeddings, its on-disk
//! artifact, and the retriever that maps a question to ranked passages.

pub mod builder;
pub mod index;
pub mod retriever;
pub mod store;

pub use builder::embed_and_build;
pub use index::FlatIndex;
pub use retriever::Retriever;
