//! Semantic retrieval infrastructure for monument embeddings.
//!
//! # Architecture
//!
//! - `embeddings`: Wraps fastembed behind the [`Embedder`] capability
//! - `index`: Flat in-memory vector index with exact Euclidean search
//! - `storage`: Binary file I/O for the index file
//! - `labels`: JSON label file aligned with the index by position
//! - `builder`: Offline build from the monument catalog

pub mod builder;
pub mod embeddings;
mod index;
mod labels;
mod storage;

pub use builder::{build_index, BuildError, BuiltIndex};
pub use embeddings::{model_id_hash, Embedder, EmbeddingError, EmbeddingModel};
pub use index::{FlatIndex, IndexError, Neighbor, VectorSearch};
pub use labels::{LabelError, LabelStorage, MonumentLabel};
pub use storage::{IndexStorage, IndexStorageError};

/// Default embedding model name
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";
