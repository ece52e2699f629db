//! Offline index build: catalog -> embeddings -> index file + label file.

use indicatif::{ProgressBar, ProgressStyle};

use crate::catalog::Catalog;
use crate::semantic::embeddings::{Embedder, EmbeddingError};
use crate::semantic::index::{FlatIndex, IndexError};
use crate::semantic::labels::{LabelError, LabelStorage, MonumentLabel};
use crate::semantic::storage::{IndexStorage, IndexStorageError};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Storage error: {0}")]
    Storage(#[from] IndexStorageError),

    #[error("Label error: {0}")]
    Labels(#[from] LabelError),

    #[error("embedder returned {got} vectors for {expected} texts")]
    CountMismatch { expected: usize, got: usize },
}

/// An index and its aligned labels, ready to be written.
pub struct BuiltIndex {
    pub index: FlatIndex,
    pub labels: Vec<MonumentLabel>,
}

impl BuiltIndex {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn save(
        &self,
        index_storage: &IndexStorage,
        label_storage: &LabelStorage,
        model_id: &[u8; 32],
    ) -> Result<(), BuildError> {
        index_storage.save(&self.index, model_id)?;
        label_storage.save(&self.labels)?;
        log::info!(
            "wrote {} vectors to {} and labels to {}",
            self.index.len(),
            index_storage.path().display(),
            label_storage.path().display()
        );
        Ok(())
    }
}

/// Embed every catalog monument, in catalog order, in batches of `batch_size`.
pub fn build_index(
    catalog: &Catalog,
    embedder: &dyn Embedder,
    batch_size: usize,
    show_progress: bool,
) -> Result<BuiltIndex, BuildError> {
    let records = catalog.records();
    let mut index = FlatIndex::with_capacity(embedder.dimensions(), records.len());
    let mut labels = Vec::with_capacity(records.len());

    let progress = if show_progress {
        ProgressBar::new(records.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} monuments embedded") {
        progress.set_style(style);
    }

    for chunk in records.chunks(batch_size.max(1)) {
        let texts: Vec<String> = chunk.iter().map(|r| r.embedding_text()).collect();
        let vectors = embedder.embed_batch(&texts)?;

        if vectors.len() != texts.len() {
            return Err(BuildError::CountMismatch {
                expected: texts.len(),
                got: vectors.len(),
            });
        }

        index.add(vectors)?;
        labels.extend(chunk.iter().map(|r| r.label()));
        progress.inc(chunk.len() as u64);
    }

    progress.finish_and_clear();

    Ok(BuiltIndex { index, labels })
}
