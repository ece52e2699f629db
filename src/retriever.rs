//! Turns a free-text query into monument context lines.
//!
//! Retrieval is best effort: any embedding or search failure is logged and
//! produces an empty context instead of an error.

use std::{collections::HashSet, sync::Arc};

use crate::{
    catalog::Catalog,
    semantic::{Embedder, EmbeddingError, IndexError, MonumentLabel, VectorSearch},
};

/// Candidates fetched per requested result, so a city filter has room to work.
pub const DEFAULT_OVERFETCH_FACTOR: usize = 3;

/// Source of grounding context for the prompt.
pub trait ContextRetriever: Send + Sync {
    /// At most `top_k` context lines, best first. Never fails; an empty
    /// result means "no context".
    fn retrieve(&self, query: &str, city_filter: Option<&str>, top_k: usize) -> Vec<String>;
}

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),
}

pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorSearch>,
    labels: Arc<[MonumentLabel]>,
    catalog: Arc<Catalog>,
    overfetch_factor: usize,
}

impl Retriever {
    /// `labels[i]` must describe vector `i` of `index`.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorSearch>,
        labels: Vec<MonumentLabel>,
        catalog: Arc<Catalog>,
    ) -> Self {
        Self {
            embedder,
            index,
            labels: labels.into(),
            catalog,
            overfetch_factor: DEFAULT_OVERFETCH_FACTOR,
        }
    }

    pub fn with_overfetch_factor(mut self, factor: usize) -> Self {
        self.overfetch_factor = factor.max(1);
        self
    }

    /// Nearest labels for `query`, nearest first, without duplicates.
    pub fn candidates(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<&MonumentLabel>, RetrievalError> {
        let query_vector = self.embedder.embed(query)?;
        let neighbors = self
            .index
            .search(&query_vector, top_k.saturating_mul(self.overfetch_factor))?;

        let mut seen = HashSet::new();
        Ok(neighbors
            .iter()
            .filter_map(|neighbor| {
                log::trace!("candidate {} at distance {:.4}", neighbor.id, neighbor.distance);
                let label = self.labels.get(neighbor.id);
                if label.is_none() {
                    log::warn!("index id {} has no label", neighbor.id);
                }
                label
            })
            .filter(|label| seen.insert(label.key()))
            .collect())
    }
}

/// Pick `top_k` labels, same-city ones first when a filter is given.
///
/// Relative order inside the same-city and other-city groups is preserved.
pub fn select<'a>(
    candidates: Vec<&'a MonumentLabel>,
    city_filter: Option<&str>,
    top_k: usize,
) -> Vec<&'a MonumentLabel> {
    let mut selected = match city_filter {
        Some(city) => {
            let (mut same, others): (Vec<_>, Vec<_>) =
                candidates.into_iter().partition(|label| label.in_city(city));
            same.extend(others);
            same
        }
        None => candidates,
    };
    selected.truncate(top_k);
    selected
}

impl ContextRetriever for Retriever {
    fn retrieve(&self, query: &str, city_filter: Option<&str>, top_k: usize) -> Vec<String> {
        if top_k == 0 {
            return vec![];
        }

        let candidates = match self.candidates(query, top_k) {
            Ok(candidates) => candidates,
            Err(err) => {
                log::warn!("retrieval failed, continuing without context: {err}");
                return vec![];
            }
        };

        let selected = select(candidates, city_filter, top_k);
        log::debug!(
            "retrieved {} monuments for {query:?} (city filter: {city_filter:?})",
            selected.len()
        );

        selected
            .into_iter()
            .map(|label| self.catalog.describe(label))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<MonumentLabel> {
        vec![
            MonumentLabel::new("Agra", "Taj Mahal"),
            MonumentLabel::new("Jaipur", "Amber Fort"),
            MonumentLabel::new("Delhi", "Red Fort"),
            MonumentLabel::new("jaipur", "Hawa Mahal"),
        ]
    }

    #[test]
    fn test_select_without_filter_keeps_distance_order() {
        let labels = labels();
        let picked = select(labels.iter().collect(), None, 2);
        assert_eq!(picked, vec![&labels[0], &labels[1]]);
    }

    #[test]
    fn test_select_prefers_city_then_backfills() {
        let labels = labels();
        let picked = select(labels.iter().collect(), Some("Jaipur"), 3);
        assert_eq!(picked, vec![&labels[1], &labels[3], &labels[0]]);
    }

    #[test]
    fn test_select_city_only_when_enough_matches() {
        let labels = labels();
        let picked = select(labels.iter().collect(), Some("JAIPUR"), 2);
        assert!(picked.iter().all(|label| label.in_city("jaipur")));
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn test_select_unknown_city_falls_back_to_distance_order() {
        let labels = labels();
        let picked = select(labels.iter().collect(), Some("Mumbai"), 2);
        assert_eq!(picked, vec![&labels[0], &labels[1]]);
    }
}
