//! Flat in-memory vector index with exact Euclidean search.
//!
//! Vectors are addressed by insertion position, which is what keeps the
//! index aligned with the label file written next to it.

/// Nearest-neighbour search capability.
pub trait VectorSearch: Send + Sync {
    /// Return up to `k` closest vector ids, nearest first.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError>;
}

/// Search hit from the index.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    /// Position of the vector in the index
    pub id: usize,
    /// Squared Euclidean distance to the query
    pub distance: f32,
}

/// Exact nearest-neighbour index over a flat list of vectors.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    vectors: Vec<Vec<f32>>,
    dimensions: usize,
}

impl FlatIndex {
    /// Create a new empty index with specified dimensions.
    pub fn new(dimensions: usize) -> Self {
        Self {
            vectors: Vec::new(),
            dimensions,
        }
    }

    /// Create an index with pre-allocated capacity.
    pub fn with_capacity(dimensions: usize, capacity: usize) -> Self {
        Self {
            vectors: Vec::with_capacity(capacity),
            dimensions,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Append vectors. Ids continue from the current length.
    ///
    /// Nothing is added when any vector has the wrong dimensions.
    pub fn add(&mut self, vectors: Vec<Vec<f32>>) -> Result<(), IndexError> {
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimensions) {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                got: bad.len(),
            });
        }

        self.vectors.extend(vectors);
        Ok(())
    }

    /// Get a vector by id.
    #[cfg(test)]
    pub fn get(&self, id: usize) -> Option<&[f32]> {
        self.vectors.get(id).map(Vec::as_slice)
    }

    /// Iterate over all vectors in id order.
    pub fn iter(&self) -> impl Iterator<Item = &[f32]> {
        self.vectors.iter().map(Vec::as_slice)
    }

    fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
    }
}

impl VectorSearch for FlatIndex {
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError> {
        if query.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                got: query.len(),
            });
        }

        let mut results: Vec<Neighbor> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(id, vector)| Neighbor {
                id,
                distance: Self::squared_l2(query, vector),
            })
            .collect();

        // stable sort: equal distances keep id order
        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        results.truncate(k);

        Ok(results)
    }
}

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}
