//! Approximate-nearest-neighbor capability.
//!
//! The [`VectorIndex`] trait is the seam to whatever vector search backend
//! serves a corpus slice. The scoring pipeline only needs ranked
//! `(similarity, row)` pairs; rows index into the snapshot's project list.
//!
//! Two implementations ship with the core:
//!
//! - [`FlatIndex`]: brute-force cosine similarity over an in-memory
//!   row-major matrix.
//! - [`RemappedIndex`]: wraps the index of a corpus subset (the "recent"
//!   slice) and maps its local rows back to global project rows.

pub mod flat;

use anyhow::Result;
use async_trait::async_trait;

pub use flat::FlatIndex;

/// One retrieval result.
///
/// `row` is signed because ANN backends pad short result lists with `-1`;
/// the pipeline drops such hits, as well as hits with a non-finite
/// similarity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub similarity: f32,
    pub row: i64,
}

/// Vector search over one corpus slice.
///
/// Implementations must be `Send + Sync`; the snapshot holding them is
/// shared across concurrent requests.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Number of vectors (rows) in the index.
    fn len(&self) -> usize;

    /// Returns true if the index holds no vectors.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vector dimensionality.
    fn dims(&self) -> usize;

    /// Up to `k` hits ranked by descending similarity.
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<Hit>>;
}

#[async_trait]
impl<T: VectorIndex + ?Sized> VectorIndex for Box<T> {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn dims(&self) -> usize {
        (**self).dims()
    }

    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<Hit>> {
        (**self).search(query, k).await
    }
}

/// An index over a subset of the corpus whose rows map to global rows.
pub struct RemappedIndex<I> {
    inner: I,
    global_rows: Vec<usize>,
}

impl<I: VectorIndex> RemappedIndex<I> {
    /// `global_rows[local]` is the project row of the inner index's row `local`.
    pub fn new(inner: I, global_rows: Vec<usize>) -> Self {
        Self { inner, global_rows }
    }

    /// The local → global row mapping.
    pub fn global_rows(&self) -> &[usize] {
        &self.global_rows
    }
}

#[async_trait]
impl<I: VectorIndex> VectorIndex for RemappedIndex<I> {
    fn len(&self) -> usize {
        self.inner.len()
    }

    fn dims(&self) -> usize {
        self.inner.dims()
    }

    /// Hits whose local row is negative or unmapped are dropped.
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<Hit>> {
        let hits = self.inner.search(query, k).await?;
        Ok(hits
            .into_iter()
            .filter_map(|hit| {
                let local = usize::try_from(hit.row).ok()?;
                let global = *self.global_rows.get(local)?;
                Some(Hit {
                    similarity: hit.similarity,
                    row: global as i64,
                })
            })
            .collect())
    }
}
