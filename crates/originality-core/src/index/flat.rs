//! In-memory brute-force [`VectorIndex`].
//!
//! Stores vectors as one row-major `Vec<f32>`. Search scores every row with
//! cosine similarity, so latency grows linearly with corpus size; that is
//! acceptable for snapshots of a few hundred thousand rows.

use anyhow::{bail, Result};
use async_trait::async_trait;

use super::{Hit, VectorIndex};
use crate::embedding::{blob_to_vec, cosine_similarity};

/// Brute-force cosine-similarity index.
pub struct FlatIndex {
    dims: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    /// Build from a row-major matrix.
    ///
    /// Fails if `dims` is zero or `data.len()` is not a multiple of `dims`.
    pub fn new(dims: usize, data: Vec<f32>) -> Result<Self> {
        if dims == 0 {
            bail!("index dimensionality must be > 0");
        }
        if data.len() % dims != 0 {
            bail!(
                "index data length {} is not a multiple of dims {}",
                data.len(),
                dims
            );
        }
        Ok(Self { dims, data })
    }

    /// Build from little-endian `f32` bytes (see [`crate::embedding::vec_to_blob`]).
    pub fn from_blob(dims: usize, blob: &[u8]) -> Result<Self> {
        if blob.len() % 4 != 0 {
            bail!("index blob length {} is not a multiple of 4 bytes", blob.len());
        }
        Self::new(dims, blob_to_vec(blob))
    }

    /// Build from individual rows, all of length `dims`.
    pub fn from_rows(dims: usize, rows: &[Vec<f32>]) -> Result<Self> {
        let mut data = Vec::with_capacity(rows.len() * dims);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != dims {
                bail!("row {} has {} dims, expected {}", i, row.len(), dims);
            }
            data.extend_from_slice(row);
        }
        Self::new(dims, data)
    }

    fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dims..(i + 1) * self.dims]
    }
}

#[async_trait]
impl VectorIndex for FlatIndex {
    fn len(&self) -> usize {
        self.data.len() / self.dims
    }

    fn dims(&self) -> usize {
        self.dims
    }

    /// Ties are broken by ascending row so results are reproducible.
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<Hit>> {
        if query.len() != self.dims {
            bail!(
                "query vector has {} dims, index expects {}",
                query.len(),
                self.dims
            );
        }

        let mut hits: Vec<Hit> = (0..self.len())
            .map(|i| Hit {
                similarity: cosine_similarity(query, self.row(i)),
                row: i as i64,
            })
            .collect();

        hits.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then(a.row.cmp(&b.row))
        });
        hits.truncate(k);
        Ok(hits)
    }
}
