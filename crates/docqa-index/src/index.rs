//! Flat in-memory vector index.
//!
//! Exact nearest-neighbor search by inner product over L2-normalized
//! vectors (cosine similarity, higher is better). Rows are append-only; a
//! rebuild clears and re-adds.

use docqa_core::error::{Error, Result};

#[derive(Default)]
pub struct FlatIndex {
    dim: Option<usize>,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Append vectors, returning their assigned row positions. Positions are
    /// consecutive integers starting at the current size. Dimensionality is
    /// fixed by the first vector ever added; later mismatches are rejected.
    pub fn add(&mut self, vectors: Vec<Vec<f32>>) -> Result<Vec<usize>> {
        let mut positions = Vec::with_capacity(vectors.len());
        for mut v in vectors {
            let expected = *self.dim.get_or_insert(v.len());
            if v.len() != expected {
                return Err(Error::DimensionMismatch { expected, got: v.len() });
            }
            normalize(&mut v);
            positions.push(self.vectors.len());
            self.vectors.push(v);
        }
        Ok(positions)
    }

    /// Top-`k` rows by cosine similarity, best first. `k` is clamped to the
    /// index size; ties rank by ascending position.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        let Some(expected) = self.dim else {
            return Err(Error::EmptyIndex);
        };
        if self.vectors.is_empty() {
            return Err(Error::EmptyIndex);
        }
        if query.len() != expected {
            return Err(Error::DimensionMismatch { expected, got: query.len() });
        }
        let mut q = query.to_vec();
        normalize(&mut q);
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(pos, v)| (pos, dot(&q, v)))
            .collect();
        // Stable sort keeps equal scores in ascending position order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k.min(self.vectors.len()));
        Ok(scored)
    }

    /// Drop every row. A cleared index accepts a new dimensionality on the
    /// next add.
    pub fn clear(&mut self) {
        self.vectors.clear();
        self.dim = None;
    }
}

fn normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-12);
    for x in v {
        *x /= norm;
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
