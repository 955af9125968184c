//! Fuse embedding similarity with IDF-weighted lexical overlap.
//!
//! Embedding similarity alone ranks topically adjacent projects as if they
//! were the same idea. The fused score therefore only trusts the embedding
//! in proportion to how much of the query's rare vocabulary recurs in the
//! candidate:
//!
//! | reshaped overlap `o = overlap^0.7` | result |
//! |---|---|
//! | `o < 0.08` | `min(0.22, 0.22 × max(0, semantic))` |
//! | `0.08 ≤ o < 0.18` | `0.30 × semantic + 0.70 × o` |
//! | `0.18 ≤ o < 0.30` | `0.45 × semantic + 0.55 × o` |
//! | `o ≥ 0.30` | `0.60 × semantic + 0.40 × o` |
//!
//! Negative semantic similarity counts as zero and the result is clamped
//! to `[0, 1]`.

/// Concave exponent applied to the raw overlap.
pub const OVERLAP_EXPONENT: f64 = 0.7;

/// Below this reshaped overlap the candidate is "not the same idea".
pub const MIN_SHARED_OVERLAP: f64 = 0.08;

/// Ceiling on the fused score when overlap is below [`MIN_SHARED_OVERLAP`].
pub const TOPICAL_CEILING: f64 = 0.22;

/// `(lower bound of reshaped overlap, semantic weight)`, highest band first.
const SEMANTIC_WEIGHT_BANDS: [(f64, f64); 3] =
    [(0.30, 0.60), (0.18, 0.45), (MIN_SHARED_OVERLAP, 0.30)];

/// Reshape raw overlap with the concave exponent.
pub fn reshape_overlap(overlap: f64) -> f64 {
    overlap.clamp(0.0, 1.0).powf(OVERLAP_EXPONENT)
}

/// Semantic weight for a reshaped overlap, or `None` below the floor.
pub fn semantic_weight(reshaped: f64) -> Option<f64> {
    SEMANTIC_WEIGHT_BANDS
        .iter()
        .find(|(lower, _)| reshaped >= *lower)
        .map(|(_, w)| *w)
}

/// Fused "same idea" similarity in `[0, 1]`.
///
/// `semantic` is the retrieval similarity (cosine, nominally `[-1, 1]`);
/// `overlap` is [`LexicalStats::overlap`](crate::lexical::LexicalStats::overlap).
/// Callers drop non-finite similarities before fusing.
pub fn fuse(semantic: f64, overlap: f64) -> f64 {
    let o = reshape_overlap(overlap);
    let semantic = semantic.max(0.0);

    match semantic_weight(o) {
        None => (TOPICAL_CEILING * semantic).clamp(0.0, TOPICAL_CEILING),
        Some(w) => (w * semantic + (1.0 - w) * o).clamp(0.0, 1.0),
    }
}
