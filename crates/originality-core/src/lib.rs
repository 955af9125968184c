//! # Originality Core
//!
//! Shared, I/O-free logic for the originality checker: corpus data model,
//! text normalization, corpus-wide lexical statistics, similarity fusion,
//! neighbor filtering, originality scoring, and suggestion generation.
//! [`snapshot::Snapshot`] holds the immutable corpus state and
//! [`check::check`] runs the whole pipeline for one query.
//!
//! This crate contains no HTTP, filesystem, or model-inference
//! dependencies. Embedding inference is consumed through the
//! [`embedding::EmbeddingProvider`] trait and vector search through
//! [`index::VectorIndex`]; the calling application supplies the query
//! vector and may supply its own index backends.
//!
//! ## Pipeline
//!
//! ```text
//! query text ──▶ text ──▶ lexical (specificity)
//!                  │
//! ANN hits ──▶ fusion (semantic + overlap) ──▶ filter ──▶ scoring ──▶ trend
//!                                                │
//!                                                └──▶ suggest
//! ```

pub mod check;
pub mod embedding;
pub mod filter;
pub mod fusion;
pub mod index;
pub mod lexical;
pub mod models;
pub mod scoring;
pub mod snapshot;
pub mod suggest;
pub mod text;
