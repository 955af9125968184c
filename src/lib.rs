//! # Originality
//!
//! Estimates how original a project idea is relative to a static snapshot of
//! prior submissions.
//!
//! The scoring pipeline itself lives in `originality-core`; this crate
//! supplies the collaborators around it: configuration, snapshot file
//! loading, embedding providers, the HTTP server, and the `orig` CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐
//! │ Snapshot     │──▶│  Engine      │──▶│ originality-core │
//! │ meta + .f32  │   │ embed query  │   │ fuse/filter/score│
//! └──────────────┘   └──────┬───────┘   └──────────────────┘
//!                           │
//!                ┌──────────┴─────────┐
//!                ▼                    ▼
//!           ┌──────────┐        ┌──────────┐
//!           │   CLI    │        │   HTTP   │
//!           │  (orig)  │        │  (axum)  │
//!           └──────────┘        └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`snapshot`] | Snapshot file loading |
//! | [`embedding`] | Embedding providers |
//! | [`engine`] | Per-request orchestration |
//! | [`server`] | HTTP server |
//! | [`check_cmd`] | `orig check` output |
//! | [`stats`] | `orig stats` output |

pub mod check_cmd;
pub mod config;
pub mod embedding;
pub mod engine;
pub mod server;
pub mod snapshot;
pub mod stats;
