//! Configuration parsing and validation.
//!
//! Loads a TOML file into [`Config`]. Every section except `[snapshot]` has
//! defaults, so a minimal config only names the snapshot files:
//!
//! ```toml
//! [snapshot]
//! meta_path = "data/projects_meta.json"
//! index_all_path = "data/index_all.f32"
//! index_recent_path = "data/index_recent.f32"
//! recent_row_ids_path = "data/recent_row_ids.json"
//!
//! [embedding]
//! provider = "local"
//! model = "all-minilm-l6-v2"
//! dims = 384
//! ```

use anyhow::{Context, Result};
use originality_core::check::CheckParams;
use originality_core::scoring::ScoringParams;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub scoring: ScoringParams,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Locations of the pre-built snapshot files.
#[derive(Debug, Deserialize, Clone)]
pub struct SnapshotConfig {
    pub meta_path: PathBuf,
    pub index_all_path: PathBuf,
    pub index_recent_path: PathBuf,
    pub recent_row_ids_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub dims: Option<usize>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Base URL for the `ollama` provider.
    #[serde(default)]
    pub url: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "disabled".to_string(),
            model: None,
            dims: None,
            batch_size: 64,
            max_retries: 5,
            timeout_secs: 30,
            url: None,
        }
    }
}

fn default_provider() -> String {
    "disabled".to_string()
}
fn default_batch_size() -> usize {
    64
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}

impl EmbeddingConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_k")]
    pub default_k: usize,
    #[serde(default = "default_max_k")]
    pub max_k: usize,
    #[serde(default = "default_min_candidates")]
    pub min_candidates: usize,
    #[serde(default = "default_candidate_multiplier")]
    pub candidate_multiplier: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
            max_k: default_max_k(),
            min_candidates: default_min_candidates(),
            candidate_multiplier: default_candidate_multiplier(),
        }
    }
}

fn default_k() -> usize {
    5
}
fn default_max_k() -> usize {
    50
}
fn default_min_candidates() -> usize {
    120
}
fn default_candidate_multiplier() -> usize {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

impl Config {
    /// Pipeline parameters derived from `[retrieval]` and `[scoring]`.
    pub fn check_params(&self) -> CheckParams {
        CheckParams {
            min_candidates: self.retrieval.min_candidates,
            candidate_multiplier: self.retrieval.candidate_multiplier,
            scoring: self.scoring.clone(),
        }
    }

    /// Vector dimensionality of the snapshot indices.
    ///
    /// Falls back to 384 (`all-minilm-l6-v2`) when embeddings are disabled
    /// and no `dims` is configured.
    pub fn dims(&self) -> usize {
        self.embedding.dims.unwrap_or(384)
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    // Validate retrieval
    let retrieval = &config.retrieval;
    if retrieval.max_k == 0 {
        anyhow::bail!("retrieval.max_k must be >= 1");
    }
    if !(1..=retrieval.max_k).contains(&retrieval.default_k) {
        anyhow::bail!(
            "retrieval.default_k must be in [1, {}], got {}",
            retrieval.max_k,
            retrieval.default_k
        );
    }
    if retrieval.min_candidates == 0 {
        anyhow::bail!("retrieval.min_candidates must be >= 1");
    }
    if retrieval.candidate_multiplier == 0 {
        anyhow::bail!("retrieval.candidate_multiplier must be >= 1");
    }

    // Validate scoring
    config
        .scoring
        .validate()
        .with_context(|| "Invalid [scoring] section")?;

    // Validate embedding
    if config.embedding.is_enabled() {
        if config.embedding.dims.is_none() || config.embedding.dims == Some(0) {
            anyhow::bail!(
                "embedding.dims must be > 0 when provider is '{}'",
                config.embedding.provider
            );
        }
        if config.embedding.model.is_none() {
            anyhow::bail!(
                "embedding.model must be specified when provider is '{}'",
                config.embedding.provider
            );
        }
    } else if config.embedding.dims == Some(0) {
        anyhow::bail!("embedding.dims must be > 0");
    }

    match config.embedding.provider.as_str() {
        "disabled" | "openai" | "ollama" | "local" => {}
        other => anyhow::bail!(
            "Unknown embedding provider: '{}'. Must be disabled, openai, ollama, or local.",
            other
        ),
    }

    Ok(())
}
