//! Request-level orchestration shared by the CLI and the HTTP server.
//!
//! An [`Engine`] owns the loaded snapshot, the embedding provider, and the
//! configuration. It resolves the requested neighbor count, embeds the
//! query, and runs [`originality_core::check::check`].

use anyhow::Result;
use originality_core::check::{self, CheckParams, CheckReport, CheckRequest, Query, StatsResponse};
use originality_core::snapshot::Snapshot;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::embedding::{create_provider, embed_query, EmbeddingProvider};
use crate::snapshot::load_snapshot;

/// Why a check could not be answered.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("k must be between 1 and {max}, got {k}")]
    InvalidK { k: usize, max: usize },

    #[error("embeddings are disabled; set [embedding].provider to score non-empty queries")]
    EmbeddingsDisabled,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub struct Engine {
    config: Config,
    snapshot: Snapshot,
    provider: Box<dyn EmbeddingProvider>,
    params: CheckParams,
}

impl Engine {
    pub fn new(config: Config, snapshot: Snapshot, provider: Box<dyn EmbeddingProvider>) -> Self {
        let params = config.check_params();
        Self {
            config,
            snapshot,
            provider,
            params,
        }
    }

    /// Load the snapshot and create the embedding provider named in `config`.
    ///
    /// Fails when an enabled provider's dimensionality differs from the
    /// snapshot's.
    pub fn from_config(config: Config) -> Result<Self> {
        let provider = create_provider(&config.embedding)?;
        let snapshot = load_snapshot(&config)?;
        if config.embedding.is_enabled() && provider.dims() != snapshot.dims() {
            anyhow::bail!(
                "embedding model '{}' produces {} dims, snapshot indices have {}",
                provider.model_name(),
                provider.dims(),
                snapshot.dims()
            );
        }
        Ok(Self::new(config, snapshot, provider))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn stats(&self) -> StatsResponse {
        StatsResponse::from_snapshot(&self.snapshot)
    }

    /// Requested `k`, or the configured default, bounded by `retrieval.max_k`.
    pub fn resolve_k(&self, k: Option<usize>) -> Result<usize, CheckError> {
        let max = self.config.retrieval.max_k;
        match k.unwrap_or(self.config.retrieval.default_k) {
            k if (1..=max).contains(&k) => Ok(k),
            k => Err(CheckError::InvalidK { k, max }),
        }
    }

    /// Score one request against both corpus slices.
    pub async fn check(&self, req: &CheckRequest) -> Result<CheckReport, CheckError> {
        let k = self.resolve_k(req.k)?;
        let query = Query::from_request(req, self.snapshot.stats());
        debug!(
            terms = query.terms().len(),
            specificity = query.specificity(),
            k,
            "check request"
        );

        let vector = if query.is_empty() {
            None
        } else if !self.config.embedding.is_enabled() {
            return Err(CheckError::EmbeddingsDisabled);
        } else {
            Some(embed_query(self.provider.as_ref(), &self.config.embedding, query.text()).await?)
        };

        let report =
            check::check(&self.snapshot, &query, vector.as_deref(), k, &self.params).await?;
        Ok(report)
    }
}
