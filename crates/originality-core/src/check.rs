//! The originality check: retrieval, fusion, filtering, scoring, and
//! suggestions for one query against both corpus slices.
//!
//! [`check`] is the single entry point used by the CLI and the HTTP server.
//! The query vector is computed by the caller (embedding is an app concern);
//! everything after that is pure over the shared [`Snapshot`] apart from the
//! two index searches.

use std::collections::BTreeSet;

use anyhow::{bail, Result};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::filter::is_admissible;
use crate::fusion::fuse;
use crate::index::{Hit, VectorIndex};
use crate::lexical::LexicalStats;
use crate::scoring::{Label, ScoringParams};
use crate::snapshot::Snapshot;
use crate::suggest::make_suggestions;
use crate::text::{sanitize_user_text, term_set};

/// Maximum snippet length, in characters, before the ellipsis.
pub const SNIPPET_CHARS: usize = 180;

/// Request body accepted by `/check` and `/score`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    /// Neighbors to keep per slice; the configured default when absent.
    #[serde(default)]
    pub k: Option<usize>,
}

/// `null` and a missing field both mean no tags.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Sanitized query with its derived statistics.
#[derive(Debug, Clone)]
pub struct Query {
    text: String,
    terms: BTreeSet<String>,
    specificity: f64,
}

impl Query {
    /// Sanitize each field and join the non-empty parts with newlines:
    /// title, description, then the tags separated by spaces.
    pub fn new(title: &str, description: &str, tags: &[String], stats: &LexicalStats) -> Self {
        let tags = tags
            .iter()
            .map(|t| sanitize_user_text(t))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let text = [sanitize_user_text(title), sanitize_user_text(description), tags]
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        let terms = term_set(&text);
        let specificity = stats.specificity(&terms);
        Self {
            text,
            terms,
            specificity,
        }
    }

    pub fn from_request(req: &CheckRequest, stats: &LexicalStats) -> Self {
        Self::new(&req.title, &req.description, &req.tags, stats)
    }

    /// Text that is embedded and fed to the suggestion generator.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn terms(&self) -> &BTreeSet<String> {
        &self.terms
    }

    /// Mean corpus IDF of the query terms; `0.0` without terms.
    pub fn specificity(&self) -> f64 {
        self.specificity
    }

    /// True when nothing survives sanitization; such queries skip retrieval.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Retrieval widening and scoring knobs.
#[derive(Debug, Clone)]
pub struct CheckParams {
    pub min_candidates: usize,
    pub candidate_multiplier: usize,
    pub scoring: ScoringParams,
}

impl Default for CheckParams {
    fn default() -> Self {
        Self {
            min_candidates: 120,
            candidate_multiplier: 30,
            scoring: ScoringParams::default(),
        }
    }
}

impl CheckParams {
    /// Hits requested from each index so that filtering can still fill `k` slots.
    pub fn candidate_pool(&self, k: usize) -> usize {
        self.min_candidates
            .max(k.saturating_mul(self.candidate_multiplier))
    }
}

/// An admissible prior project shown as evidence.
#[derive(Debug, Clone, Serialize)]
pub struct Neighbor {
    pub id: String,
    pub title: String,
    pub snippet: String,
    pub url: Option<String>,
    /// Fused similarity.
    pub similarity: f64,
    pub semantic_similarity: f64,
    pub rare_overlap: f64,
}

/// Full result of a check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub score_all: u8,
    pub score_recent: u8,
    pub label_all: Label,
    pub label_recent: Label,
    pub trend_label: &'static str,
    pub trend_note: &'static str,
    pub neighbors_all: Vec<Neighbor>,
    pub neighbors_recent: Vec<Neighbor>,
    pub suggestions: Vec<String>,
}

/// Scores, labels, and trend without neighbors or suggestions.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreResponse {
    pub score_all: u8,
    pub score_recent: u8,
    pub label_all: Label,
    pub label_recent: Label,
    pub trend_label: &'static str,
    pub trend_note: &'static str,
}

impl From<CheckReport> for ScoreResponse {
    fn from(r: CheckReport) -> Self {
        Self {
            score_all: r.score_all,
            score_recent: r.score_recent,
            label_all: r.label_all,
            label_recent: r.label_recent,
            trend_label: r.trend_label,
            trend_note: r.trend_note,
        }
    }
}

/// Corpus size summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsResponse {
    pub total_projects: usize,
    pub recent_projects: usize,
}

impl StatsResponse {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            total_projects: snapshot.total_projects(),
            recent_projects: snapshot.recent_projects(),
        }
    }
}

struct Candidate {
    fused: f64,
    semantic: f64,
    overlap: f64,
    row: usize,
}

/// Neighbors of one slice plus the `text` of each, in the same order.
struct Ranked<'a> {
    neighbors: Vec<Neighbor>,
    texts: Vec<&'a str>,
}

/// Truncate to [`SNIPPET_CHARS`] characters, appending `...` when cut.
pub fn snippet(description: &str) -> String {
    match description.char_indices().nth(SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}...", &description[..cut]),
        None => description.to_string(),
    }
}

/// Fuse, order, and filter one slice's hits down to `k` neighbors.
fn rank<'a>(snapshot: &'a Snapshot, query: &Query, hits: Vec<Hit>, k: usize) -> Ranked<'a> {
    let stats = snapshot.stats();
    let mut candidates = Vec::with_capacity(hits.len());

    for hit in hits {
        let Ok(row) = usize::try_from(hit.row) else {
            continue;
        };
        if !hit.similarity.is_finite() {
            continue;
        }
        let Some(doc_terms) = snapshot.text_terms(row) else {
            warn!(row, total = snapshot.total_projects(), "index returned row outside corpus");
            continue;
        };

        let semantic = f64::from(hit.similarity);
        let overlap = stats.overlap(query.terms(), doc_terms);
        candidates.push(Candidate {
            fused: fuse(semantic, overlap),
            semantic,
            overlap,
            row,
        });
    }

    // Stable: equal fused similarities keep retrieval order.
    candidates.sort_by(|a, b| b.fused.total_cmp(&a.fused));

    let mut ranked = Ranked {
        neighbors: Vec::new(),
        texts: Vec::new(),
    };
    for c in candidates {
        if ranked.neighbors.len() >= k {
            break;
        }
        let Some(project) = snapshot.project(c.row) else {
            continue;
        };
        if !is_admissible(project) {
            continue;
        }
        ranked.neighbors.push(Neighbor {
            id: project.id.clone(),
            title: project.title.clone(),
            snippet: snippet(&project.description),
            url: project.url.clone(),
            similarity: c.fused,
            semantic_similarity: c.semantic,
            rare_overlap: c.overlap,
        });
        ranked.texts.push(&project.text);
    }
    ranked
}

async fn search_slice<'a>(
    snapshot: &'a Snapshot,
    index: &dyn VectorIndex,
    query: &Query,
    query_vec: Option<&[f32]>,
    k: usize,
    params: &CheckParams,
) -> Result<Ranked<'a>> {
    let Some(vec) = query_vec else {
        return Ok(Ranked {
            neighbors: Vec::new(),
            texts: Vec::new(),
        });
    };
    let hits = index.search(vec, params.candidate_pool(k)).await?;
    let retrieved = hits.len();
    let ranked = rank(snapshot, query, hits, k);
    debug!(retrieved, kept = ranked.neighbors.len(), "ranked slice");
    Ok(ranked)
}

/// Run the full check for one query.
///
/// `query_vec` is the unit-length query embedding; pass `None` to skip
/// retrieval, which is what an empty query does. A `k` of zero keeps no
/// neighbors. Retrieval errors propagate.
pub async fn check(
    snapshot: &Snapshot,
    query: &Query,
    query_vec: Option<&[f32]>,
    k: usize,
    params: &CheckParams,
) -> Result<CheckReport> {
    if let Some(vec) = query_vec {
        if vec.len() != snapshot.dims() {
            bail!(
                "query vector has {} dims, snapshot expects {}",
                vec.len(),
                snapshot.dims()
            );
        }
    }

    let all_index = snapshot.all_time_index();
    let recent_index = snapshot.recent_index();
    let all = search_slice(snapshot, all_index, query, query_vec, k, params).await?;
    let recent = search_slice(snapshot, recent_index, query, query_vec, k, params).await?;

    let scoring = &params.scoring;
    let specificity = Some(query.specificity());
    let score_all = scoring.score(&similarities(&all.neighbors), specificity);
    let score_recent = scoring.score(&similarities(&recent.neighbors), specificity);
    let trend = scoring.trend(score_all, score_recent);

    let neighbor_texts: Vec<&str> = recent
        .texts
        .iter()
        .chain(all.texts.iter())
        .copied()
        .collect();
    let suggestions = make_suggestions(query.text(), &neighbor_texts, Some(score_all));

    debug!(
        specificity = query.specificity(),
        score_all,
        score_recent,
        trend = trend.label(),
        "check complete"
    );

    Ok(CheckReport {
        score_all,
        score_recent,
        label_all: scoring.label(score_all),
        label_recent: scoring.label(score_recent),
        trend_label: trend.label(),
        trend_note: trend.note(),
        neighbors_all: all.neighbors,
        neighbors_recent: recent.neighbors,
        suggestions,
    })
}

fn similarities(neighbors: &[Neighbor]) -> Vec<f64> {
    neighbors.iter().map(|n| n.similarity).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::FlatIndex;
    use crate::models::ProjectRecord;

    fn record(id: &str, title: &str, description: &str) -> ProjectRecord {
        ProjectRecord {
            id: id.into(),
            title: Some(title.into()),
            description: Some(description.into()),
            ..Default::default()
        }
    }

    /// Four projects on the unit circle; rows 0 and 3 share the same vector.
    fn snapshot() -> Snapshot {
        let records = vec![
            record(
                "a",
                "Offline clinic triage",
                "Nurses record offline triage notes in rural clinics and sync when a signal returns.",
            ),
            record("b", "hackathon project", "Built during a weekend."),
            record(
                "c",
                "Bus stop charger",
                "Solar powered kiosk that rents phone chargers to commuters waiting for buses.",
            ),
            record(
                "d",
                "Clinic queue board",
                "Offline waiting room board for clinics that shows nurses the next patient.",
            ),
        ];
        let rows = vec![
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.8, 0.6],
        ];
        let all = Box::new(FlatIndex::from_rows(2, &rows).unwrap());
        let recent_rows = [rows[2].clone(), rows[3].clone()];
        let recent = Box::new(FlatIndex::from_rows(2, &recent_rows).unwrap());
        Snapshot::new(records, all, recent, vec![2, 3]).unwrap()
    }

    fn query(snap: &Snapshot, title: &str, description: &str) -> Query {
        Query::new(title, description, &[], snap.stats())
    }

    #[test]
    fn test_query_drops_ui_labels_and_joins_parts() {
        let stats = LexicalStats::default();
        let q = Query::new(
            "Title\nClinic   triage",
            "",
            &["offline".into(), "Done".into(), "nurses".into()],
            &stats,
        );
        assert_eq!(q.text(), "Clinic triage\noffline nurses");
        assert!(q.terms().contains("triage"));
        assert!(!q.is_empty());
    }

    #[test]
    fn test_label_only_query_is_empty() {
        let q = Query::new("Check originality", "Description", &[], &LexicalStats::default());
        assert!(q.is_empty());
        assert_eq!(q.specificity(), 0.0);
    }

    #[test]
    fn test_candidate_pool_has_floor() {
        let params = CheckParams::default();
        assert_eq!(params.candidate_pool(1), 120);
        assert_eq!(params.candidate_pool(5), 150);
        assert_eq!(params.candidate_pool(usize::MAX), usize::MAX);
    }

    #[test]
    fn test_snippet_truncates_on_chars() {
        assert_eq!(snippet("short"), "short");
        let exact = "x".repeat(SNIPPET_CHARS);
        assert_eq!(snippet(&exact), exact);
        let long = "é".repeat(SNIPPET_CHARS + 5);
        let s = snippet(&long);
        assert!(s.ends_with("..."));
        assert_eq!(s.chars().count(), SNIPPET_CHARS + 3);
    }

    #[tokio::test]
    async fn test_check_filters_and_orders_neighbors() {
        let snap = snapshot();
        let q = query(&snap, "Offline clinic triage", "Nurses triage patients offline");
        let report = check(&snap, &q, Some(&[1.0, 0.0][..]), 5, &CheckParams::default())
            .await
            .unwrap();

        let ids: Vec<&str> = report.neighbors_all.iter().map(|n| n.id.as_str()).collect();
        assert!(!ids.contains(&"b"), "generic title must be filtered: {ids:?}");
        assert_eq!(ids[0], "a");
        for pair in report.neighbors_all.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
        for n in report.neighbors_all.iter().chain(&report.neighbors_recent) {
            assert!((0.0..=1.0).contains(&n.similarity));
        }

        let recent_ids: Vec<&str> = report.neighbors_recent.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(recent_ids[0], "d");
        assert!(report.score_all <= 100 && report.score_all >= 2);
        assert!(!report.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_check_keeps_at_most_k() {
        let snap = snapshot();
        let q = query(&snap, "Offline clinic triage", "");
        let report = check(&snap, &q, Some(&[1.0, 0.0][..]), 1, &CheckParams::default())
            .await
            .unwrap();
        assert_eq!(report.neighbors_all.len(), 1);
        assert_eq!(report.neighbors_recent.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_query_is_empty_evidence() {
        let snap = snapshot();
        let q = query(&snap, "Title", "");
        let report = check(&snap, &q, None, 5, &CheckParams::default()).await.unwrap();
        assert_eq!(report.score_all, 85);
        assert_eq!(report.score_recent, 85);
        assert_eq!(report.label_all, Label::Unique);
        assert_eq!(report.trend_label, "Still unusual");
        assert!(report.neighbors_all.is_empty());
        assert!(!report.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_check_rejects_wrong_dims() {
        let snap = snapshot();
        let q = query(&snap, "Offline clinic", "");
        let params = CheckParams::default();
        assert!(check(&snap, &q, Some(&[1.0, 0.0, 0.0][..]), 5, &params).await.is_err());
    }

    #[tokio::test]
    async fn test_zero_k_keeps_no_neighbors() {
        let snap = snapshot();
        let q = query(&snap, "Offline clinic triage", "");
        let report = check(&snap, &q, Some(&[1.0, 0.0][..]), 0, &CheckParams::default())
            .await
            .unwrap();
        assert!(report.neighbors_all.is_empty());
        assert!(report.neighbors_recent.is_empty());
        assert_eq!(report.score_all, 85);
    }

    #[test]
    fn test_rank_keeps_retrieval_order_on_ties() {
        let records = ["r0", "r1", "r2"]
            .into_iter()
            .map(|id| {
                record(
                    id,
                    "Clinic queue board",
                    "Offline waiting room board for clinics that shows nurses the next patient.",
                )
            })
            .collect();
        let rows = vec![vec![1.0, 0.0]; 3];
        let all = Box::new(FlatIndex::from_rows(2, &rows).unwrap());
        let recent = Box::new(FlatIndex::from_rows(2, &rows[..1]).unwrap());
        let snap = Snapshot::new(records, all, recent, vec![0]).unwrap();

        let q = query(&snap, "Clinic queue board", "");
        let hits = vec![
            Hit { similarity: 0.7, row: 2 },
            Hit { similarity: 0.7, row: 0 },
            Hit { similarity: 0.7, row: 1 },
        ];
        let ranked = rank(&snap, &q, hits, 5);
        let ids: Vec<&str> = ranked.neighbors.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["r2", "r0", "r1"]);
    }

    #[test]
    fn test_request_accepts_null_tags() {
        let req: CheckRequest =
            serde_json::from_str(r#"{"title":"Offline clinic rota","tags":null}"#).unwrap();
        assert!(req.tags.is_empty());
        let req: CheckRequest = serde_json::from_str(r#"{"title":"Offline clinic rota"}"#).unwrap();
        assert!(req.tags.is_empty());
        assert!(serde_json::from_str::<CheckRequest>(r#"{"description":"x"}"#).is_err());
    }

    #[test]
    fn test_rank_drops_malformed_hits() {
        let snap = snapshot();
        let q = query(&snap, "Offline clinic triage", "");
        let hits = vec![
            Hit { similarity: f32::NAN, row: 0 },
            Hit { similarity: 0.9, row: -1 },
            Hit { similarity: 0.9, row: 42 },
            Hit { similarity: 0.5, row: 2 },
        ];
        let ranked = rank(&snap, &q, hits, 5);
        assert_eq!(ranked.neighbors.len(), 1);
        assert_eq!(ranked.neighbors[0].id, "c");
        assert_eq!(ranked.texts.len(), 1);
    }

    #[test]
    fn test_stats_response() {
        let snap = snapshot();
        assert_eq!(
            StatsResponse::from_snapshot(&snap),
            StatsResponse {
                total_projects: 4,
                recent_projects: 2
            }
        );
    }
}
