//! Immutable corpus snapshot served for the lifetime of a process.
//!
//! A [`Snapshot`] bundles the normalized projects, their precomputed term
//! sets, the corpus-wide [`LexicalStats`], and the two vector indices
//! ("all-time" and "recent"). Construction validates that these pieces
//! describe the same corpus; an inconsistent snapshot must not serve.

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::info;

use crate::index::{RemappedIndex, VectorIndex};
use crate::lexical::LexicalStats;
use crate::models::{Project, ProjectRecord};
use crate::text::{term_set, tokenize};

/// Fatal inconsistencies between snapshot components.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("all-time index size mismatch with metadata: index has {index} rows, metadata has {metadata} projects (rebuild indices)")]
    AllTimeSizeMismatch { index: usize, metadata: usize },

    #[error("recent index size mismatch with row ids: index has {index} rows, row id list has {row_ids} entries (rebuild indices)")]
    RecentSizeMismatch { index: usize, row_ids: usize },

    #[error("recent row id {row} at position {position} is out of range for {metadata} projects")]
    RecentRowOutOfRange {
        position: usize,
        row: usize,
        metadata: usize,
    },

    #[error("index dimensionality mismatch: all-time has {all_time}, recent has {recent}")]
    DimsMismatch { all_time: usize, recent: usize },
}

/// Read-only corpus state shared by every request.
pub struct Snapshot {
    projects: Vec<Project>,
    /// Term set of each project's `text`, aligned with `projects`.
    text_terms: Vec<BTreeSet<String>>,
    stats: LexicalStats,
    all_time: Box<dyn VectorIndex>,
    recent: RemappedIndex<Box<dyn VectorIndex>>,
}

impl Snapshot {
    /// Normalize records, build statistics, and validate the indices.
    ///
    /// `recent_rows[i]` is the project row of the recent index's row `i`.
    pub fn new(
        records: Vec<ProjectRecord>,
        all_time: Box<dyn VectorIndex>,
        recent: Box<dyn VectorIndex>,
        recent_rows: Vec<usize>,
    ) -> Result<Self, SnapshotError> {
        let projects: Vec<Project> = records.into_iter().map(Project::from).collect();

        if all_time.len() != projects.len() {
            return Err(SnapshotError::AllTimeSizeMismatch {
                index: all_time.len(),
                metadata: projects.len(),
            });
        }
        if recent.len() != recent_rows.len() {
            return Err(SnapshotError::RecentSizeMismatch {
                index: recent.len(),
                row_ids: recent_rows.len(),
            });
        }
        if let Some((position, &row)) = recent_rows
            .iter()
            .enumerate()
            .find(|(_, row)| **row >= projects.len())
        {
            return Err(SnapshotError::RecentRowOutOfRange {
                position,
                row,
                metadata: projects.len(),
            });
        }
        if all_time.dims() != recent.dims() {
            return Err(SnapshotError::DimsMismatch {
                all_time: all_time.dims(),
                recent: recent.dims(),
            });
        }

        let stats = LexicalStats::from_term_sets(projects.iter().map(|p| tokenize(&p.search_text)));
        let text_terms = projects.iter().map(|p| term_set(&p.text)).collect();

        info!(
            projects = projects.len(),
            recent = recent_rows.len(),
            vocabulary = stats.vocabulary_size(),
            dims = all_time.dims(),
            "snapshot ready"
        );

        Ok(Self {
            projects,
            text_terms,
            stats,
            all_time,
            recent: RemappedIndex::new(recent, recent_rows),
        })
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Project at a global row, if in range.
    pub fn project(&self, row: usize) -> Option<&Project> {
        self.projects.get(row)
    }

    /// Precomputed term set of the project's `text` at a global row.
    pub fn text_terms(&self, row: usize) -> Option<&BTreeSet<String>> {
        self.text_terms.get(row)
    }

    pub fn stats(&self) -> &LexicalStats {
        &self.stats
    }

    pub fn total_projects(&self) -> usize {
        self.projects.len()
    }

    pub fn recent_projects(&self) -> usize {
        self.recent.global_rows().len()
    }

    /// Query vector dimensionality expected by both indices.
    pub fn dims(&self) -> usize {
        self.all_time.dims()
    }

    /// Index over every project.
    pub fn all_time_index(&self) -> &dyn VectorIndex {
        self.all_time.as_ref()
    }

    /// Index over recent projects, reporting global rows.
    pub fn recent_index(&self) -> &dyn VectorIndex {
        &self.recent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::FlatIndex;

    fn records(n: usize) -> Vec<ProjectRecord> {
        (0..n)
            .map(|i| ProjectRecord {
                id: format!("p{i}"),
                title: Some(format!("Solar kiosk {i}")),
                description: Some("Rents phone chargers at bus stops".into()),
                ..Default::default()
            })
            .collect()
    }

    fn flat(rows: usize) -> Box<dyn VectorIndex> {
        let data: Vec<Vec<f32>> = (0..rows).map(|i| vec![1.0, i as f32]).collect();
        Box::new(FlatIndex::from_rows(2, &data).unwrap())
    }

    #[test]
    fn test_consistent_snapshot_builds_stats() {
        let snap = Snapshot::new(records(3), flat(3), flat(2), vec![2, 0]).unwrap();
        assert_eq!(snap.total_projects(), 3);
        assert_eq!(snap.recent_projects(), 2);
        assert_eq!(snap.dims(), 2);
        assert_eq!(snap.stats().n_docs(), 3);
        assert_eq!(snap.stats().df("solar"), 3);
        assert!(snap.text_terms(1).unwrap().contains("chargers"));
        assert!(snap.text_terms(3).is_none());
    }

    #[test]
    fn test_all_time_size_mismatch_is_fatal() {
        let err = Snapshot::new(records(3), flat(2), flat(0), vec![]).err().unwrap();
        assert_eq!(err, SnapshotError::AllTimeSizeMismatch { index: 2, metadata: 3 });
        assert!(err.to_string().contains("size mismatch"));
    }

    #[test]
    fn test_recent_size_mismatch_is_fatal() {
        let err = Snapshot::new(records(3), flat(3), flat(2), vec![0]).err().unwrap();
        assert_eq!(err, SnapshotError::RecentSizeMismatch { index: 2, row_ids: 1 });
    }

    #[test]
    fn test_recent_row_out_of_range_is_fatal() {
        let err = Snapshot::new(records(3), flat(3), flat(2), vec![0, 3]).err().unwrap();
        assert_eq!(
            err,
            SnapshotError::RecentRowOutOfRange { position: 1, row: 3, metadata: 3 }
        );
    }

    #[test]
    fn test_empty_snapshot_is_valid() {
        let snap = Snapshot::new(Vec::new(), flat(0), flat(0), Vec::new()).unwrap();
        assert_eq!(snap.total_projects(), 0);
        assert_eq!(snap.stats().n_docs(), 1);
    }
}
