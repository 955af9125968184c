//! Corpus-wide document frequency and IDF weights.
//!
//! [`LexicalStats`] is built once from the corpus at snapshot load time and
//! is read-only afterwards, so concurrent requests share it without locks.
//!
//! # Weights
//!
//! ```text
//! df(t)  = number of documents whose term set contains t
//! idf(t) = ln((N + 1) / (df(t) + 1)) + 1
//! ```
//!
//! `N` is the document count (at least 1). Terms the corpus never saw
//! weigh [`UNSEEN_IDF`].

use std::collections::{BTreeSet, HashMap};

/// Weight returned for terms absent from the table.
pub const UNSEEN_IDF: f64 = 1.0;

/// Smoothed inverse document frequency.
///
/// Monotonically non-increasing in `df`.
pub fn idf_weight(n_docs: usize, df: usize) -> f64 {
    ((n_docs as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0
}

/// Immutable term → (document frequency, IDF) table.
#[derive(Debug, Clone, Default)]
pub struct LexicalStats {
    df: HashMap<String, usize>,
    idf: HashMap<String, f64>,
    n_docs: usize,
}

impl LexicalStats {
    /// Build the table from one term set per document.
    ///
    /// Each document contributes at most one count per distinct term.
    pub fn from_term_sets<I>(docs: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoIterator<Item = String>,
    {
        let mut df: HashMap<String, usize> = HashMap::new();
        let mut n_docs = 0usize;

        for doc in docs {
            n_docs += 1;
            let distinct: BTreeSet<String> = doc.into_iter().collect();
            for term in distinct {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let n_docs = n_docs.max(1);
        let idf = df
            .iter()
            .map(|(term, &count)| (term.clone(), idf_weight(n_docs, count)))
            .collect();

        Self { df, idf, n_docs }
    }

    /// Number of documents the table was built from (at least 1).
    pub fn n_docs(&self) -> usize {
        self.n_docs
    }

    /// Number of distinct terms seen.
    pub fn vocabulary_size(&self) -> usize {
        self.df.len()
    }

    /// Document frequency of `term` (0 if unseen).
    pub fn df(&self, term: &str) -> usize {
        self.df.get(term).copied().unwrap_or(0)
    }

    /// IDF weight of `term`, [`UNSEEN_IDF`] if unseen.
    pub fn idf(&self, term: &str) -> f64 {
        self.idf.get(term).copied().unwrap_or(UNSEEN_IDF)
    }

    /// Mean IDF of the query terms; `0.0` for an empty set.
    pub fn specificity(&self, terms: &BTreeSet<String>) -> f64 {
        if terms.is_empty() {
            return 0.0;
        }
        let total: f64 = terms.iter().map(|t| self.idf(t)).sum();
        total / terms.len() as f64
    }

    /// Share of the query's total IDF mass carried by terms shared with `doc`.
    ///
    /// Returns a value in `[0, 1]`; `0.0` if either set is empty or they
    /// share nothing.
    pub fn overlap(&self, query: &BTreeSet<String>, doc: &BTreeSet<String>) -> f64 {
        if query.is_empty() {
            return 0.0;
        }
        let shared: f64 = query
            .intersection(doc)
            .map(|t| self.idf(t))
            .sum();
        if shared == 0.0 {
            return 0.0;
        }
        let budget: f64 = query.iter().map(|t| self.idf(t)).sum();
        if budget > 0.0 {
            shared / budget
        } else {
            0.0
        }
    }
}
