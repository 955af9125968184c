//! Corpus data model.
//!
//! [`ProjectRecord`] is the lenient on-disk shape written by the offline
//! index builder; [`Project`] is the normalized, immutable entry served for
//! the lifetime of a process.

use serde::{Deserialize, Deserializer, Serialize};

/// A prior submission in the corpus.
///
/// Invariant: `search_text` is never empty unless title, description, and
/// tags are all empty.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    /// Stable identifier from the ingestion source.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Unordered, de-duplicated tags.
    pub tags: Vec<String>,
    /// Canonical URL, if known.
    pub url: Option<String>,
    /// Creation timestamp as recorded by the source (ISO 8601).
    pub created_at: Option<String>,
    /// Title + description + tags, used for retrieval and corpus statistics.
    pub search_text: String,
    /// Explanatory text used for overlap and suggestions.
    pub text: String,
    pub source: String,
    pub pushed_at: Option<String>,
    pub stars: Option<i64>,
    pub language: Option<String>,
    pub submission_score: Option<f64>,
    /// Coarse type label (e.g. `"template"`, `"list"`).
    pub type_label: Option<String>,
}

/// A metadata record as stored in the snapshot's JSON array.
///
/// Everything except `id` may be missing or null; [`Project::from`] fills
/// the gaps deterministically.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub search_text: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub pushed_at: Option<String>,
    #[serde(default)]
    pub stars: Option<i64>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub submission_score: Option<f64>,
    #[serde(default)]
    pub type_label: Option<String>,
}

/// Accept any JSON value for `tags`; keep string elements of an array,
/// anything else becomes an empty list.
fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let mut tags: Vec<String> = Vec::new();
    if let serde_json::Value::Array(items) = value {
        for item in items {
            if let serde_json::Value::String(s) = item {
                if !tags.contains(&s) {
                    tags.push(s);
                }
            }
        }
    }
    Ok(tags)
}

/// Derive retrieval text from title, description, and tags.
///
/// Non-empty trimmed parts are joined by newlines; tags are space-joined.
pub fn make_search_text(title: &str, description: &str, tags: &[String]) -> String {
    let tag_str = tags.join(" ");
    [title.trim(), description.trim(), tag_str.trim()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

impl From<ProjectRecord> for Project {
    fn from(rec: ProjectRecord) -> Self {
        let title = rec.title.unwrap_or_default();
        let description = rec.description.unwrap_or_default();
        let search_text = non_empty(rec.search_text)
            .unwrap_or_else(|| make_search_text(&title, &description, &rec.tags));
        let text = non_empty(rec.text).unwrap_or_else(|| search_text.clone());

        Self {
            id: rec.id,
            title,
            description,
            tags: rec.tags,
            url: rec.url,
            created_at: rec.created_at,
            search_text,
            text,
            source: rec.source.unwrap_or_else(|| "unknown".to_string()),
            pushed_at: rec.pushed_at,
            stars: rec.stars,
            language: rec.language,
            submission_score: rec.submission_score,
            type_label: rec.type_label,
        }
    }
}
