//! Text normalization: UI-label stripping and term extraction.
//!
//! Two tokenizer variants exist:
//!
//! - [`tokenize`]: corpus variant, ASCII alphanumeric runs of length ≥ 3.
//!   Used for lexical statistics, specificity, and overlap.
//! - [`tokenize_strict`]: runs must start with a letter, and a wider
//!   stopword set applies. Used by the suggestion generator, where terms
//!   are echoed back to the user.
//!
//! Both lowercase first and treat every non-ASCII-alphanumeric character
//! as a separator.

use std::collections::BTreeSet;

/// Minimum token length for both tokenizer variants.
pub const MIN_TERM_LEN: usize = 3;

/// Whole-line UI labels that callers sometimes echo into free text.
const UI_LABELS: &[&str] = &["title", "description", "tags", "check originality", "done"];

/// Returns true if `term` is in the corpus stopword set.
///
/// Covers function words, question words, generic software and hackathon
/// boilerplate, and request-schema field names.
pub fn is_stopword(term: &str) -> bool {
    matches!(
        term,
        // function words
        "the" | "a" | "an" | "and" | "or" | "to" | "of" | "in" | "for" | "with" | "on"
            | "at" | "by" | "from" | "as" | "is" | "are" | "was" | "were" | "be" | "been"
            | "it" | "this" | "that" | "these" | "those" | "your" | "our"
            // question words
            | "how" | "why" | "what" | "when" | "where" | "who" | "whom" | "which"
            // software boilerplate
            | "app" | "project" | "projects" | "repo" | "repository" | "code" | "using"
            | "use" | "uses" | "used" | "build" | "built" | "create" | "creating"
            | "platform" | "website" | "web" | "api" | "service" | "system" | "powered"
            | "tool" | "tools"
            // hackathon boilerplate
            | "hackathon" | "demo" | "prototype"
            // schema leakage
            | "title" | "description" | "tags" | "tag" | "idea" | "ideas" | "originality"
            | "original" | "check" | "checker" | "done" | "score" | "scoring" | "recent"
            | "alltime" | "all"
    )
}

/// Returns true if `term` should never appear in generated suggestions.
///
/// Superset of [`is_stopword`].
pub fn is_suggestion_stopword(term: &str) -> bool {
    is_stopword(term)
        || matches!(
            term,
            "estimate"
                | "estimator"
                | "detect"
                | "detection"
                | "suggest"
                | "suggestions"
                | "alternative"
                | "alternatives"
                | "notes"
                | "note"
                | "action"
                | "actions"
                | "mechanic"
                | "mechanics"
        )
}

/// Strip lines that are exactly a UI label, then collapse whitespace.
///
/// Label matching is case-insensitive and ignores surrounding whitespace.
/// The result has no leading/trailing whitespace and single spaces between
/// words.
pub fn sanitize_user_text(s: &str) -> String {
    let kept: Vec<&str> = s
        .lines()
        .filter(|line| !is_ui_label(line))
        .flat_map(str::split_whitespace)
        .collect();
    kept.join(" ")
}

fn is_ui_label(line: &str) -> bool {
    let trimmed = line.trim().to_lowercase();
    UI_LABELS.contains(&trimmed.as_str())
}

/// Tokenize with the corpus variant, preserving order and duplicates.
pub fn tokenize(s: &str) -> Vec<String> {
    alnum_runs(s)
        .filter(|run| run.len() >= MIN_TERM_LEN)
        .filter(|run| !is_stopword(run))
        .collect()
}

/// Tokenize with the strict variant, preserving order and duplicates.
///
/// Leading digits of a run are skipped; the remainder must be at least
/// [`MIN_TERM_LEN`] long.
pub fn tokenize_strict(s: &str) -> Vec<String> {
    alnum_runs(s)
        .filter_map(|run| {
            let start = run.find(|c: char| c.is_ascii_lowercase())?;
            let term = &run[start..];
            (term.len() >= MIN_TERM_LEN).then(|| term.to_string())
        })
        .filter(|term| !is_suggestion_stopword(term))
        .collect()
}

/// The distinct corpus-variant terms of `s`.
pub fn term_set(s: &str) -> BTreeSet<String> {
    tokenize(s).into_iter().collect()
}

/// Maximal runs of ASCII lowercase letters and digits after lowercasing.
fn alnum_runs(s: &str) -> impl Iterator<Item = String> {
    let lowered = s.to_lowercase();
    let mut runs = Vec::new();
    let mut current = String::new();

    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            current.push(ch);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    runs.into_iter()
}
