//! Deterministic, explanatory suggestions for making an idea more original.
//!
//! Suggestions are built from the query text and the texts of the
//! neighbors that were shown as evidence. Informativeness here is *local*:
//! IDF is computed over the supplied neighbor texts only, so a term that
//! every neighbor shares carries no signal even if it is rare corpus-wide.
//!
//! Template variants are chosen with [`seed_from_text`], a checksum of the
//! query, so identical queries always get identical suggestions.

use std::collections::{BTreeSet, HashMap};

use crate::lexical::LexicalStats;
use crate::text::tokenize_strict;

/// Overlap terms are capped at this many.
pub const MAX_OVERLAP_TERMS: usize = 8;

/// Overlap terms quoted back in the explanation.
const SHOWN_OVERLAP_TERMS: usize = 6;

/// Shared terms below this local IDF are too common to count as constraints.
pub const MIN_LOCAL_IDF: f64 = 1.35;

const TOP_NEIGHBOR_TERMS: usize = 8;
const SHOWN_NEIGHBOR_TERMS: usize = 5;

/// Prefix for template-generated suggestions.
pub const BETA_PREFIX: &str = "[BETA] ";

/// Coarse application domain inferred from query vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Health,
    Sports,
    Education,
    Finance,
    Sustainability,
    Security,
    Accessibility,
    General,
}

/// Checked in order; the first domain with a keyword in the query wins.
const DOMAIN_KEYWORDS: &[(Domain, &[&str])] = &[
    (
        Domain::Health,
        &["health", "clinic", "nurse", "patient", "medical", "hospital", "diagnosis"],
    ),
    (
        Domain::Sports,
        &["sport", "athlete", "coach", "football", "basketball", "soccer", "training"],
    ),
    (
        Domain::Education,
        &["school", "student", "teacher", "class", "study", "learning", "curriculum"],
    ),
    (
        Domain::Finance,
        &["finance", "budget", "billing", "invoice", "payment", "bank"],
    ),
    (
        Domain::Sustainability,
        &["carbon", "climate", "energy", "sustainability", "emissions"],
    ),
    (Domain::Security, &["security", "fraud", "auth", "privacy", "risk"]),
    (
        Domain::Accessibility,
        &["accessibility", "assistive", "disability", "screenreader"],
    ),
];

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Sports => "sports",
            Self::Education => "education",
            Self::Finance => "finance",
            Self::Sustainability => "sustainability",
            Self::Security => "security",
            Self::Accessibility => "accessibility",
            Self::General => "general",
        }
    }

    /// Bucket query tokens into a domain.
    pub fn detect(tokens: &[String]) -> Self {
        DOMAIN_KEYWORDS
            .iter()
            .find(|(_, keywords)| tokens.iter().any(|t| keywords.contains(&t.as_str())))
            .map(|(domain, _)| *domain)
            .unwrap_or(Self::General)
    }
}

const CONSTRAINT_TEMPLATES: &[&str] = &[
    "Add a hard constraint to {term}: offline-first, on-device only, or no sign-up at all.",
    "Commit {term} to one demanding environment, such as low connectivity, a classroom, or field work.",
];

const WORKFLOW_TEMPLATES: &[&str] = &[
    "Pin down the moment {term} is used: who opens it, when, and which decision it informs.",
    "Pick a single role in {domain} and one step they repeat every day, then design only for that.",
    "State what triggers {term} (a new event, a deadline, an alert) and what the next action is.",
];

const PROOF_TEMPLATES: &[&str] = &[
    "Define the measurable outcome of {term}: time saved, accuracy gained, or errors avoided.",
    "Describe the feedback loop that makes {term} better week over week.",
];

const DATA_TEMPLATES: &[&str] = &[
    "Name the main data source behind {term}: sensors, logs, forms, or an external feed.",
    "Explain which signal {term} depends on and how you will collect it.",
];

const IMPROVEMENT_PROMPTS: &[&str] = &[
    "Unique constraint: state one thing your version refuses to do or must always do that similar projects do not.",
    "Narrow workflow: replace the broad goal with one concrete workflow for one kind of user.",
    "Proof loop: decide how you will measure that it works and show that number in the demo.",
];

const UNIQUENESS_TWISTS: &[&str] = &[
    "Twist: serve an overlooked user group instead of the default one.",
    "Twist: move the core interaction to an unusual channel such as SMS, voice, or paper.",
    "Twist: pair the idea with a data source nobody else in this space uses.",
];

/// Checksum of the text used to pick template variants.
///
/// Sum of Unicode scalar values modulo 10 000; `0` for empty text.
pub fn seed_from_text(text: &str) -> usize {
    let sum: u64 = text.chars().map(|c| u64::from(u32::from(c))).sum();
    (sum % 10_000) as usize
}

fn pick<'a>(items: &[&'a str], seed: usize, offset: usize) -> &'a str {
    if items.is_empty() {
        return "";
    }
    items[(seed + offset) % items.len()]
}

/// IDF table over the neighbor texts, ignoring texts with no terms.
pub fn local_stats(neighbor_texts: &[&str]) -> LexicalStats {
    LexicalStats::from_term_sets(
        neighbor_texts
            .iter()
            .map(|t| tokenize_strict(t))
            .filter(|terms| !terms.is_empty()),
    )
}

/// Query terms that recur in the neighborhood and are locally informative.
///
/// Sorted by descending local IDF, then lexicographically; at most `k`.
pub fn overlap_terms(query_text: &str, neighbor_texts: &[&str], k: usize) -> Vec<String> {
    let query: BTreeSet<String> = tokenize_strict(query_text).into_iter().collect();
    if query.is_empty() || neighbor_texts.is_empty() {
        return Vec::new();
    }

    let local = local_stats(neighbor_texts);
    let mut shared: Vec<(String, f64)> = query
        .into_iter()
        .filter(|t| local.df(t) > 0)
        .map(|t| {
            let idf = local.idf(&t);
            (t, idf)
        })
        .filter(|(_, idf)| *idf >= MIN_LOCAL_IDF)
        .collect();

    shared.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    shared.into_iter().take(k).map(|(t, _)| t).collect()
}

/// Most frequent terms across the texts; ties keep first-seen order.
pub fn top_terms(texts: &[&str], k: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let mut next = 0usize;
    for text in texts {
        for term in tokenize_strict(text) {
            let entry = counts.entry(term).or_insert_with(|| {
                next += 1;
                (0, next)
            });
            entry.0 += 1;
        }
    }

    let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
    ranked
        .into_iter()
        .take(k)
        .map(|(term, (count, _))| (term, count))
        .collect()
}

/// The query token that is most informative locally.
///
/// Ties prefer longer tokens, then lexicographic order. `"idea"` when the
/// query has no tokens.
fn key_term(tokens: &[String], local: &LexicalStats) -> String {
    tokens
        .iter()
        .min_by(|a, b| {
            local
                .idf(b)
                .total_cmp(&local.idf(a))
                .then(b.len().cmp(&a.len()))
                .then(a.cmp(b))
        })
        .cloned()
        .unwrap_or_else(|| "idea".to_string())
}

/// Build the ordered suggestion list.
///
/// `score` (the all-time originality score, when known) adds one line of
/// score-band guidance. The output is a pure function of the inputs.
pub fn make_suggestions(
    query_text: &str,
    neighbor_texts: &[&str],
    score: Option<u8>,
) -> Vec<String> {
    let tokens = tokenize_strict(query_text);
    let overlap = overlap_terms(query_text, neighbor_texts, MAX_OVERLAP_TERMS);
    let neighbor_top: Vec<String> = top_terms(neighbor_texts, TOP_NEIGHBOR_TERMS)
        .into_iter()
        .map(|(t, _)| t)
        .collect();
    let local = local_stats(neighbor_texts);
    let domain = Domain::detect(&tokens);
    let seed = seed_from_text(query_text);
    let term = key_term(&tokens, &local);

    let mut out: Vec<String> = Vec::new();

    if tokens.len() <= 1 {
        out.push(
            "Add one or two sentences covering who the user is, what problem they hit, and what changes for them."
                .to_string(),
        );
    } else if tokens.len() <= 5 {
        out.push(
            "Name a target user and the exact task or decision they are working through."
                .to_string(),
        );
    }

    if let Some(score) = score {
        let line = match score {
            80.. => "This already reads as original. Spend the effort on a crisp demo and one measurable win.",
            60..=79 =>
                "You are differentiated; tightening the niche will make it stand out further.",
            40..=59 => "This space is somewhat crowded. Choose a narrower workflow or a harder constraint.",
            _ => "This space is very crowded. Look for a sharper niche or a genuinely new angle.",
        };
        out.push(line.to_string());
    }

    if !overlap.is_empty() {
        let shown: Vec<&str> = overlap
            .iter()
            .take(SHOWN_OVERLAP_TERMS)
            .map(String::as_str)
            .collect();
        out.push(format!(
            "Existing projects overlap with yours on {}. Swap one of those for a more specific constraint.",
            shown.join(", ")
        ));
    } else if tokens.len() <= 2 {
        out.push(
            "The description is very broad. Add a specific user, a moment of use, and an outcome you can measure."
                .to_string(),
        );
    } else if !neighbor_top.is_empty() {
        let shown: Vec<&str> = neighbor_top
            .iter()
            .take(SHOWN_NEIGHBOR_TERMS)
            .map(String::as_str)
            .collect();
        out.push(format!(
            "The description is broad; similar projects keep mentioning {}. Narrow it to one concrete workflow.",
            shown.join(", ")
        ));
    } else {
        out.push(
            "No strong shared constraints with existing projects, which is promising. Add a crisp niche to reinforce it."
                .to_string(),
        );
    }

    out.extend(IMPROVEMENT_PROMPTS.iter().map(|s| s.to_string()));

    let fill = |template: &str| -> String {
        template
            .replace("{term}", &term)
            .replace("{domain}", domain.as_str())
    };
    let pools = [
        CONSTRAINT_TEMPLATES,
        WORKFLOW_TEMPLATES,
        PROOF_TEMPLATES,
        DATA_TEMPLATES,
    ];
    for (offset, pool) in pools.iter().enumerate() {
        out.push(format!("{}{}", BETA_PREFIX, fill(pick(pool, seed, offset))));
    }

    out.extend(UNIQUENESS_TWISTS.iter().map(|s| s.to_string()));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEIGHBORS: &[&str] = &[
        "Offline triage assistant for rural clinic nurses",
        "Hospital billing dashboard with invoice export",
        "Clinic appointment reminders over SMS",
        "Fitness tracker for amateur football coaches",
    ];

    #[test]
    fn test_seed_checksum() {
        assert_eq!(seed_from_text(""), 0);
        assert_eq!(seed_from_text("abc"), 97 + 98 + 99);
        let long = "z".repeat(200); // 122 × 200 = 24 400
        assert_eq!(seed_from_text(&long), 4_400);
    }

    #[test]
    fn test_pick_wraps() {
        let items = ["a", "b", "c"];
        assert_eq!(pick(&items, 0, 0), "a");
        assert_eq!(pick(&items, 4, 1), "c");
        assert_eq!(pick(&[], 4, 1), "");
    }

    #[test]
    fn test_domain_detection_order() {
        let toks = |s: &[&str]| s.iter().map(|t| t.to_string()).collect::<Vec<_>>();
        assert_eq!(Domain::detect(&toks(&["nurse", "budget"])), Domain::Health);
        assert_eq!(Domain::detect(&toks(&["invoice", "fraud"])), Domain::Finance);
        assert_eq!(Domain::detect(&toks(&["drone"])), Domain::General);
    }

    #[test]
    fn test_overlap_terms_require_local_informativeness() {
        // "clinic" is in 2 of 4 neighbor docs: idf = ln(5/3) + 1 ≈ 1.51 ≥ 1.35.
        // "offline" is in 1 of 4: idf = ln(5/2) + 1 ≈ 1.92.
        let terms = overlap_terms("Offline clinic scheduling", NEIGHBORS, MAX_OVERLAP_TERMS);
        assert_eq!(terms, vec!["offline", "clinic"]);
    }

    #[test]
    fn test_overlap_terms_drop_ubiquitous_terms() {
        let neighbors = ["solar grid planner", "solar panel cleaner"];
        // "solar" is in every neighbor → idf 1.0 < 1.35
        assert!(overlap_terms("solar kiosk", &neighbors, 8).is_empty());
    }

    #[test]
    fn test_overlap_terms_empty_inputs() {
        assert!(overlap_terms("", NEIGHBORS, 8).is_empty());
        assert!(overlap_terms("offline clinic", &[], 8).is_empty());
    }

    #[test]
    fn test_top_terms_ties_keep_first_seen() {
        let top = top_terms(&["zeta alpha", "alpha beta zeta"], 3);
        assert_eq!(
            top,
            vec![("zeta".to_string(), 2), ("alpha".to_string(), 2), ("beta".to_string(), 1)]
        );
    }

    #[test]
    fn test_key_term_prefers_rare_then_long() {
        let local = local_stats(NEIGHBORS);
        let tokens = vec!["clinic".to_string(), "offline".to_string()];
        assert_eq!(key_term(&tokens, &local), "offline");
        // Both unseen → idf 1.0, longer wins.
        let tokens = vec!["kiosk".to_string(), "drones".to_string()];
        assert_eq!(key_term(&tokens, &local), "drones");
        assert_eq!(key_term(&[], &local), "idea");
    }

    #[test]
    fn test_suggestions_are_deterministic() {
        let q = "Offline clinic scheduling for nurses";
        assert_eq!(
            make_suggestions(q, NEIGHBORS, Some(55)),
            make_suggestions(q, NEIGHBORS, Some(55))
        );
    }

    #[test]
    fn test_suggestions_mention_overlap_terms() {
        let out = make_suggestions("Offline clinic scheduling", NEIGHBORS, None);
        assert!(out.iter().any(|s| s.contains("overlap with yours on offline, clinic")));
        assert_eq!(out.iter().filter(|s| s.starts_with(BETA_PREFIX)).count(), 4);
        assert!(out.last().unwrap().starts_with("Twist:"));
    }

    #[test]
    fn test_suggestions_without_neighbors_degrade_to_generic() {
        let out = make_suggestions("Drone pollination scheduling for orchards", &[], None);
        assert!(out.iter().any(|s| s.contains("No strong shared constraints")));
        assert!(out.iter().any(|s| s.starts_with("Unique constraint:")));
        // 4 tokens → short-description nudge, no score line.
        assert_eq!(out.len(), 1 + 1 + IMPROVEMENT_PROMPTS.len() + 4 + UNIQUENESS_TWISTS.len());
    }

    #[test]
    fn test_empty_query_uses_placeholder_term() {
        let out = make_suggestions("", &[], Some(85));
        assert!(out[0].starts_with("Add one or two sentences"));
        assert!(out[1].contains("already reads as original"));
        assert!(out[2].contains("very broad"));
        let beta: Vec<&String> = out.iter().filter(|s| s.starts_with(BETA_PREFIX)).collect();
        // Seed 0 → first constraint template.
        assert!(beta[0].contains("Add a hard constraint to idea"));
    }

    #[test]
    fn test_workflow_template_uses_domain() {
        // Seed 1071: (1071 + 1) % 3 == 1 selects the role-in-domain template.
        let q = "nurse rota,";
        assert_eq!(seed_from_text(q), 1071);
        let out = make_suggestions(q, &[], None);
        let expected = "[BETA] Pick a single role in health and one step they repeat every day, \
                        then design only for that.";
        assert!(out.iter().any(|s| s == expected));
    }

    #[test]
    fn test_workflow_template_variant_follows_seed() {
        // Seed 1027: (1027 + 1) % 3 == 2 selects the trigger template; "nurse" outranks "rota" on length.
        let q = "nurse rota";
        assert_eq!(seed_from_text(q), 1027);
        let out = make_suggestions(q, &[], None);
        assert!(out.iter().any(|s| s.starts_with("[BETA] State what triggers nurse")));
    }
}
