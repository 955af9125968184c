//! Snapshot statistics overview.
//!
//! Used by `orig stats` to confirm that a snapshot loads and to show what
//! it contains.

use originality_core::snapshot::Snapshot;

use crate::engine::Engine;

/// Run the stats command: print a summary of the loaded snapshot.
pub fn run_stats(engine: &Engine) {
    let config = engine.config();
    let snapshot = engine.snapshot();
    let stats = engine.stats();

    println!("Originality — Snapshot Stats");
    println!("============================");
    println!();
    println!("  Metadata:    {}", config.snapshot.meta_path.display());
    println!("  Dimensions:  {}", snapshot.dims());
    println!("  Embedding:   {}", config.embedding.provider);
    println!();
    println!("  Projects:    {}", stats.total_projects);
    println!(
        "  Recent:      {} ({}%)",
        stats.recent_projects,
        percent(stats.recent_projects, stats.total_projects)
    );
    println!("  Vocabulary:  {}", snapshot.stats().vocabulary_size());

    let sources = source_breakdown(snapshot);
    if !sources.is_empty() {
        println!();
        println!("  {:<20} {:>10}", "SOURCE", "PROJECTS");
        for (source, count) in sources {
            println!("  {:<20} {:>10}", source, count);
        }
    }
}

/// Project count per `source`, largest first, ties by name.
fn source_breakdown(snapshot: &Snapshot) -> Vec<(String, usize)> {
    let mut counts: std::collections::BTreeMap<&str, usize> = std::collections::BTreeMap::new();
    for project in snapshot.projects() {
        *counts.entry(project.source.as_str()).or_default() += 1;
    }
    let mut rows: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(source, count)| (source.to_string(), count))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows
}

fn percent(part: usize, total: usize) -> usize {
    if total > 0 {
        part * 100 / total
    } else {
        0
    }
}
