//! `orig check`: score one idea from the command line.

use anyhow::Result;
use originality_core::check::{CheckReport, CheckRequest, Neighbor};

use crate::engine::Engine;

/// Run a check and print either a text report or the JSON response body.
pub async fn run_check(engine: &Engine, req: &CheckRequest, json: bool) -> Result<()> {
    let report = engine.check(req).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &CheckReport) {
    println!("All-time: {:>3}  {}", report.score_all, report.label_all);
    println!("Recent:   {:>3}  {}", report.score_recent, report.label_recent);
    println!();
    println!("{}", report.trend_label);
    println!("  {}", report.trend_note);

    print_neighbors("Closest projects (all-time)", &report.neighbors_all);
    print_neighbors("Closest projects (recent)", &report.neighbors_recent);

    if !report.suggestions.is_empty() {
        println!();
        println!("Suggestions:");
        for s in &report.suggestions {
            println!("  - {}", s);
        }
    }
}

fn print_neighbors(heading: &str, neighbors: &[Neighbor]) {
    println!();
    if neighbors.is_empty() {
        println!("{}: none", heading);
        return;
    }
    println!("{}:", heading);
    for (i, n) in neighbors.iter().enumerate() {
        println!(
            "{}. [{:.2}] {} (semantic {:.2}, overlap {:.2})",
            i + 1,
            n.similarity,
            n.title,
            n.semantic_similarity,
            n.rare_overlap
        );
        if let Some(url) = &n.url {
            println!("    {}", url);
        }
        if !n.snippet.is_empty() {
            println!("    {}", n.snippet);
        }
    }
}
