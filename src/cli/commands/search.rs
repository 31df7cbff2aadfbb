//! Media search command.

use std::sync::Arc;

use console::style;

use super::helpers::{open_repository, truncate};
use crate::config::Config;
use crate::services::{DiscoveryService, SearchOutcome};

/// Run discovery for a query and store the results as new sources.
pub async fn cmd_search(
    config: &Config,
    query: &str,
    max_results: Option<usize>,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let repo = open_repository(config).await?;
    let service = DiscoveryService::from_config(config, Arc::new(repo)).await?;

    if !json {
        println!(
            "{} Searching for media sources: {}",
            style("→").cyan(),
            style(query).bold()
        );
    }

    let outcome = service.search(query, max_results, dry_run).await;
    service.shutdown().await;
    let outcome = outcome?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    Ok(())
}

fn print_outcome(outcome: &SearchOutcome) {
    if outcome.results.is_empty() {
        println!("{} No media sources found", style("!").yellow());
        return;
    }

    println!("\n{}", style("Discovered Sources").bold());
    println!("{}", "-".repeat(78));
    println!("{:<28} {:<12} Title", "Domain", "Found via");
    println!("{}", "-".repeat(78));

    for record in &outcome.results {
        println!(
            "{:<28} {:<12} {}",
            truncate(&record.domain, 27),
            record.source_origin.label(),
            truncate(&record.title, 36)
        );
        if !record.description.is_empty() {
            println!("  {}", style(truncate(&record.description, 74)).dim());
        }
        if let Some(score) = record
            .enrichment
            .as_ref()
            .and_then(|e| e.reliability_score)
        {
            println!("  reliability: {}/100", score);
        }
    }

    match outcome.stored {
        Some(summary) => println!(
            "\n{} Stored {} new, {} already known, {} already pending",
            style("✓").green(),
            summary.inserted,
            summary.already_known,
            summary.already_new
        ),
        None => println!("\n{} Dry run, nothing stored", style("!").yellow()),
    }
}
