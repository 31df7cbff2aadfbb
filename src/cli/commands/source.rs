//! Known/new source management commands.

use console::style;

use super::helpers::{open_repository, truncate};
use crate::config::Config;
use crate::repository::{InsertOutcome, PromoteOutcome, SourceSink};

/// List known sources.
pub async fn cmd_known_list(config: &Config, json: bool) -> anyhow::Result<()> {
    let repo = open_repository(config).await?;
    let sources = repo.list_known().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sources)?);
        return Ok(());
    }

    if sources.is_empty() {
        println!(
            "{} No known sources. Add one with 'ua-media-scanner known add <url>'.",
            style("!").yellow()
        );
        return Ok(());
    }

    println!("\n{}", style("Known Sources").bold());
    println!("{}", "-".repeat(72));
    println!("{:<6} {:<28} {:<24} Added", "ID", "Domain", "Name");
    println!("{}", "-".repeat(72));

    for source in sources {
        println!(
            "{:<6} {:<28} {:<24} {}",
            source.id,
            truncate(&source.domain, 27),
            truncate(&source.name, 23),
            source.created_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}

/// Add a vetted source directly.
pub async fn cmd_known_add(
    config: &Config,
    url: &str,
    name: &str,
    description: &str,
) -> anyhow::Result<()> {
    let repo = open_repository(config).await?;

    match repo.add_known(url, name, description).await? {
        InsertOutcome::Inserted(id) => {
            println!("{} Added known source #{}: {}", style("✓").green(), id, url)
        }
        InsertOutcome::AlreadyKnown | InsertOutcome::AlreadyNew(_) => {
            println!("{} Already a known source: {}", style("!").yellow(), url)
        }
    }

    Ok(())
}

/// List sources awaiting verification.
pub async fn cmd_new_list(config: &Config, verified_only: bool, json: bool) -> anyhow::Result<()> {
    let repo = open_repository(config).await?;
    let sources: Vec<_> = repo
        .list_new()
        .await?
        .into_iter()
        .filter(|s| !verified_only || s.verification.is_verified)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&sources)?);
        return Ok(());
    }

    if sources.is_empty() {
        println!("{} No new sources", style("!").yellow());
        return Ok(());
    }

    println!("\n{}", style("New Sources").bold());
    println!("{}", "-".repeat(78));
    println!(
        "{:<6} {:<26} {:<12} {:<9} Title",
        "ID", "Domain", "Found via", "Verified"
    );
    println!("{}", "-".repeat(78));

    for source in sources {
        let verified = if source.verification.is_verified {
            style("yes").green()
        } else {
            style("no").dim()
        };
        println!(
            "{:<6} {:<26} {:<12} {:<9} {}",
            source.id,
            truncate(&source.domain, 25),
            source.source_origin.label(),
            verified,
            truncate(&source.title, 20)
        );
    }

    Ok(())
}

/// Mark a new source as verified.
pub async fn cmd_verify(config: &Config, id: i32) -> anyhow::Result<()> {
    let repo = open_repository(config).await?;

    match repo.verify(id).await? {
        Some(source) => println!(
            "{} Verified #{} ({})",
            style("✓").green(),
            id,
            source.domain
        ),
        None => println!("{} New source #{} not found", style("✗").red(), id),
    }

    Ok(())
}

/// Promote a verified new source into known sources.
pub async fn cmd_promote(config: &Config, id: i32) -> anyhow::Result<()> {
    let repo = open_repository(config).await?;

    match repo.promote(id).await? {
        PromoteOutcome::Promoted(known_id) => println!(
            "{} Promoted #{} to known source #{}",
            style("✓").green(),
            id,
            known_id
        ),
        PromoteOutcome::NotVerified => println!(
            "{} New source #{} is not verified; run 'ua-media-scanner verify {}' first",
            style("!").yellow(),
            id,
            id
        ),
        PromoteOutcome::Missing => println!("{} New source #{} not found", style("✗").red(), id),
    }

    Ok(())
}

/// Promote every verified new source.
pub async fn cmd_sync(config: &Config) -> anyhow::Result<()> {
    let repo = open_repository(config).await?;
    let promoted = repo.sync_verified().await?;

    println!(
        "{} Promoted {} verified source{}",
        style("✓").green(),
        promoted,
        if promoted == 1 { "" } else { "s" }
    );

    Ok(())
}
