//! Initialize command.

use console::style;

use super::helpers::open_repository;
use crate::config::Config;

/// Create the database file and its tables.
pub async fn cmd_init(config: &Config) -> anyhow::Result<()> {
    let repo = open_repository(config).await?;
    let known = repo.count_known().await?;
    let pending = repo.count_new().await?;

    println!(
        "{} Initialized database at {}",
        style("✓").green(),
        config.database_url()
    );
    println!("  Known sources: {}", known);
    println!("  New sources:   {}", pending);

    Ok(())
}
