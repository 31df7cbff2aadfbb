//! Shared helper functions for CLI commands.

use crate::config::Config;
use crate::repository::{init_schema, DieselSourceRepository, SqlitePool};

/// Open the configured database, creating it and its tables if needed.
pub async fn open_repository(config: &Config) -> anyhow::Result<DieselSourceRepository> {
    config.ensure_database_dir()?;
    let pool = SqlitePool::new(&config.database_url());
    init_schema(&pool).await?;
    Ok(DieselSourceRepository::new(pool))
}

/// Truncate to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("Українська правда", 40), "Українська правда");
        assert_eq!(truncate("Українська правда", 8), "Украї...");
    }
}
