//! Web server command.

use console::style;

use crate::config::Config;
use crate::repository::{init_schema, SqlitePool};

/// Start the web server.
pub async fn cmd_serve(config: &Config, host: &str, port: u16) -> anyhow::Result<()> {
    println!("{} Preparing database...", style("→").cyan());
    config.ensure_database_dir()?;
    if let Err(e) = init_schema(&SqlitePool::new(&config.database_url())).await {
        eprintln!("  {} Schema setup failed: {}", style("✗").red(), e);
        return Err(anyhow::anyhow!("Database initialization failed: {}", e));
    }
    println!("  {} Database ready", style("✓").green());

    println!(
        "{} Starting UA Media Scanner API at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(config, host, port).await
}
