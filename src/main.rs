//! UA Media Scanner command-line entry point.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ua_media_scanner::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    let default_filter = if cli::is_verbose() {
        "ua_media_scanner=info"
    } else {
        "ua_media_scanner=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    cli::run().await
}
