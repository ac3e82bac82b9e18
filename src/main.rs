use clap::Parser;
use colored::*;
use repo_activity_badge::badge::BadgeService;
use repo_activity_badge::cli::Cli;
use repo_activity_badge::config::BadgeConfig;
use repo_activity_badge::server::{start_server, AppState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();
    let config = BadgeConfig::from(&cli);

    println!("{}", "Repo Activity Badge Server".bold().green());
    println!("{}\n", "=".repeat(50).dimmed());

    if config.github_token.is_none() {
        println!("{}", "GITHUB_TOKEN is not set: badge requests will fail with 500".yellow());
        warn!("Starting without a GitHub token");
    }

    info!(
        default_username = %config.default_username,
        api_base_url = %config.api_base_url,
        max_pages = config.max_pages,
        concurrency = config.concurrency,
        stats_attempts = config.stats_retry.max_attempts,
        "Configuration loaded"
    );

    let service = BadgeService::new(config)?;
    let state = AppState::new(service);

    println!("📡 Serving badges on http://{}/api/top-repos", cli.bind);
    println!("\nPress Ctrl+C to stop the server\n");

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        println!("\n🛑 Shutting down server...");
    };

    start_server(state, &cli.bind, shutdown).await?;

    println!("✅ Server stopped");

    Ok(())
}
