use crate::config::DEFAULT_USER_AGENT;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "repo-activity-badge")]
#[command(about = "Repo Activity Badge - Renders a user's most active GitHub repositories as SVG")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Address the HTTP server binds to
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
    pub bind: String,

    /// GitHub access token used for every upstream call
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Account rendered when the request names none
    #[arg(long, env = "DEFAULT_USERNAME", default_value = "octocat")]
    pub default_username: String,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub api_base_url: String,

    /// User-Agent sent to GitHub
    #[arg(long, env = "GITHUB_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Maximum number of repository listing pages fetched per request
    #[arg(long, env = "MAX_PAGES", default_value_t = 10)]
    pub max_pages: u32,

    /// Attempts made against the commit-activity endpoint while it is still computing
    #[arg(long, env = "STATS_ATTEMPTS", default_value_t = 4)]
    pub stats_attempts: u32,

    /// Base backoff between commit-activity attempts, in milliseconds
    #[arg(long, env = "STATS_BACKOFF_MS", default_value_t = 750)]
    pub stats_backoff_ms: u64,

    /// Commit-activity requests in flight at once
    #[arg(long, env = "STATS_CONCURRENCY", default_value_t = 4)]
    pub concurrency: usize,

    /// Per-call upstream timeout, in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value_t = 2500)]
    pub request_timeout_ms: u64,
}
