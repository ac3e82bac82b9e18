use crate::cli::Cli;
use crate::retry::RetryPolicy;
use std::time::Duration;

pub const MIN_CANDIDATES: usize = 3;
pub const MAX_CANDIDATES: usize = 40;
pub const DEFAULT_CANDIDATES: usize = 12;

pub const MIN_SHOW: usize = 1;
pub const MAX_SHOW: usize = 20;
pub const DEFAULT_SHOW: usize = 5;

pub const DEFAULT_USER_AGENT: &str = concat!("repo-activity-badge/", env!("CARGO_PKG_VERSION"));

const MIN_STATS_ATTEMPTS: u32 = 2;
const MAX_STATS_ATTEMPTS: u32 = 8;

/// Everything the badge service needs, fixed at construction.
#[derive(Debug, Clone)]
pub struct BadgeConfig {
    pub github_token: Option<String>,
    pub default_username: String,
    pub api_base_url: String,
    pub user_agent: String,
    pub max_pages: u32,
    pub stats_retry: RetryPolicy,
    pub concurrency: usize,
    pub request_timeout: Duration,
    pub cache_control: String,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            default_username: "octocat".to_string(),
            api_base_url: "https://api.github.com".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_pages: 10,
            stats_retry: RetryPolicy::new(4, Duration::from_millis(750)),
            concurrency: 4,
            request_timeout: Duration::from_millis(2500),
            cache_control: "s-maxage=1800, stale-while-revalidate=3600".to_string(),
        }
    }
}

impl From<&Cli> for BadgeConfig {
    fn from(cli: &Cli) -> Self {
        let attempts = cli.stats_attempts.clamp(MIN_STATS_ATTEMPTS, MAX_STATS_ATTEMPTS);

        Self {
            // An empty GITHUB_TOKEN= line in .env means "not configured"
            github_token: cli
                .github_token
                .as_ref()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            default_username: cli.default_username.clone(),
            api_base_url: cli.api_base_url.trim_end_matches('/').to_string(),
            user_agent: cli.user_agent.clone(),
            max_pages: cli.max_pages.max(1),
            stats_retry: RetryPolicy::new(attempts, Duration::from_millis(cli.stats_backoff_ms)),
            concurrency: cli.concurrency.max(1),
            request_timeout: Duration::from_millis(cli.request_timeout_ms),
            ..Default::default()
        }
    }
}
