/// One ranked line of the badge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSummary {
    pub name: String,
    pub commits: u64,
    pub url: String,
}

/// Rate limit state reported by the last GitHub response
#[derive(Debug, Clone)]
pub struct RateLimitState {
    pub remaining: u32,
    pub limit: u32,
    pub reset_time: chrono::DateTime<chrono::Utc>,
    pub is_limited: bool,
}
