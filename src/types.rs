use chrono::{DateTime, Utc};
use serde::Deserialize;

// GitHub API response structures
#[derive(Debug, Deserialize)]
pub struct AuthenticatedUser {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoOwner {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateRepo {
    pub name: String,
    pub owner: RepoOwner,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub stargazers_count: u32,
    pub pushed_at: Option<DateTime<Utc>>,
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitActivityWeek {
    #[serde(default)]
    pub total: u64,
}
