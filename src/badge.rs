use crate::config::{
    BadgeConfig, DEFAULT_CANDIDATES, DEFAULT_SHOW, MAX_CANDIDATES, MAX_SHOW, MIN_CANDIDATES,
    MIN_SHOW,
};
use crate::error::{BadgeError, Result};
use crate::fanout::map_ordered_bounded;
use crate::github::GitHubClient;
use crate::models::RepoSummary;
use crate::ranking::{rank, select_candidates};
use crate::render::render_svg;
use std::time::Instant;
use tracing::{debug, info};

/// Raw query string of a badge request
#[derive(Debug, Default)]
pub struct BadgeQuery {
    pub username: Option<String>,
    pub user: Option<String>,
    pub limit: Option<String>,
    pub show: Option<String>,
}

impl BadgeQuery {
    /// Parses a URL query string. A repeated key keeps its first value and
    /// unknown keys are ignored, so no query string is ever rejected.
    pub fn parse(raw: Option<&str>) -> Self {
        let mut query = Self::default();

        for (key, value) in url::form_urlencoded::parse(raw.unwrap_or("").as_bytes()) {
            let slot = match key.as_ref() {
                "username" => &mut query.username,
                "user" => &mut query.user,
                "limit" => &mut query.limit,
                "show" => &mut query.show,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        query
    }
}

/// Badge parameters after defaults and clamping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeRequest {
    pub username: String,
    pub candidate_limit: usize,
    pub show: usize,
}

fn given(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

fn clamped(raw: Option<&str>, default: usize, min: usize, max: usize) -> usize {
    match raw.and_then(|value| value.trim().parse::<i64>().ok()) {
        Some(value) => value.clamp(min as i64, max as i64) as usize,
        None => default,
    }
}

impl BadgeRequest {
    /// `limit` and `show` must be whole numbers; anything else, decimals
    /// included (`show=2.5`), falls back to the default rather than being
    /// truncated. Whole numbers outside the allowed range are clamped.
    pub fn from_query(query: &BadgeQuery, default_username: &str) -> Self {
        let username = given(&query.username)
            .or_else(|| given(&query.user))
            .unwrap_or(default_username)
            .to_string();

        Self {
            username,
            candidate_limit: clamped(
                query.limit.as_deref(),
                DEFAULT_CANDIDATES,
                MIN_CANDIDATES,
                MAX_CANDIDATES,
            ),
            show: clamped(query.show.as_deref(), DEFAULT_SHOW, MIN_SHOW, MAX_SHOW),
        }
    }
}

/// Builds badges from live GitHub data.
pub struct BadgeService {
    config: BadgeConfig,
    client: Option<GitHubClient>,
}

impl BadgeService {
    pub fn new(config: BadgeConfig) -> Result<Self> {
        let client = match &config.github_token {
            Some(token) => Some(GitHubClient::from_config(token.clone(), &config)?),
            None => None,
        };

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &BadgeConfig {
        &self.config
    }

    pub fn has_token(&self) -> bool {
        self.client.is_some()
    }

    pub fn request_from_query(&self, query: &BadgeQuery) -> BadgeRequest {
        BadgeRequest::from_query(query, &self.config.default_username)
    }

    /// Ranked repositories of `request.username`, at most `request.show` of them.
    pub async fn top_repositories(&self, request: &BadgeRequest) -> Result<Vec<RepoSummary>> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| BadgeError::MissingConfig("GITHUB_TOKEN".to_string()))?;
        let started = Instant::now();
        let owner = request.username.as_str();

        let identity = client.resolve_identity().await?;
        let include_private = identity
            .as_deref()
            .is_some_and(|login| login.eq_ignore_ascii_case(owner));
        debug!(owner, ?identity, include_private, "Resolved token identity");

        let repos = client
            .list_repositories(owner, include_private, self.config.max_pages)
            .await?;
        let listed = repos.len();
        let candidates = select_candidates(repos, request.candidate_limit);

        let policy = self.config.stats_retry;
        let summaries = map_ordered_bounded(candidates, self.config.concurrency, |repo| async move {
            let commits = client
                .commit_activity_total(&repo.owner.login, &repo.name, &policy)
                .await;
            RepoSummary {
                name: repo.name,
                commits,
                url: repo.html_url,
            }
        })
        .await;
        let candidates = summaries.len();

        let ranked = rank(summaries, request.show);
        info!(
            owner,
            listed,
            candidates,
            shown = ranked.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Ranked repositories"
        );

        Ok(ranked)
    }

    pub async fn render_badge(&self, request: &BadgeRequest) -> Result<String> {
        let ranked = self.top_repositories(request).await?;
        Ok(render_svg(&request.username, &ranked))
    }
}
