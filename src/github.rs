use crate::config::BadgeConfig;
use crate::error::{BadgeError, Result};
use crate::models::RateLimitState;
use crate::retry::{retry_with_backoff, RetryOutcome, RetryPolicy};
use crate::types::{AuthenticatedUser, CandidateRepo, CommitActivityWeek};
use chrono::{DateTime, Utc};
use reqwest::header::ACCEPT;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info, warn};
use url::Url;

pub const PER_PAGE: usize = 100;
pub const LOOKBACK_WEEKS: usize = 52;
const LOW_RATE_LIMIT: u32 = 10;
const SELF_AFFILIATION: &str = "owner,collaborator,organization_member";

pub struct GitHubClient {
    client: Client,
    token: String,
    base_url: Url,
}

impl GitHubClient {
    pub fn new(token: String) -> Result<Self> {
        Self::from_config(token, &BadgeConfig::default())
    }

    pub fn from_config(token: String, config: &BadgeConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .build()?;

        let base_url = Url::parse(&config.api_base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(BadgeError::ApiError(format!(
                "API base URL cannot carry a path: {}",
                base_url
            )));
        }

        Ok(GitHubClient {
            client,
            token,
            base_url,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BadgeError::ApiError(format!("Invalid API base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn make_request(&self, url: Url) -> Result<Response> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json")
            .bearer_auth(&self.token)
            .send()
            .await?;

        if let Some(rate_limit) = Self::rate_limit_state(&response) {
            if rate_limit.remaining < LOW_RATE_LIMIT {
                warn!(
                    remaining = rate_limit.remaining,
                    limit = rate_limit.limit,
                    reset_time = %rate_limit.reset_time,
                    "GitHub rate limit low"
                );
            }
        }

        Ok(response)
    }

    /// Rate limit state from the response headers, if GitHub sent any.
    pub fn rate_limit_state(response: &Response) -> Option<RateLimitState> {
        let headers = response.headers();

        let remaining = headers
            .get("X-RateLimit-Remaining")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<u32>().ok())?;

        let limit = headers
            .get("X-RateLimit-Limit")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(5000);

        let reset_time = headers
            .get("X-RateLimit-Reset")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(|timestamp| DateTime::from_timestamp(timestamp, 0))
            .unwrap_or_else(|| Utc::now() + chrono::Duration::hours(1));

        Some(RateLimitState {
            remaining,
            limit,
            reset_time,
            is_limited: remaining == 0,
        })
    }

    /// Login of the token's owner, or `None` when GitHub does not tell us.
    pub async fn resolve_identity(&self) -> Result<Option<String>> {
        let url = self.endpoint(&["user"])?;

        let response = match self.make_request(url).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Identity lookup failed, listing public repositories only");
                return Ok(None);
            }
        };

        if response.status() != StatusCode::OK {
            debug!(status = %response.status(), "Token identity unresolved");
            return Ok(None);
        }

        match response.json::<AuthenticatedUser>().await {
            Ok(user) => Ok(Some(user.login)),
            Err(e) => {
                warn!(error = %e, "Unreadable identity response");
                Ok(None)
            }
        }
    }

    fn listing_url(&self, owner: &str, include_private: bool, page: u32) -> Result<Url> {
        let mut url = if include_private {
            self.endpoint(&["user", "repos"])?
        } else {
            self.endpoint(&["users", owner, "repos"])?
        };

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("per_page", &PER_PAGE.to_string())
                .append_pair("page", &page.to_string())
                .append_pair("sort", "pushed");
            if include_private {
                query
                    .append_pair("visibility", "all")
                    .append_pair("affiliation", SELF_AFFILIATION);
            } else {
                query.append_pair("type", "owner");
            }
        }

        Ok(url)
    }

    /// Lists the repositories owned by `owner`.
    ///
    /// With `include_private` the authenticated endpoint is used, which also
    /// returns collaborator and organization repositories; those are dropped.
    /// A failed page ends pagination and keeps what was already collected.
    pub async fn list_repositories(
        &self,
        owner: &str,
        include_private: bool,
        max_pages: u32,
    ) -> Result<Vec<CandidateRepo>> {
        let mut repos = Vec::new();

        for page in 1..=max_pages {
            let url = self.listing_url(owner, include_private, page)?;

            let response = match self.make_request(url).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(owner, page, error = %e, "Repository listing request failed");
                    break;
                }
            };

            if response.status() != StatusCode::OK {
                warn!(owner, page, status = %response.status(), "Repository listing stopped early");
                break;
            }

            let body = match response.bytes().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(owner, page, error = %e, "Repository listing body interrupted");
                    break;
                }
            };
            let batch: Vec<CandidateRepo> = serde_json::from_slice(&body)?;
            let fetched = batch.len();

            if include_private {
                repos.extend(
                    batch
                        .into_iter()
                        .filter(|repo| repo.owner.login.eq_ignore_ascii_case(owner)),
                );
            } else {
                repos.extend(batch);
            }

            if fetched < PER_PAGE {
                break;
            }
        }

        debug!(owner, include_private, count = repos.len(), "Listed repositories");
        Ok(repos)
    }

    async fn request_commit_activity(&self, owner: &str, repo: &str) -> Result<Vec<CommitActivityWeek>> {
        let url = self.endpoint(&["repos", owner, repo, "stats", "commit_activity"])?;
        let response = self.make_request(url.clone()).await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.bytes().await?;
                Ok(serde_json::from_slice(&body)?)
            }
            StatusCode::NO_CONTENT => Ok(Vec::new()),
            StatusCode::ACCEPTED => Err(BadgeError::StatsPending(format!("{}/{}", owner, repo))),
            StatusCode::NOT_FOUND => Err(BadgeError::NotFound(url.to_string())),
            StatusCode::FORBIDDEN
                if Self::rate_limit_state(&response).is_some_and(|r| r.is_limited) =>
            {
                Err(BadgeError::RateLimitExceeded(url.to_string()))
            }
            status @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                Err(BadgeError::AuthError(format!("{} for {}", status, url)))
            }
            status => Err(BadgeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }

    /// Commits made to `owner/repo` over the lookback window.
    ///
    /// Never fails: unavailable statistics count as zero.
    pub async fn commit_activity_total(&self, owner: &str, repo: &str, policy: &RetryPolicy) -> u64 {
        let outcome = retry_with_backoff(
            policy,
            |_| self.request_commit_activity(owner, repo),
            BadgeError::is_pending,
        )
        .await;

        match outcome {
            RetryOutcome::Succeeded(weeks) => sum_commit_activity(&weeks),
            RetryOutcome::Failed(e) => {
                info!(owner, repo, error = %e, "Commit activity unavailable, counting zero");
                0
            }
            RetryOutcome::Exhausted { attempts, .. } => {
                warn!(owner, repo, attempts, "Commit activity still computing, counting zero");
                0
            }
        }
    }
}

/// Sum of the trailing [`LOOKBACK_WEEKS`] weekly totals.
pub fn sum_commit_activity(weeks: &[CommitActivityWeek]) -> u64 {
    weeks
        .iter()
        .rev()
        .take(LOOKBACK_WEEKS)
        .map(|week| week.total)
        .sum()
}
