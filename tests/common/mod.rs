#![allow(dead_code)]

use httpmock::MockServer;
use repo_activity_badge::config::BadgeConfig;
use repo_activity_badge::retry::RetryPolicy;
use serde_json::{json, Value};
use std::time::Duration;

pub const TEST_TOKEN: &str = "test_token";

/// Config pointing at a mock GitHub with fast retries
pub fn test_config(server: &MockServer, token: Option<&str>) -> BadgeConfig {
    BadgeConfig {
        github_token: token.map(str::to_string),
        default_username: "octocat".to_string(),
        api_base_url: server.base_url(),
        max_pages: 5,
        stats_retry: test_retry_policy(),
        concurrency: 4,
        request_timeout: Duration::from_secs(5),
        ..Default::default()
    }
}

/// Like [`test_config`], but requests give up after `timeout`
pub fn short_timeout_config(server: &MockServer, timeout: Duration) -> BadgeConfig {
    BadgeConfig {
        request_timeout: timeout,
        ..test_config(server, Some(TEST_TOKEN))
    }
}

pub fn test_retry_policy() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(1))
}

/// A repository listing record the way GitHub returns it
pub fn repo_json(name: &str, owner: &str, fork: bool, stars: u32, pushed_at: &str) -> Value {
    json!({
        "id": 1,
        "name": name,
        "full_name": format!("{}/{}", owner, name),
        "owner": { "login": owner, "id": 2 },
        "private": false,
        "fork": fork,
        "stargazers_count": stars,
        "pushed_at": pushed_at,
        "html_url": format!("https://github.com/{}/{}", owner, name),
    })
}

/// A full listing page of `count` repositories named `{prefix}-{n}`
pub fn repo_page(prefix: &str, owner: &str, count: usize) -> Value {
    Value::Array(
        (0..count)
            .map(|n| repo_json(&format!("{}-{}", prefix, n), owner, false, 0, "2024-01-01T00:00:00Z"))
            .collect(),
    )
}

/// Commit activity payload with one bucket per weekly total
pub fn activity_json(totals: &[u64]) -> Value {
    Value::Array(
        totals
            .iter()
            .enumerate()
            .map(|(i, total)| {
                json!({
                    "week": 1_700_000_000 + i as u64 * 604_800,
                    "total": total,
                    "days": [0, 0, 0, 0, 0, 0, total],
                })
            })
            .collect(),
    )
}
