mod common;

use common::{
    activity_json, repo_json, repo_page, short_timeout_config, test_config, test_retry_policy,
    TEST_TOKEN,
};
use httpmock::prelude::*;
use repo_activity_badge::config::BadgeConfig;
use repo_activity_badge::error::BadgeError;
use repo_activity_badge::github::GitHubClient;
use serde_json::json;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

fn client_for(server: &MockServer) -> GitHubClient {
    let config = test_config(server, Some(TEST_TOKEN));
    GitHubClient::from_config(TEST_TOKEN.to_string(), &config).expect("Failed to create client")
}

#[tokio::test]
async fn test_github_client_creation() {
    let client = GitHubClient::new("test_token".to_string());
    assert!(client.is_ok());
}

#[tokio::test]
async fn test_invalid_base_url() {
    let config = BadgeConfig {
        api_base_url: "not a url".to_string(),
        ..Default::default()
    };
    let result = GitHubClient::from_config("t".to_string(), &config);
    assert!(matches!(result, Err(BadgeError::InvalidUrl(_))));
}

#[tokio::test]
async fn test_resolve_identity_sends_token() {
    let server = MockServer::start_async().await;
    let user = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/user")
                .header("authorization", "Bearer test_token")
                .header("accept", "application/vnd.github+json");
            then.status(200).json_body(json!({ "login": "Octo", "id": 1 }));
        })
        .await;

    let identity = assert_ok!(client_for(&server).resolve_identity().await);

    user.assert_async().await;
    assert_eq!(identity.as_deref(), Some("Octo"));
}

#[tokio::test]
async fn test_unresolved_identity_is_anonymous() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/user");
            then.status(401).json_body(json!({ "message": "Bad credentials" }));
        })
        .await;

    let identity = assert_ok!(client_for(&server).resolve_identity().await);
    assert!(identity.is_none());
}

#[tokio::test]
async fn test_public_listing_stops_on_short_page() {
    let server = MockServer::start_async().await;
    let page1 = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/users/octo/repos")
                .query_param("page", "1")
                .query_param("per_page", "100");
            then.status(200).json_body(repo_page("one", "octo", 100));
        })
        .await;
    let page2 = server
        .mock_async(|when, then| {
            when.method(GET).path("/users/octo/repos").query_param("page", "2");
            then.status(200).json_body(repo_page("two", "octo", 3));
        })
        .await;
    let page3 = server
        .mock_async(|when, then| {
            when.method(GET).path("/users/octo/repos").query_param("page", "3");
            then.status(200).json_body(json!([]));
        })
        .await;

    let repos = assert_ok!(client_for(&server).list_repositories("octo", false, 10).await);

    page1.assert_async().await;
    page2.assert_async().await;
    page3.assert_hits_async(0).await;
    assert_eq!(repos.len(), 103);
}

#[tokio::test]
async fn test_listing_stops_on_empty_page() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users/octo/repos").query_param("page", "1");
            then.status(200).json_body(repo_page("one", "octo", 100));
        })
        .await;
    let page2 = server
        .mock_async(|when, then| {
            when.method(GET).path("/users/octo/repos").query_param("page", "2");
            then.status(200).json_body(json!([]));
        })
        .await;

    let repos = assert_ok!(client_for(&server).list_repositories("octo", false, 10).await);

    page2.assert_async().await;
    assert_eq!(repos.len(), 100);
}

#[tokio::test]
async fn test_listing_respects_page_ceiling() {
    let server = MockServer::start_async().await;
    let pages = server
        .mock_async(|when, then| {
            when.method(GET).path("/users/octo/repos");
            then.status(200).json_body(repo_page("any", "octo", 100));
        })
        .await;

    let repos = assert_ok!(client_for(&server).list_repositories("octo", false, 2).await);

    pages.assert_hits_async(2).await;
    assert_eq!(repos.len(), 200);
}

#[tokio::test]
async fn test_listing_error_keeps_partial_results() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users/octo/repos").query_param("page", "1");
            then.status(200).json_body(repo_page("one", "octo", 100));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users/octo/repos").query_param("page", "2");
            then.status(502).body("bad gateway");
        })
        .await;

    let repos = assert_ok!(client_for(&server).list_repositories("octo", false, 10).await);
    assert_eq!(repos.len(), 100);
}

#[tokio::test]
async fn test_listing_timeout_keeps_partial_results() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users/octo/repos").query_param("page", "1");
            then.status(200).json_body(repo_page("one", "octo", 100));
        })
        .await;
    let slow = server
        .mock_async(|when, then| {
            when.method(GET).path("/users/octo/repos").query_param("page", "2");
            then.status(200)
                .delay(Duration::from_millis(1500))
                .json_body(repo_page("two", "octo", 100));
        })
        .await;
    let page3 = server
        .mock_async(|when, then| {
            when.method(GET).path("/users/octo/repos").query_param("page", "3");
            then.status(200).json_body(repo_page("three", "octo", 1));
        })
        .await;

    let config = short_timeout_config(&server, Duration::from_millis(200));
    let client = GitHubClient::from_config(TEST_TOKEN.to_string(), &config).unwrap();
    let repos = assert_ok!(client.list_repositories("octo", false, 10).await);

    slow.assert_async().await;
    page3.assert_hits_async(0).await;
    assert_eq!(repos.len(), 100);
}

#[tokio::test]
async fn test_listing_unreachable_api_is_empty() {
    // nothing listens on port 9 (discard) here, so every connection fails
    let config = BadgeConfig {
        api_base_url: "http://127.0.0.1:9".to_string(),
        request_timeout: Duration::from_secs(2),
        ..Default::default()
    };
    let client = GitHubClient::from_config(TEST_TOKEN.to_string(), &config).unwrap();

    let repos = assert_ok!(client.list_repositories("octo", false, 10).await);
    assert!(repos.is_empty());
}

#[tokio::test]
async fn test_listing_first_page_error_is_empty() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users/ghost/repos");
            then.status(404).json_body(json!({ "message": "Not Found" }));
        })
        .await;

    let repos = assert_ok!(client_for(&server).list_repositories("ghost", false, 10).await);
    assert!(repos.is_empty());
}

#[tokio::test]
async fn test_own_listing_keeps_only_owned_repos() {
    let server = MockServer::start_async().await;
    let own = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/user/repos")
                .query_param("visibility", "all")
                .query_param("page", "1");
            then.status(200).json_body(json!([
                repo_json("mine", "Octo", false, 1, "2024-01-01T00:00:00Z"),
                repo_json("theirs", "some-org", false, 50, "2024-02-01T00:00:00Z"),
                repo_json("private-mine", "octo", false, 0, "2024-03-01T00:00:00Z"),
            ]));
        })
        .await;
    let public = server
        .mock_async(|when, then| {
            when.method(GET).path("/users/octo/repos");
            then.status(200).json_body(json!([]));
        })
        .await;

    let repos = assert_ok!(client_for(&server).list_repositories("octo", true, 10).await);

    own.assert_async().await;
    public.assert_hits_async(0).await;
    let names: Vec<&str> = repos.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["mine", "private-mine"]);
}

#[tokio::test]
async fn test_undecodable_listing_is_an_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users/octo/repos");
            then.status(200).body("<html>not json</html>");
        })
        .await;

    let error = assert_err!(client_for(&server).list_repositories("octo", false, 10).await);
    assert!(matches!(error, BadgeError::JsonError(_)));
}

#[tokio::test]
async fn test_commit_activity_sum() {
    let server = MockServer::start_async().await;
    let stats = server
        .mock_async(|when, then| {
            when.method(GET).path("/repos/octo/tool/stats/commit_activity");
            then.status(200).json_body(activity_json(&[1, 0, 4, 2]));
        })
        .await;

    let total = client_for(&server)
        .commit_activity_total("octo", "tool", &test_retry_policy())
        .await;

    stats.assert_async().await;
    assert_eq!(total, 7);
}

#[tokio::test]
async fn test_commit_activity_still_computing_counts_zero() {
    let server = MockServer::start_async().await;
    let stats = server
        .mock_async(|when, then| {
            when.method(GET).path("/repos/octo/slow/stats/commit_activity");
            then.status(202).json_body(json!({}));
        })
        .await;

    let policy = test_retry_policy();
    let total = client_for(&server)
        .commit_activity_total("octo", "slow", &policy)
        .await;

    assert_eq!(total, 0);
    stats.assert_hits_async(policy.max_attempts as usize).await;
}

#[tokio::test]
async fn test_commit_activity_definitive_failures_count_zero() {
    let server = MockServer::start_async().await;
    let missing = server
        .mock_async(|when, then| {
            when.method(GET).path("/repos/octo/gone/stats/commit_activity");
            then.status(404);
        })
        .await;
    let forbidden = server
        .mock_async(|when, then| {
            when.method(GET).path("/repos/octo/secret/stats/commit_activity");
            then.status(403).json_body(json!({ "message": "Forbidden" }));
        })
        .await;
    let empty = server
        .mock_async(|when, then| {
            when.method(GET).path("/repos/octo/empty/stats/commit_activity");
            then.status(204);
        })
        .await;

    let client = client_for(&server);
    let policy = test_retry_policy();

    assert_eq!(client.commit_activity_total("octo", "gone", &policy).await, 0);
    assert_eq!(client.commit_activity_total("octo", "secret", &policy).await, 0);
    assert_eq!(client.commit_activity_total("octo", "empty", &policy).await, 0);

    // definitive answers are never retried
    missing.assert_hits_async(1).await;
    forbidden.assert_hits_async(1).await;
    empty.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_commit_activity_upstream_failures_count_zero() {
    let server = MockServer::start_async().await;
    let slow = server
        .mock_async(|when, then| {
            when.method(GET).path("/repos/octo/slow/stats/commit_activity");
            then.status(200)
                .delay(Duration::from_millis(1500))
                .json_body(activity_json(&[9]));
        })
        .await;
    let broken = server
        .mock_async(|when, then| {
            when.method(GET).path("/repos/octo/broken/stats/commit_activity");
            then.status(500).body("oops");
        })
        .await;
    let limited = server
        .mock_async(|when, then| {
            when.method(GET).path("/repos/octo/limited/stats/commit_activity");
            then.status(403)
                .header("X-RateLimit-Remaining", "0")
                .json_body(json!({ "message": "API rate limit exceeded" }));
        })
        .await;

    let config = short_timeout_config(&server, Duration::from_millis(200));
    let client = GitHubClient::from_config(TEST_TOKEN.to_string(), &config).unwrap();
    let policy = test_retry_policy();

    assert_eq!(client.commit_activity_total("octo", "slow", &policy).await, 0);
    assert_eq!(client.commit_activity_total("octo", "broken", &policy).await, 0);
    assert_eq!(client.commit_activity_total("octo", "limited", &policy).await, 0);

    // only "still computing" is retried
    slow.assert_hits_async(1).await;
    broken.assert_hits_async(1).await;
    limited.assert_hits_async(1).await;
}

#[tokio::test]
#[ignore = "Requires valid GitHub token"]
async fn test_live_commit_activity() {
    let token = std::env::var("GITHUB_TOKEN").expect("GITHUB_TOKEN not set");
    let client = GitHubClient::new(token).expect("Failed to create client");

    let repos = client
        .list_repositories("octocat", false, 1)
        .await
        .expect("Failed to list repositories");
    assert!(!repos.is_empty());
}
