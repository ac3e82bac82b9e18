use thiserror::Error;

#[derive(Error, Debug)]
pub enum BadgeError {
    #[error("GitHub API error: {0}")]
    ApiError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Statistics still being computed: {0}")]
    StatsPending(String),

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl BadgeError {
    /// Whether a commit-activity request is worth repeating.
    pub fn is_pending(&self) -> bool {
        matches!(self, BadgeError::StatsPending(_))
    }
}

pub type Result<T> = std::result::Result<T, BadgeError>;
