use logbench_core::Attempt;
use reqwest::{header::InvalidHeaderValue, StatusCode};
use thiserror::Error;

/// Failures before any worker starts. These abort the whole benchmark.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Login rejected with status {0}")]
    LoginRejected(StatusCode),

    #[error("Login request failed: {0}")]
    Login(#[source] reqwest::Error),

    #[error("API key is not a valid header value")]
    InvalidApiKey(#[from] InvalidHeaderValue),

    #[error("Unable to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Transport level failure of a single request. Always counted, never propagated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for CallError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CallError::Timeout
        } else if err.is_connect() {
            CallError::Connection(err.to_string())
        } else {
            CallError::Transport(err.to_string())
        }
    }
}

impl From<CallError> for Attempt {
    fn from(err: CallError) -> Self {
        match err {
            CallError::Timeout => Attempt::Timeout,
            CallError::Connection(msg) => Attempt::Connection(msg),
            CallError::Transport(msg) => Attempt::Transport(msg),
        }
    }
}
