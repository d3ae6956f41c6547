use thiserror::Error;

/// Failure of a single upstream search. Always soft: the fetcher absorbs
/// these and contributes an empty result instead of aborting the feed.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("upstream returned {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed upstream payload: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Auth failures, subtyped for status mapping: missing and unknown map to
/// 401, an invalid or expired credential to 403.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing token")]
    MissingCredential,
    #[error("invalid or expired token")]
    InvalidCredential,
    #[error("user not found")]
    UnknownUser,
}

/// Request-scoped failure of a core operation. Nothing here is retried
/// automatically and nothing is fatal to the process.
#[derive(Debug, Error)]
pub enum NewsError {
    #[error("{0}")]
    Validation(String),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
