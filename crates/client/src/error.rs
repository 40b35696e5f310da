use thiserror::Error;

/// Errors from talking to the remote todo service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid endpoint: {0}")]
    Endpoint(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Any non-success HTTP status. Response bodies are not parsed.
    #[error("server returned {0}")]
    Status(reqwest::StatusCode),
}

/// Operation-boundary failures, surfaced to the view as messages.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not load todos: {0}")]
    Fetch(#[source] ApiError),
    #[error("could not save changes: {0}")]
    Mutation(#[source] ApiError),
}
