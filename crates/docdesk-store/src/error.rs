//! Error types for the document gateway.

/// All errors a [`DocumentGateway`](crate::DocumentGateway) call can return.
///
/// `Auth`, `Read` and `Write` carry the remote service's own message, or a
/// generic fallback when the response body had none.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The identity service rejected the sign-in.
    #[error("{0}")]
    Auth(String),

    /// A list request was rejected.
    #[error("{0}")]
    Read(String),

    /// A create, patch or delete was rejected.
    #[error("{0}")]
    Write(String),

    /// Invalid gateway configuration.
    #[error("gateway config error: {0}")]
    Config(String),

    /// Network or HTTP client error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body could not be parsed.
    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),
}
