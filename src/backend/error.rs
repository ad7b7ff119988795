//! Backend API-specific error types.

/// Errors that can occur while talking to the remote query service.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// The RPC endpoint returned an error payload
    #[error("RPC error (code {code}): {message}")]
    Rpc { code: i64, message: String },

    /// Failed to deserialize a response payload
    #[error("Failed to deserialize response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// Authentication was rejected by the server
    #[error("Authentication failed for user '{user}'")]
    AuthFailed { user: String },

    /// Generic backend error
    #[error("Backend error: {0}")]
    #[allow(dead_code)]
    Other(String),
}
