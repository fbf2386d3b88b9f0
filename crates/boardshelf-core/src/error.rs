//! Error taxonomy for catalog requests

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The request never produced a response (rejected, offline, timed out)
    #[error("network failure: {0}")]
    Network(String),

    /// The server answered with a non-2xx status
    #[error("server returned HTTP {status}: {body}")]
    Server { status: u16, body: String },

    /// The body was not the JSON shape we expected
    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("a refresh is already running")]
    RefreshInProgress,
}

impl CatalogError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, CatalogError::Malformed(_))
    }

    /// Short message suitable for a notice shown to the user
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::Network(_) => "Could not reach the server.".to_string(),
            CatalogError::Server { status, .. } => format!("Server error (HTTP {}).", status),
            CatalogError::Malformed(_) => "The server sent an unexpected response.".to_string(),
            CatalogError::RefreshInProgress => "A refresh is already running.".to_string(),
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Malformed(e.to_string())
    }
}
