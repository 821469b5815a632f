//! Error types for the Gantry submission path

use thiserror::Error;

use crate::compiler::CompilationError;

/// Result type alias for submission operations
pub type Result<T> = std::result::Result<T, SubmitError>;

/// Errors that can occur while submitting a job to a running cluster
///
/// Nothing here is retried internally: compilation, resolution, and client
/// retrieval failures are returned synchronously from the executor, and
/// submission failures surface through the pending job's future.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The execution plan could not be compiled into a job spec
    #[error("plan compilation failed: {0}")]
    Compilation(#[from] CompilationError),

    /// The configuration does not designate an existing cluster to target
    #[error("no target cluster configured: {0}")]
    MissingClusterId(String),

    /// The configured cluster could not be found or contacted
    #[error("cluster '{cluster}' is unavailable")]
    ClusterUnavailable {
        /// Identifier of the cluster that could not be reached
        cluster: String,
        #[source]
        source: TransportError,
    },

    /// The cluster rejected the job or the transport failed mid-submission
    #[error("job submission failed")]
    Submission(#[source] TransportError),

    /// The submission task was cancelled or panicked before completing
    #[error("internal error: {0}")]
    Internal(String),
}

/// Remote-call failures underlying an unavailable cluster or a failed
/// submission
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("failed to parse response: {0}")]
    Parse(String),
}

impl TransportError {
    /// Create an API error from status code and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status >= 500)
    }
}
