//! Error handling logic

use thiserror::Error;

/// Boxed error raised by an execution backend.
pub type BackendFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types surfaced by circuit construction, prediction, execution
/// and interpretation.
///
/// Every error is reported synchronously at the call that triggered it.
/// Nothing is retried or defaulted.
#[derive(Debug, Error)]
pub enum CqzeError {
    /// A protocol parameter is outside its valid range (M < 1, N < 1, zero shots).
    #[error("Invalid Parameter: {message}")]
    InvalidParameter {
        /// InvalidParameter failure message
        message: String,
    },

    /// Measurement data cannot be turned into a probability distribution.
    #[error("Malformed Input: {message}")]
    MalformedInput {
        /// MalformedInput failure message
        message: String,
    },

    /// The execution backend failed. The backend's own error is kept as the source.
    #[error("Collaborator Failure: {source}")]
    CollaboratorFailure {
        /// The unmodified backend error
        #[source]
        source: BackendFailure,
    },
}

impl CqzeError {
    pub(crate) fn invalid_parameter(message: impl Into<String>) -> Self {
        CqzeError::InvalidParameter { message: message.into() }
    }

    pub(crate) fn malformed_input(message: impl Into<String>) -> Self {
        CqzeError::MalformedInput { message: message.into() }
    }

    /// Wraps a backend error without altering it.
    pub fn collaborator<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CqzeError::CollaboratorFailure { source: Box::new(err) }
    }
}
