//! Error types returned by remote API clients.

use std::fmt;

/// Errors that a [`RemoteApiClient`](crate::RemoteApiClient) call can fail with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The addressed resource does not exist remotely.
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Remote resource family, e.g. `product`.
        resource: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The platform understood the request and refused it.
    #[error("{name}: {message}")]
    Rejected {
        /// Platform error name, e.g. `INVALID_REQUEST`.
        name: String,
        /// Human readable detail.
        message: String,
    },

    /// The request never produced a platform answer.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// The client itself failed.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal failure.
        message: String,
    },
}

impl RemoteError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Creates a new `Rejected` error.
    #[must_use]
    pub fn rejected(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a new `Transport` error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the platform refused the request.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Returns the error category for logging purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Rejected { .. } => ErrorCategory::Rejected,
            Self::Transport { .. } => ErrorCategory::Transport,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of remote errors for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    NotFound,
    Rejected,
    Transport,
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Rejected => write!(f, "rejected"),
            Self::Transport => write!(f, "transport"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
