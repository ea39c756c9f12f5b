//! Errors surfaced to the host by reconciliation.

use std::fmt;

use paypal_core::{ResourceKind, ValidationError};
use paypal_remote::{RemoteError, RemoteOperation};

use crate::translate::TranslateError;

/// Every failure a reconciler or the host adapter can return.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The desired state violates its schema. Nothing was sent remotely.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A nested block did not have the shape translation requires.
    #[error("malformed {path}: {reason}")]
    MalformedComposite { path: String, reason: String },

    /// A remote call failed.
    #[error("{operation} failed: {source}")]
    Remote {
        operation: RemoteOperation,
        #[source]
        source: RemoteError,
    },

    /// The resource no longer exists remotely.
    #[error("{kind} {id} not found")]
    NotFound { kind: ResourceKind, id: String },

    #[error("unknown resource kind: {0}")]
    UnknownKind(String),

    /// A multi-call operation failed after earlier calls were committed.
    ///
    /// The remote resource keeps whatever the committed calls wrote.
    #[error("{kind} {id} partially updated: {failed} failed after {} succeeded: {source}", format_operations(.committed))]
    PartiallyApplied {
        kind: ResourceKind,
        id: String,
        committed: Vec<RemoteOperation>,
        failed: RemoteOperation,
        #[source]
        source: RemoteError,
    },

    /// A lifecycle transition was attempted from the wrong state.
    #[error("cannot {operation} {kind}: resource is {state}")]
    InvalidState {
        kind: ResourceKind,
        operation: &'static str,
        state: &'static str,
    },

    /// The host's state store failed.
    #[error("state store error: {message}")]
    Store { message: String },
}

fn format_operations(operations: &[RemoteOperation]) -> String {
    operations
        .iter()
        .map(RemoteOperation::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ReconcileError {
    /// Wraps a remote failure, turning a missing resource into `NotFound`.
    #[must_use]
    pub fn remote(kind: ResourceKind, id: &str, operation: RemoteOperation, source: RemoteError) -> Self {
        if source.is_not_found() {
            Self::NotFound {
                kind,
                id: id.to_string(),
            }
        } else {
            Self::Remote { operation, source }
        }
    }

    #[must_use]
    pub fn invalid_state(kind: ResourceKind, operation: &'static str, state: &'static str) -> Self {
        Self::InvalidState {
            kind,
            operation,
            state,
        }
    }

    #[must_use]
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the caller may reasonably try again.
    ///
    /// Only remote failures qualify; local failures repeat identically.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Remote { .. } | Self::PartiallyApplied { .. })
    }

    /// Returns the error category for logging purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::MalformedComposite { .. } => ErrorCategory::Contract,
            Self::Remote { .. } | Self::PartiallyApplied { .. } => ErrorCategory::Remote,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::UnknownKind(_) => ErrorCategory::Lookup,
            Self::InvalidState { .. } => ErrorCategory::State,
            Self::Store { .. } => ErrorCategory::Store,
        }
    }
}

impl From<TranslateError> for ReconcileError {
    fn from(err: TranslateError) -> Self {
        match err {
            TranslateError::MalformedComposite { path, reason } => {
                Self::MalformedComposite { path, reason }
            }
        }
    }
}

/// Categories of reconcile errors for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Validation,
    Contract,
    Remote,
    NotFound,
    Lookup,
    State,
    Store,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Contract => write!(f, "contract"),
            Self::Remote => write!(f, "remote"),
            Self::NotFound => write!(f, "not_found"),
            Self::Lookup => write!(f, "lookup"),
            Self::State => write!(f, "state"),
            Self::Store => write!(f, "store"),
        }
    }
}

/// Convenience result type for reconcile operations.
pub type Result<T> = std::result::Result<T, ReconcileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_not_found_becomes_not_found() {
        let err = ReconcileError::remote(
            ResourceKind::SubscriptionPlan,
            "P-1",
            RemoteOperation::GetSubscriptionPlan,
            RemoteError::not_found("plan", "P-1"),
        );
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "paypal_subscription_plan P-1 not found");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_remote_failure_is_retryable() {
        let err = ReconcileError::remote(
            ResourceKind::CatalogProduct,
            "PROD-1",
            RemoteOperation::UpdateProduct,
            RemoteError::transport("timeout"),
        );
        assert!(err.is_retryable());
        assert_eq!(err.category(), ErrorCategory::Remote);
        assert_eq!(
            err.to_string(),
            "update_product failed: Transport error: timeout"
        );
    }

    #[test]
    fn test_partially_applied_display() {
        let err = ReconcileError::PartiallyApplied {
            kind: ResourceKind::SubscriptionPlan,
            id: "P-1".into(),
            committed: vec![RemoteOperation::UpdateSubscriptionPlan],
            failed: RemoteOperation::UpdateSubscriptionPlanPricing,
            source: RemoteError::rejected("INVALID_PARAMETER_VALUE", "bad sequence"),
        };
        assert_eq!(
            err.to_string(),
            "paypal_subscription_plan P-1 partially updated: update_subscription_plan_pricing \
             failed after update_subscription_plan succeeded: INVALID_PARAMETER_VALUE: bad sequence"
        );
        assert!(err.is_retryable());
    }

    #[test]
    fn test_local_errors_are_not_retryable() {
        let malformed: ReconcileError = TranslateError::MalformedComposite {
            path: "billing_cycle.0.frequency".into(),
            reason: "expected exactly one element, found 0".into(),
        }
        .into();
        assert!(!malformed.is_retryable());
        assert_eq!(malformed.category(), ErrorCategory::Contract);

        assert!(!ReconcileError::UnknownKind("paypal_invoice".into()).is_retryable());
        assert_eq!(
            ReconcileError::invalid_state(ResourceKind::NotificationWebhook, "read", "absent")
                .to_string(),
            "cannot read paypal_notification_webhook: resource is absent"
        );
    }
}
