//! In-memory PayPal sandbox.
//!
//! This crate provides an in-memory implementation of the `RemoteApiClient`
//! trait from `paypal-remote`. It enforces the platform's resource rules,
//! records every call and can persist its contents to a JSON snapshot.
//!
//! # Example
//!
//! ```ignore
//! use paypal_sandbox::InMemoryPayPal;
//! use paypal_remote::{RemoteApiClient, RemoteOperation};
//!
//! let sandbox = InMemoryPayPal::new();
//! let hook = sandbox.create_webhook(&webhook).await?;
//! assert_eq!(sandbox.call_count(RemoteOperation::CreateWebhook).await, 1);
//! ```

mod calls;
mod patch;
pub mod sandbox;
pub mod snapshot;

pub use paypal_remote::{RemoteApiClient, RemoteError, RemoteOperation};

pub use calls::RecordedCall;
pub use sandbox::InMemoryPayPal;
pub use snapshot::{SandboxSnapshot, SnapshotError};

/// Creates a new shareable sandbox client.
pub fn create_sandbox() -> std::sync::Arc<InMemoryPayPal> {
    std::sync::Arc::new(InMemoryPayPal::new())
}
