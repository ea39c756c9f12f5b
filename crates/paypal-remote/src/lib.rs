//! # paypal-remote
//!
//! The remote API boundary of the PayPal provider.
//!
//! This crate defines the [`RemoteApiClient`] capability and the object shapes
//! it exchanges. It contains no transport: the sandbox crate and any real HTTP
//! client implement the trait elsewhere.
//!
//! ## Example
//!
//! ```ignore
//! use paypal_remote::{DynRemoteClient, RemoteError};
//!
//! async fn deactivate(client: DynRemoteClient, id: &str) -> Result<(), RemoteError> {
//!     client.deactivate_subscription_plan(id).await
//! }
//! ```

mod error;
pub mod instrumented;
mod operation;
mod traits;
mod types;

pub use error::{ErrorCategory, RemoteError};
pub use instrumented::{CallStats, InstrumentedClient, OperationStats};
pub use operation::RemoteOperation;
pub use traits::RemoteApiClient;
pub use types::{
    BillingCycle, Frequency, Money, PaymentPreferences, PricingScheme, PricingSchemeUpdate,
    Product, SubscriptionPlan, SubscriptionPlanPatch, Taxes, Webhook, WebhookEventType,
};

/// Re-exported so implementors and callers agree on the patch type.
pub use json_patch::Patch;

/// Type alias for a remote call result.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Type alias for a shared remote client trait object.
pub type DynRemoteClient = std::sync::Arc<dyn RemoteApiClient>;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{ErrorCategory, RemoteError};
    pub use crate::operation::RemoteOperation;
    pub use crate::traits::RemoteApiClient;
    pub use crate::types::*;
    pub use crate::{DynRemoteClient, RemoteResult};
}
