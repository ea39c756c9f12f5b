//! Call recording for assertions in tests and for the CLI's summary output.

use paypal_remote::RemoteOperation;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

/// One call received by the sandbox, in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedCall {
    pub operation: RemoteOperation,
    /// Target resource ID, absent for create calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The request body as JSON, absent for calls that carry none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<Value>,
}

#[derive(Debug, Default)]
pub(crate) struct CallLog {
    calls: RwLock<Vec<RecordedCall>>,
}

impl CallLog {
    pub(crate) async fn push(&self, call: RecordedCall) {
        self.calls.write().await.push(call);
    }

    pub(crate) async fn all(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    pub(crate) async fn count(&self, operation: RemoteOperation) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|call| call.operation == operation)
            .count()
    }

    pub(crate) async fn last(&self, operation: RemoteOperation) -> Option<RecordedCall> {
        self.calls
            .read()
            .await
            .iter()
            .rev()
            .find(|call| call.operation == operation)
            .cloned()
    }

    pub(crate) async fn clear(&self) {
        self.calls.write().await.clear();
    }
}
