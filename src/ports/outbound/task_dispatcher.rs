use crate::compliance::domain::{CorrelationId, TaskParams};
use crate::shared::Result;
use async_trait::async_trait;

/// TaskDispatcher port for handing work to the external worker substrate
///
/// The core treats `task_flow` as an opaque routable name; only the worker
/// substrate knows what it denotes.
///
/// # Async Support
/// Dispatch is async so a batch can keep several dispatches in flight.
/// Implementations must be `Send + Sync` to support concurrent access.
#[async_trait]
pub trait TaskDispatcher: Send + Sync {
    /// Dispatches one unit of work
    ///
    /// # Arguments
    /// * `task_flow` - Name of the flow the worker substrate should run
    /// * `payload` - Parameters the flow is invoked with
    ///
    /// # Returns
    /// The correlation id the substrate assigned to the dispatched work
    ///
    /// # Errors
    /// Returns `OpenlcsError::Dispatch` if the substrate cannot be reached or
    /// rejects the request. Implementations do not retry.
    async fn dispatch(&self, task_flow: &str, payload: &TaskParams) -> Result<CorrelationId>;
}
