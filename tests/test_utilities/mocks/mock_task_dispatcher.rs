use async_trait::async_trait;
use openlcs::compliance::domain::{CorrelationId, TaskParams};
use openlcs::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Mock TaskDispatcher that hands out sequential correlation ids
///
/// Clones share state, so a test can keep one handle for inspection after
/// moving another into a use case.
#[derive(Default, Clone)]
pub struct MockTaskDispatcher {
    calls: Arc<AtomicUsize>,
    payloads: Arc<Mutex<Vec<(String, TaskParams)>>>,
    failing_nvrs: Arc<HashSet<String>>,
}

impl MockTaskDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatches whose `package_nvr` is one of `nvrs` fail
    pub fn failing_for(nvrs: &[&str]) -> Self {
        Self {
            failing_nvrs: Arc::new(nvrs.iter().map(|nvr| nvr.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(task_flow, payload)` of every dispatch that was accepted
    pub fn dispatched(&self) -> Vec<(String, TaskParams)> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskDispatcher for MockTaskDispatcher {
    async fn dispatch(&self, task_flow: &str, payload: &TaskParams) -> Result<CorrelationId> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let nvr = payload
            .get("package_nvr")
            .and_then(|value| value.as_str())
            .unwrap_or_default();
        if self.failing_nvrs.contains(nvr) {
            return Err(OpenlcsError::Dispatch {
                task_flow: task_flow.to_string(),
                details: format!("broker refused {}", nvr),
            }
            .into());
        }
        self.payloads
            .lock()
            .unwrap()
            .push((task_flow.to_string(), payload.clone()));
        Ok(CorrelationId::new(format!("celery-{}", call)))
    }
}
