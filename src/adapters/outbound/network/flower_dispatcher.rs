use crate::compliance::domain::{CorrelationId, TaskParams};
use crate::ports::outbound::TaskDispatcher;
use crate::shared::error::OpenlcsError;
use crate::shared::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ApplyRequest<'a> {
    args: [&'a TaskParams; 1],
}

#[derive(Debug, Deserialize)]
struct ApplyResponse {
    #[serde(rename = "task-id")]
    task_id: String,
}

/// FlowerTaskDispatcher adapter for Celery workers fronted by Flower
///
/// Each dispatch is one `POST {base_url}/api/task/async-apply/{task_flow}`
/// carrying the payload as the task's single positional argument. Failures
/// are not retried.
pub struct FlowerTaskDispatcher {
    client: reqwest::Client,
    base_url: String,
}

impl FlowerTaskDispatcher {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(OpenlcsError::validation("dispatcher url must not be empty").into());
        }
        let user_agent = format!("openlcs/{}", env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn apply_url(&self, task_flow: &str) -> String {
        format!(
            "{}/api/task/async-apply/{}",
            self.base_url,
            urlencoding::encode(task_flow)
        )
    }
}

fn dispatch_error(task_flow: &str, details: impl ToString) -> OpenlcsError {
    OpenlcsError::Dispatch {
        task_flow: task_flow.to_string(),
        details: details.to_string(),
    }
}

#[async_trait]
impl TaskDispatcher for FlowerTaskDispatcher {
    async fn dispatch(&self, task_flow: &str, payload: &TaskParams) -> Result<CorrelationId> {
        let url = self.apply_url(task_flow);
        let response = self
            .client
            .post(&url)
            .json(&ApplyRequest { args: [payload] })
            .send()
            .await
            .map_err(|e| dispatch_error(task_flow, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(dispatch_error(
                task_flow,
                format!("{} returned {}: {}", url, status, body.trim()),
            )
            .into());
        }

        let applied: ApplyResponse = response
            .json()
            .await
            .map_err(|e| dispatch_error(task_flow, format!("unexpected response: {}", e)))?;
        tracing::debug!(task_flow, task_id = %applied.task_id, "flower accepted task");
        Ok(CorrelationId::new(applied.task_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_apply_url() {
        let dispatcher = FlowerTaskDispatcher::new("http://flower:5555/").unwrap();
        assert_eq!(
            dispatcher.apply_url("flow.tasks.flow_default"),
            "http://flower:5555/api/task/async-apply/flow.tasks.flow_default"
        );
    }

    #[test]
    fn test_apply_url_encodes_flow_name() {
        let dispatcher = FlowerTaskDispatcher::new("http://flower:5555").unwrap();
        assert_eq!(
            dispatcher.apply_url("flow/with space"),
            "http://flower:5555/api/task/async-apply/flow%2Fwith%20space"
        );
    }

    #[test]
    fn test_empty_url_rejected() {
        assert!(FlowerTaskDispatcher::new("  ").is_err());
    }

    #[test]
    fn test_request_body_wraps_payload_in_args() {
        let mut payload = TaskParams::new();
        payload.insert("package_nvr".to_string(), Value::from("bash-5.1-2.el8"));
        let body = serde_json::to_value(ApplyRequest { args: [&payload] }).unwrap();
        assert_eq!(body, json!({"args": [{"package_nvr": "bash-5.1-2.el8"}]}));
    }

    #[test]
    fn test_response_reads_task_id() {
        let response: ApplyResponse =
            serde_json::from_str(r#"{"task-id": "4f1c", "state": "PENDING"}"#).unwrap();
        assert_eq!(response.task_id, "4f1c");
    }

    #[tokio::test]
    async fn test_unreachable_flower_is_dispatch_error() {
        let dispatcher = FlowerTaskDispatcher::with_timeout(
            "http://127.0.0.1:9",
            Duration::from_millis(500),
        )
        .unwrap();
        let err = dispatcher
            .dispatch("flow.tasks.flow_default", &TaskParams::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OpenlcsError>(),
            Some(OpenlcsError::Dispatch { task_flow, .. }) if task_flow == "flow.tasks.flow_default"
        ));
    }
}
