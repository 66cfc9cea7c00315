use super::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque id the worker substrate assigns to a dispatched unit of work
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameter payload of a dispatched task
pub type TaskParams = Map<String, Value>;

/// Local record of one dispatched unit of import work.
///
/// Its terminal state is written by the worker substrate; this record only
/// captures the dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub owner_id: Option<u64>,
    pub meta_id: CorrelationId,
    pub task_flow: String,
    pub params: TaskParams,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub owner_id: Option<u64>,
    pub meta_id: CorrelationId,
    pub task_flow: String,
    pub params: TaskParams,
}

impl NewTask {
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            owner_id: self.owner_id,
            meta_id: self.meta_id,
            task_flow: self.task_flow,
            params: self.params,
            created_at: Utc::now(),
        }
    }
}

/// What a caller gets back per submitted key.
///
/// `task_id` is the local Task record; the worker's correlation id stays on
/// that record as `meta_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskHandle {
    pub task_id: TaskId,
    #[serde(skip)]
    pub meta_id: CorrelationId,
}
