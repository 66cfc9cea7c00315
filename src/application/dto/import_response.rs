use crate::compliance::domain::TaskHandle;
use serde::Serialize;
use std::collections::BTreeMap;

/// BatchSubmission - Outcome of a bulk import
///
/// `submitted` maps each dispatched key to its handle; `failed` maps each key
/// that could not be dispatched to the reason. Keys never dispatched because
/// the batch stopped early appear in neither map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSubmission {
    pub submitted: BTreeMap<String, TaskHandle>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub failed: BTreeMap<String, String>,
}

impl BatchSubmission {
    /// True when no item failed
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
