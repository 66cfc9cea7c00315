use crate::application::dto::{product_release_of, BatchSubmission, ImportBatch, ImportItem};
use crate::compliance::domain::{NewTask, TaskHandle, TaskParams};
use crate::compliance::policies::FailurePolicy;
use crate::ports::outbound::{ProgressReporter, ReleaseRepository, TaskDispatcher, TaskRepository};
use crate::shared::error::OpenlcsError;
use crate::shared::Result;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Task flow every import item is dispatched under unless configured otherwise
pub const DEFAULT_TASK_FLOW: &str = "flow.tasks.flow_default";

/// Default bound on concurrent dispatches under [`FailurePolicy::Continue`]
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Payload key carrying the submitting user on dispatched work
const OWNER_ID_PARAM: &str = "owner_id";

/// Knobs of a batch submission
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSettings {
    pub task_flow: String,
    pub failure_policy: FailurePolicy,
    pub max_in_flight: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            task_flow: DEFAULT_TASK_FLOW.to_string(),
            failure_policy: FailurePolicy::default(),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

/// SubmitImportUseCase - dispatches one import task per batch item
///
/// Each item is dispatched to the worker substrate and, once the substrate has
/// accepted it, recorded as a local Task. Dispatch and record form an
/// independent pair per item; there is no rollback across items.
///
/// # Type Parameters
/// * `D` - TaskDispatcher implementation
/// * `T` - TaskRepository implementation
/// * `R` - ReleaseRepository implementation
/// * `P` - ProgressReporter implementation
pub struct SubmitImportUseCase<D, T, R, P> {
    dispatcher: D,
    task_repository: T,
    release_repository: R,
    progress_reporter: P,
    settings: ImportSettings,
}

impl<D, T, R, P> SubmitImportUseCase<D, T, R, P>
where
    D: TaskDispatcher,
    T: TaskRepository,
    R: ReleaseRepository,
    P: ProgressReporter,
{
    pub fn new(
        dispatcher: D,
        task_repository: T,
        release_repository: R,
        progress_reporter: P,
        settings: ImportSettings,
    ) -> Self {
        Self {
            dispatcher,
            task_repository,
            release_repository,
            progress_reporter,
            settings,
        }
    }

    /// Submits every item of `batch` on behalf of `owner_id`
    ///
    /// # Errors
    /// `OpenlcsError::UnknownRelease` if the shared `product_release` names a
    /// release that does not exist; nothing is dispatched in that case.
    /// Item-level failures never fail the call; they are reported in
    /// [`BatchSubmission::failed`].
    pub async fn execute(
        &self,
        batch: ImportBatch,
        owner_id: Option<u64>,
    ) -> Result<BatchSubmission> {
        if let Some(name) = product_release_of(&batch.shared) {
            self.ensure_release_exists(name)?;
        }

        let items = Self::collapse_duplicates(batch.items);
        let total = items.len();
        self.progress_reporter.report(&format!(
            "🚀 Submitting {} import task(s) to '{}'",
            total, self.settings.task_flow
        ));

        let outcomes = match self.settings.failure_policy {
            FailurePolicy::Continue => {
                self.submit_concurrently(items, &batch.shared, owner_id)
                    .await
            }
            FailurePolicy::Stop => self.submit_until_failure(items, &batch.shared, owner_id).await,
        };

        let mut submission = BatchSubmission::default();
        for (key, outcome) in outcomes {
            match outcome {
                Ok(handle) => {
                    submission.submitted.insert(key, handle);
                }
                Err(err) => {
                    let reason = format!("{:#}", err);
                    tracing::warn!(%key, error = %reason, "import item failed");
                    self.progress_reporter
                        .report_error(&format!("❌ {}: {}", key, reason));
                    submission.failed.insert(key, reason);
                }
            }
        }

        self.progress_reporter.report_completion(&format!(
            "✅ Submitted {} of {} import task(s)",
            submission.submitted.len(),
            total
        ));
        Ok(submission)
    }

    fn ensure_release_exists(&self, name: &str) -> Result<()> {
        if self.release_repository.find_release(name).is_none() {
            return Err(OpenlcsError::UnknownRelease {
                name: name.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Keeps the first occurrence of every key
    fn collapse_duplicates(items: Vec<ImportItem>) -> Vec<ImportItem> {
        let mut seen = HashSet::new();
        items
            .into_iter()
            .filter(|item| {
                let first = seen.insert(item.key.clone());
                if !first {
                    tracing::warn!(key = %item.key, "duplicate import key ignored");
                }
                first
            })
            .collect()
    }

    /// Up to `max_in_flight` items in flight; outcomes keep input order
    async fn submit_concurrently(
        &self,
        items: Vec<ImportItem>,
        shared: &TaskParams,
        owner_id: Option<u64>,
    ) -> Vec<(String, Result<TaskHandle>)> {
        let total = items.len();
        let done = AtomicUsize::new(0);
        let done = &done;

        stream::iter(items)
            .map(|item| async move {
                let outcome = self.submit_item(&item, shared, owner_id).await;
                let current = done.fetch_add(1, Ordering::Relaxed) + 1;
                self.progress_reporter
                    .report_progress(current, total, Some(&item.key));
                (item.key, outcome)
            })
            .buffered(self.settings.max_in_flight.max(1))
            .collect()
            .await
    }

    async fn submit_until_failure(
        &self,
        items: Vec<ImportItem>,
        shared: &TaskParams,
        owner_id: Option<u64>,
    ) -> Vec<(String, Result<TaskHandle>)> {
        let total = items.len();
        let mut outcomes = Vec::with_capacity(total);

        for (index, item) in items.into_iter().enumerate() {
            let outcome = self.submit_item(&item, shared, owner_id).await;
            self.progress_reporter
                .report_progress(index + 1, total, Some(&item.key));
            let failed = outcome.is_err();
            outcomes.push((item.key, outcome));
            if failed {
                let skipped = total - index - 1;
                if skipped > 0 {
                    tracing::warn!(skipped, "stopping batch after first failure");
                }
                break;
            }
        }
        outcomes
    }

    async fn submit_item(
        &self,
        item: &ImportItem,
        shared: &TaskParams,
        owner_id: Option<u64>,
    ) -> Result<TaskHandle> {
        if let Some(name) = product_release_of(&item.fields) {
            self.ensure_release_exists(name)?;
        }

        let mut params = shared.clone();
        params.extend(item.fields.clone());

        let mut payload = params.clone();
        if let Some(owner) = owner_id {
            payload.insert(OWNER_ID_PARAM.to_string(), Value::from(owner));
        }

        let task_flow = &self.settings.task_flow;
        let correlation_id = self.dispatcher.dispatch(task_flow, &payload).await?;

        let task = self
            .task_repository
            .create_task(NewTask {
                owner_id,
                meta_id: correlation_id.clone(),
                task_flow: task_flow.clone(),
                params,
            })
            .map_err(|err| {
                tracing::error!(
                    key = %item.key,
                    %correlation_id,
                    "task dispatched but not recorded"
                );
                err
            })?;

        tracing::info!(
            key = %item.key,
            task_id = %task.id,
            meta_id = %correlation_id,
            "dispatched import task"
        );
        Ok(TaskHandle {
            task_id: task.id,
            meta_id: correlation_id,
        })
    }
}
