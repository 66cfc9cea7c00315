use crate::compliance::domain::{NewTask, Task, TaskId};
use crate::shared::Result;

/// TaskRepository port for the local record of dispatched work
pub trait TaskRepository: Send + Sync {
    /// Stores a Task record for a successful dispatch
    fn create_task(&self, task: NewTask) -> Result<Task>;

    fn get_task(&self, id: TaskId) -> Option<Task>;

    /// All Task records in creation order
    fn tasks(&self) -> Vec<Task>;
}
