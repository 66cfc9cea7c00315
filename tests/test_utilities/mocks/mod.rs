/// Mock implementations for testing
mod mock_component_data_reader;
mod mock_progress_reporter;
mod mock_task_dispatcher;

#[allow(unused_imports)]
pub use mock_component_data_reader::MockComponentDataReader;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_task_dispatcher::MockTaskDispatcher;
