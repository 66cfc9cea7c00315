/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (worker substrate, persistence,
/// file system, console).
pub mod component_data_reader;
pub mod component_repository;
pub mod entity_resolver;
pub mod output_presenter;
pub mod package_repository;
pub mod progress_reporter;
pub mod release_repository;
pub mod report_formatter;
pub mod source_repository;
pub mod task_dispatcher;
pub mod task_repository;

pub use component_data_reader::ComponentDataReader;
pub use component_repository::ComponentRepository;
pub use entity_resolver::EntityResolver;
pub use output_presenter::OutputPresenter;
pub use package_repository::PackageRepository;
pub use progress_reporter::ProgressReporter;
pub use release_repository::ReleaseRepository;
pub use report_formatter::ReportFormatter;
pub use source_repository::SourceRepository;
pub use task_dispatcher::TaskDispatcher;
pub use task_repository::TaskRepository;
