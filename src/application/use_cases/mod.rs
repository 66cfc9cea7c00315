/// Use cases module containing application business logic orchestration
mod build_release_report;
mod load_components;
mod submit_import;

pub use build_release_report::BuildReleaseReportUseCase;
pub use load_components::{LoadComponentsUseCase, LoadSummary};
pub use submit_import::{
    ImportSettings, SubmitImportUseCase, DEFAULT_MAX_IN_FLIGHT, DEFAULT_TASK_FLOW,
};
