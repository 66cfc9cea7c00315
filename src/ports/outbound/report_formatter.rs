use crate::application::read_models::ReleaseReport;
use crate::shared::Result;

/// ReportFormatter port for rendering a release report
///
/// Implementations exist for JSON and Markdown.
pub trait ReportFormatter {
    /// # Errors
    /// Returns an error if formatting or serialization fails
    fn format(&self, report: &ReleaseReport) -> Result<String>;
}
