use crate::application::read_models::ReleaseReport;
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use anyhow::Context;

/// JsonReportFormatter adapter - pretty-printed JSON release report
pub struct JsonReportFormatter;

impl JsonReportFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonReportFormatter {
    fn format(&self, report: &ReleaseReport) -> Result<String> {
        let mut json = serde_json::to_string_pretty(report)
            .with_context(|| format!("Failed to serialize report for {}", report.release))?;
        json.push('\n');
        Ok(json)
    }
}
