use crate::application::read_models::{ComponentView, ReleasePackageView, ReleaseReport};
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;

/// Markdown table header for component information
const COMPONENT_TABLE_HEADER: &str = "| Component | Type | Version | Release | Arch | License |\n";

const COMPONENT_TABLE_SEPARATOR: &str =
    "|-----------|------|---------|---------|------|---------|\n";

const PACKAGE_TABLE_HEADER: &str = "| Package | Source | License | Licenses Detected | Copyrights |\n";

const PACKAGE_TABLE_SEPARATOR: &str =
    "|---------|--------|---------|-------------------|------------|\n";

/// MarkdownReportFormatter adapter for a human-readable release report
pub struct MarkdownReportFormatter;

impl MarkdownReportFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Escapes pipe characters and newlines for safe Markdown table rendering
    fn escape_markdown_table_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn cell(value: Option<&str>) -> String {
        value
            .map(Self::escape_markdown_table_cell)
            .unwrap_or_else(|| "N/A".to_string())
    }
}

impl Default for MarkdownReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper methods for rendering sections
impl MarkdownReportFormatter {
    fn render_header(&self, output: &mut String, report: &ReleaseReport) {
        output.push_str(&format!("# Release Report: {}\n\n", report.release.name));
        output.push_str(&format!("- **Product:** {}\n", report.product.name));
        output.push_str(&format!("- **Version:** {}\n", report.release.version));
        if let Some(notes) = &report.release.notes {
            output.push_str(&format!("- **Notes:** {}\n", notes.replace('\n', " ")));
        }
        output.push('\n');
    }

    fn render_component_table(&self, output: &mut String, components: &[ComponentView]) {
        output.push_str(COMPONENT_TABLE_HEADER);
        output.push_str(COMPONENT_TABLE_SEPARATOR);
        for component in components {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                Self::escape_markdown_table_cell(&component.name),
                component.component_type,
                Self::cell(component.version.as_deref()),
                Self::cell(component.release.as_deref()),
                Self::cell(component.arch.as_deref()),
                Self::cell(component.summary_license.as_deref()),
            ));
        }
        output.push('\n');
    }

    fn render_containers(&self, output: &mut String, report: &ReleaseReport) {
        output.push_str("## Containers\n\n");
        if report.containers.is_empty() {
            output.push_str("*No containers in this release*\n\n");
            return;
        }
        for container in &report.containers {
            let version = container.component.version.as_deref().unwrap_or("");
            output.push_str(&format!(
                "### {} {}\n\n",
                Self::escape_markdown_table_cell(&container.component.name),
                version
            ));
            if container.provides.is_empty() {
                output.push_str("*Provides no components*\n\n");
            } else {
                self.render_component_table(output, &container.provides);
            }
        }
    }

    fn render_components(&self, output: &mut String, components: &[ComponentView]) {
        output.push_str("## Components\n\n");
        if components.is_empty() {
            output.push_str("*No components in this release*\n\n");
        } else {
            self.render_component_table(output, components);
        }
    }

    fn render_packages(&self, output: &mut String, packages: &[ReleasePackageView]) {
        output.push_str("## Packages\n\n");
        if packages.is_empty() {
            output.push_str("*No packages in this release*\n\n");
            return;
        }
        output.push_str(PACKAGE_TABLE_HEADER);
        output.push_str(PACKAGE_TABLE_SEPARATOR);
        for package in packages {
            let (license, licenses, copyrights) = match &package.scan_result {
                Some(scan) => (
                    Self::cell(scan.sum_license.as_deref()),
                    Self::escape_markdown_table_cell(&scan.licenses.join(", ")),
                    Self::escape_markdown_table_cell(&scan.copyrights.join("; ")),
                ),
                None => ("*not imported*".to_string(), String::new(), String::new()),
            };
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                Self::escape_markdown_table_cell(&package.package_nvr),
                if package.is_source { "yes" } else { "no" },
                license,
                licenses,
                copyrights
            ));
        }
        output.push('\n');
    }
}

impl ReportFormatter for MarkdownReportFormatter {
    fn format(&self, report: &ReleaseReport) -> Result<String> {
        let mut output = String::new();
        self.render_header(&mut output, report);
        self.render_containers(&mut output, report);
        self.render_components(&mut output, &report.components);
        self.render_packages(&mut output, &report.packages);
        Ok(output)
    }
}
