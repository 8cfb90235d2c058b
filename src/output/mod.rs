//! Rendering of analyses, interview sessions and ATS audits

pub mod formatter;

use crate::config::{OutputConfig, OutputFormat};
use crate::error::Result;
use crate::interview::InterviewSession;
use crate::llm::types::AtsReport;
use crate::processing::pipeline::AnalysisRecord;
use formatter::{ConsoleFormatter, HtmlFormatter, JsonFormatter, MarkdownFormatter, OutputFormatter};
use std::path::Path;

/// Anything the formatters know how to render
#[derive(Debug, Clone, Copy)]
pub enum Report<'a> {
    Analysis(&'a AnalysisRecord),
    Interview(&'a InterviewSession),
    Ats(&'a AtsReport),
}

/// Dispatches to the formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(detailed),
            html_formatter: HtmlFormatter::new(true),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::with_options(config.color_output, config.detailed, true)
    }

    pub fn generate(&self, report: Report<'_>, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}
