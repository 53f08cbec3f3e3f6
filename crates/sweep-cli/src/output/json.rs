//! JSON output formatter for programmatic integration

use serde::Serialize;
use sweep_core::{ClassificationResult, RewriteAction, UnusedItem};

use super::{FileReport, RunTotals};

#[derive(Serialize)]
pub struct JsonOutput<'a> {
    pub version: &'static str,
    pub metadata: JsonMetadata,
    pub summary: JsonSummary,
    pub files: Vec<JsonFile<'a>>,
}

#[derive(Serialize)]
pub struct JsonMetadata {
    pub sweep_version: &'static str,
    pub directory: String,
    pub action: &'static str,
    pub dry_run: bool,
}

#[derive(Serialize)]
pub struct JsonSummary {
    pub total_files: usize,
    pub files_with_unused: usize,
    pub total_unused: usize,
    pub edited: usize,
    pub failed: usize,
}

#[derive(Serialize)]
pub struct JsonFile<'a> {
    pub path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unused: Option<&'a ClassificationResult>,
    #[serde(skip_serializing_if = "nothing_edited")]
    pub edited: &'a [UnusedItem],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewritten: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

pub struct JsonFormatter<'a> {
    directory: &'a str,
    action: Option<RewriteAction>,
    dry_run: bool,
}

impl<'a> JsonFormatter<'a> {
    pub fn new(directory: &'a str, action: Option<RewriteAction>, dry_run: bool) -> Self {
        Self {
            directory,
            action,
            dry_run,
        }
    }

    pub fn format(&self, reports: &[FileReport]) -> String {
        let output = self.build_output(reports);
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    fn build_output<'r>(&self, reports: &'r [FileReport]) -> JsonOutput<'r> {
        JsonOutput {
            version: "1.0",
            metadata: self.build_metadata(),
            summary: build_summary(&RunTotals::from_reports(reports)),
            files: reports.iter().map(convert_report).collect(),
        }
    }

    fn build_metadata(&self) -> JsonMetadata {
        JsonMetadata {
            sweep_version: env!("CARGO_PKG_VERSION"),
            directory: self.directory.to_string(),
            action: match self.action {
                None => "list",
                Some(RewriteAction::Annotate) => "comment",
                Some(RewriteAction::Remove) => "delete",
            },
            dry_run: self.dry_run,
        }
    }
}

fn build_summary(totals: &RunTotals) -> JsonSummary {
    JsonSummary {
        total_files: totals.files,
        files_with_unused: totals.files_with_unused,
        total_unused: totals.unused,
        edited: totals.edited,
        failed: totals.failed,
    }
}

fn nothing_edited(items: &&[UnusedItem]) -> bool {
    items.is_empty()
}

fn convert_report(report: &FileReport) -> JsonFile<'_> {
    JsonFile {
        path: &report.path,
        unused: report.result.as_ref(),
        edited: &report.edited,
        rewritten: report.rewritten.as_deref(),
        error: report.error.as_deref(),
    }
}
