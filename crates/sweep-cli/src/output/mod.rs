pub mod json;
pub mod pretty;

use sweep_core::{ClassificationResult, UnusedItem};

/// What happened to one file during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: String,
    pub source: Option<String>,
    pub result: Option<ClassificationResult>,
    pub edited: Vec<UnusedItem>,
    /// Rewritten text, kept only for dry runs that changed something.
    pub rewritten: Option<String>,
    pub error: Option<String>,
}

impl FileReport {
    pub fn failed(path: impl Into<String>, error: impl ToString) -> Self {
        Self {
            path: path.into(),
            source: None,
            result: None,
            edited: Vec::new(),
            rewritten: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    pub fn unused_count(&self) -> usize {
        self.result
            .as_ref()
            .map(ClassificationResult::unused_count)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub files: usize,
    pub files_with_unused: usize,
    pub unused: usize,
    pub edited: usize,
    pub failed: usize,
}

impl RunTotals {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        reports.iter().fold(
            Self {
                files: reports.len(),
                ..Default::default()
            },
            |mut totals, report| {
                let unused = report.unused_count();
                if unused > 0 {
                    totals.files_with_unused += 1;
                }
                totals.unused += unused;
                totals.edited += report.edited.len();
                if report.is_failure() {
                    totals.failed += 1;
                }
                totals
            },
        )
    }
}
