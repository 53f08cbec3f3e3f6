//! Pretty formatter for human-readable terminal output
//!
//! Groups unused declarations by file, shows the declaring line with a caret
//! under the name, and ends with a one-line summary.

use colored::{ColoredString, Colorize};
use sweep_core::semantic::BindingKind;
use sweep_core::{RewriteAction, UnusedItem};

use super::{FileReport, RunTotals};

pub struct PrettyFormatter {
    action: Option<RewriteAction>,
}

impl PrettyFormatter {
    pub fn new(action: Option<RewriteAction>) -> Self {
        Self { action }
    }

    pub fn format(&self, reports: &[FileReport]) -> String {
        let mut output = String::new();

        for report in reports {
            if let Some(block) = self.format_file(report) {
                output.push_str(&block);
                output.push('\n');
            }
        }

        output.push_str(&self.format_summary(&RunTotals::from_reports(reports)));
        output
    }

    fn format_file(&self, report: &FileReport) -> Option<String> {
        if let Some(error) = &report.error {
            return Some(format!(
                "{} {}: {}\n",
                "error:".red().bold(),
                report.path,
                error
            ));
        }

        let result = report.result.as_ref()?;
        if result.is_empty() && report.rewritten.is_none() {
            return None;
        }

        let mut lines = vec![report.path.underline().to_string()];

        for item in &result.items {
            lines.push(self.format_item(item, report.source.as_deref()));
        }

        if !result.unused_exports.is_empty() {
            lines.push(format!(
                "  {} {}",
                "unused exports:".yellow(),
                result.unused_exports.join(", ")
            ));
        }

        if let Some(action) = self.action.filter(|_| !report.edited.is_empty()) {
            let edited = format!(
                "{} {}",
                past_tense(action),
                plural(report.edited.len(), "declaration")
            );
            lines.push(format!("  {} {}", "=".blue(), edited.green()));
        }

        if let Some(rewritten) = &report.rewritten {
            lines.push(format!("  {}", "--- rewritten (dry run) ---".dimmed()));
            lines.push(rewritten.trim_end().to_string());
        }

        let mut block = lines.join("\n");
        block.push('\n');
        Some(block)
    }

    fn format_item(&self, item: &UnusedItem, source: Option<&str>) -> String {
        let mut lines = vec![format!(
            "  {} {} {}",
            format!("{}:{}", item.line, item.column).dimmed(),
            colorize_kind(item.kind),
            item.name.bold()
        )];

        if let Some(source_line) = source.and_then(|s| s.lines().nth(item.line.saturating_sub(1))) {
            let padding = " ".repeat(item.line.to_string().len() + 3);
            lines.push(format!(
                "  {} {} {}",
                item.line.to_string().blue(),
                "|".blue(),
                source_line
            ));
            let caret_padding = " ".repeat(item.column.saturating_sub(1));
            let carets = "^".repeat(item.name.chars().count().max(1));
            lines.push(format!(
                "{}{} {}{}",
                padding,
                "|".blue(),
                caret_padding,
                carets.red()
            ));
        }

        lines.join("\n")
    }

    fn format_summary(&self, totals: &RunTotals) -> String {
        let mut summary = format!(
            "Found {} in {} ({} scanned)",
            plural(totals.unused, "unused declaration").bold(),
            plural(totals.files_with_unused, "file"),
            plural(totals.files, "file")
        );

        if let Some(action) = self.action {
            summary.push_str(&format!(
                ", {} {}",
                past_tense(action).to_lowercase(),
                plural(totals.edited, "declaration")
            ));
        }

        if totals.failed > 0 {
            summary.push_str(&format!(
                ", {}",
                plural(totals.failed, "failure").red()
            ));
        }

        summary.push('\n');
        summary
    }
}

fn colorize_kind(kind: BindingKind) -> ColoredString {
    match kind {
        BindingKind::Function => "function".cyan(),
        BindingKind::Component => "component".magenta(),
        _ => "variable".yellow(),
    }
}

fn past_tense(action: RewriteAction) -> &'static str {
    match action {
        RewriteAction::Annotate => "Annotated",
        RewriteAction::Remove => "Removed",
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweep_core::ClassificationResult;

    fn create_report(source: &str) -> FileReport {
        FileReport {
            path: "test.js".to_string(),
            source: Some(source.to_string()),
            result: Some(ClassificationResult {
                variables: vec!["unused".to_string()],
                items: vec![UnusedItem {
                    name: "unused".to_string(),
                    kind: BindingKind::Variable,
                    line: 2,
                    column: 7,
                }],
                ..Default::default()
            }),
            edited: Vec::new(),
            rewritten: None,
            error: None,
        }
    }

    #[test]
    fn pretty_format_shows_source_line_and_caret() {
        colored::control::set_override(false);
        let report = create_report("// header\nconst unused = 1;\n");

        let output = PrettyFormatter::new(None).format(&[report]);

        assert!(output.contains("test.js"));
        assert!(output.contains("2:7 variable unused"));
        assert!(output.contains("2 | const unused = 1;"));
        assert!(output.contains("|       ^^^^^^"));
    }

    #[test]
    fn pretty_format_skips_clean_files() {
        let report = FileReport {
            result: Some(ClassificationResult::default()),
            ..create_report("const a = 1;")
        };

        let output = PrettyFormatter::new(None).format(&[report]);

        assert!(!output.contains("test.js"));
    }

    #[test]
    fn pretty_format_reports_errors() {
        colored::control::set_override(false);
        let report = FileReport::failed("broken.js", "unexpected token");

        let output = PrettyFormatter::new(None).format(&[report]);

        assert!(output.contains("error: broken.js: unexpected token"));
        assert!(output.contains("1 failure"));
    }

    #[test]
    fn summary_uses_singular_and_plural() {
        colored::control::set_override(false);
        let report = create_report("\nconst unused = 1;\n");

        let output = PrettyFormatter::new(None).format(&[report]);

        assert!(output.contains("Found 1 unused declaration in 1 file (1 file scanned)"));
    }

    #[test]
    fn summary_mentions_rewrite_action() {
        colored::control::set_override(false);
        let mut report = create_report("\nconst unused = 1;\n");
        report.edited = report.result.as_ref().unwrap().items.clone();

        let output = PrettyFormatter::new(Some(RewriteAction::Remove)).format(&[report]);

        assert!(output.contains("Removed 1 declaration"));
        assert!(output.contains(", removed 1 declaration"));
    }
}
