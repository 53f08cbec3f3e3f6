//! Sweep command - lists, comments out, or deletes unused declarations

use crate::output::json::JsonFormatter;
use crate::output::pretty::PrettyFormatter;
use crate::output::{FileReport, RunTotals};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use sweep_core::config::{Config, discover_config, load_config_with_warnings};
use sweep_core::{Engine, RewriteAction};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

const SUPPORTED_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs", "mts", "cts"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// Report unused declarations without touching files
    List,
    /// Wrap unused declarations in a marker comment
    Comment,
    /// Delete unused declarations
    Delete,
}

impl Action {
    pub fn rewrite_action(self) -> Option<RewriteAction> {
        match self {
            Action::List => None,
            Action::Comment => Some(RewriteAction::Annotate),
            Action::Delete => Some(RewriteAction::Remove),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    /// The plain per-file report
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct SweepArgs {
    /// Directory (or single file) to scan
    #[arg(short, long, value_name = "DIR", default_value = "./")]
    pub directory: PathBuf,

    /// What to do with unused declarations
    #[arg(short, long, value_enum, default_value = "list")]
    pub action: Action,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Print rewritten files instead of writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Use this config file instead of searching for sweep.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl SweepArgs {
    pub fn run(&self) -> Result<()> {
        self.configure_colors();

        let config = self.load_config()?;
        let Discovery { files, failures } = discover_files(&self.directory, &config.exclude)?;

        if files.is_empty() && failures.is_empty() {
            println!("No JavaScript/TypeScript files found.");
            return Ok(());
        }

        let engine = Engine::new(config);
        let action = self.action.rewrite_action();

        let mut reports: Vec<FileReport> = files
            .par_iter()
            .map(|file| self.process_file(&engine, file, action))
            .collect();
        reports.extend(failures);

        match self.format {
            OutputFormat::Json => {
                let directory = self.directory.to_string_lossy();
                let formatter = JsonFormatter::new(&directory, action, self.dry_run);
                println!("{}", formatter.format(&reports));
            }
            OutputFormat::Text => self.output_text(&engine, &reports)?,
            OutputFormat::Pretty => {
                print!("{}", PrettyFormatter::new(action).format(&reports));
            }
        }

        if reports.iter().any(FileReport::is_failure) {
            process::exit(1);
        }

        Ok(())
    }

    fn configure_colors(&self) {
        let no_color_env = std::env::var("NO_COLOR").is_ok();
        if self.no_color || no_color_env {
            colored::control::set_override(false);
        }
    }

    fn load_config(&self) -> Result<Config> {
        let config_result = match &self.config {
            Some(path) => load_config_with_warnings(path)?,
            None => discover_config(config_start(&self.directory))?,
        };
        for warning in &config_result.warnings {
            eprintln!("{} {}", "warning:".yellow().bold(), warning);
        }
        Ok(config_result.config)
    }

    fn process_file(
        &self,
        engine: &Engine,
        path: &Path,
        action: Option<RewriteAction>,
    ) -> FileReport {
        let display_path = path.to_string_lossy().to_string();
        match self.try_process_file(engine, path, &display_path, action) {
            Ok(report) => report,
            Err(err) => {
                tracing::warn!(file = %display_path, error = %err, "file skipped");
                FileReport::failed(display_path, format!("{err:#}"))
            }
        }
    }

    fn try_process_file(
        &self,
        engine: &Engine,
        path: &Path,
        display_path: &str,
        action: Option<RewriteAction>,
    ) -> Result<FileReport> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let outcome = engine.process_source(display_path, &source, action)?;

        let changed = outcome.changed();
        let mut rewritten = None;
        if let Some(text) = outcome.rewritten.filter(|_| changed) {
            if self.dry_run {
                rewritten = Some(text);
            } else {
                persist(path, &text)?;
                tracing::info!(file = display_path, "rewritten");
            }
        }

        Ok(FileReport {
            path: display_path.to_string(),
            source: Some(source),
            result: Some(outcome.result),
            edited: outcome.summary.map(|s| s.edited).unwrap_or_default(),
            rewritten,
            error: None,
        })
    }

    fn output_text(&self, engine: &Engine, reports: &[FileReport]) -> Result<()> {
        let mut stdout = std::io::stdout().lock();

        for report in reports {
            writeln!(stdout, "{}", report.path.bold())?;
            match (&report.result, &report.error) {
                (_, Some(error)) => writeln!(stdout, "{} {}", "error:".red().bold(), error)?,
                (Some(result), None) => engine.report(result, &mut stdout)?,
                (None, None) => {}
            }
            if let Some(rewritten) = &report.rewritten {
                writeln!(stdout, "{}", rewritten.trim_end())?;
            }
            writeln!(stdout)?;
        }

        let totals = RunTotals::from_reports(reports);
        writeln!(
            stdout,
            "{} file(s), {} unused declaration(s), {} edited, {} failed",
            totals.files, totals.unused, totals.edited, totals.failed
        )?;

        Ok(())
    }
}

/// Writes through a sibling temporary file so a failed write never leaves a
/// truncated source behind.
fn persist(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut file = NamedTempFile::new_in(parent)
        .with_context(|| format!("failed to create temporary file in {}", parent.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(file.path(), metadata.permissions())
            .with_context(|| format!("failed to copy permissions of {}", path.display()))?;
    }

    file.persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;

    Ok(())
}

fn config_start(path: &Path) -> &Path {
    if path.is_file() {
        path.parent().unwrap_or(Path::new("."))
    } else {
        path
    }
}

/// Files to process, plus a failed report for every entry the walk could
/// not read.
#[derive(Default)]
struct Discovery {
    files: Vec<PathBuf>,
    failures: Vec<FileReport>,
}

fn discover_files(path: &Path, exclude: &[String]) -> Result<Discovery> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut discovery = Discovery::default();

    if path.is_file() {
        if is_supported_file(path) {
            discovery.files.push(path.to_path_buf());
        }
        return Ok(discovery);
    }

    for entry in WalkDir::new(path)
        .into_iter()
        .filter_entry(|e| !is_skipped(e, exclude))
    {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && is_supported_file(entry.path()) {
                    discovery.files.push(entry.into_path());
                }
            }
            Err(err) => {
                let failed = err.path().unwrap_or(path).to_string_lossy().to_string();
                tracing::warn!(path = %failed, error = %err, "directory entry skipped");
                discovery
                    .failures
                    .push(FileReport::failed(failed, format!("failed to walk directory: {err}")));
            }
        }
    }

    discovery.files.sort();
    Ok(discovery)
}

fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

fn is_skipped(entry: &walkdir::DirEntry, exclude: &[String]) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .map(|name| {
            name.starts_with('.')
                || name == "node_modules"
                || (entry.file_type().is_dir() && exclude.iter().any(|e| e == name))
        })
        .unwrap_or(false)
}
