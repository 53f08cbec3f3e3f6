//! Per-file entry points tying the passes together

use std::io::{self, Write};

use crate::classify::{ClassificationResult, classify};
use crate::collector::collect;
use crate::config::Config;
use crate::observer::{Observer, TracingObserver};
use crate::parser::{ParseError, SyntaxTree, parse};
use crate::printer::{PrintError, print};
use crate::report::report;
use crate::resolver::resolve;
use crate::rewrite::{RewriteAction, RewriteSummary, Rewriter, StructuralEditError};

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Structural(#[from] StructuralEditError),
    #[error(transparent)]
    Print(#[from] PrintError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    /// Classification of the file as read.
    pub result: ClassificationResult,
    pub summary: Option<RewriteSummary>,
    /// Printed text after a rewrite; `None` when listing.
    pub rewritten: Option<String>,
}

impl FileOutcome {
    pub fn changed(&self) -> bool {
        self.summary.as_ref().is_some_and(|s| !s.is_empty())
    }
}

/// Holds the configuration; owns no per-file state, so one engine can serve
/// any number of files and threads.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: Config,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn collect_and_classify(&self, tree: &SyntaxTree) -> ClassificationResult {
        let mut observer = TracingObserver::new(tree.filename());
        self.collect_and_classify_with(tree, &mut observer)
    }

    pub fn collect_and_classify_with(
        &self,
        tree: &SyntaxTree,
        observer: &mut dyn Observer,
    ) -> ClassificationResult {
        let declared = collect(tree, observer);
        let usage = resolve(tree, &declared, observer);
        let result = classify(tree, &declared, &usage, &self.config.analysis);

        tracing::debug!(
            file = tree.filename(),
            declarations = declared.declarations.len(),
            scopes = declared.scopes.len(),
            used = usage.len(),
            unused = result.unused_count(),
            "classified"
        );

        result
    }

    pub fn report(&self, result: &ClassificationResult, writer: &mut dyn Write) -> io::Result<()> {
        report(result, writer)
    }

    pub fn rewrite(
        &self,
        tree: &mut SyntaxTree,
        action: RewriteAction,
    ) -> Result<RewriteSummary, StructuralEditError> {
        let mut observer = TracingObserver::new(tree.filename());
        self.rewrite_with(tree, action, &mut observer)
    }

    pub fn rewrite_with(
        &self,
        tree: &mut SyntaxTree,
        action: RewriteAction,
        observer: &mut dyn Observer,
    ) -> Result<RewriteSummary, StructuralEditError> {
        Rewriter::new(&self.config).rewrite(tree, action, observer)
    }

    /// Parse, classify, and for a rewrite action, rewrite and print.
    pub fn process_source(
        &self,
        filename: &str,
        source: &str,
        action: Option<RewriteAction>,
    ) -> Result<FileOutcome, FileError> {
        let _span = tracing::debug_span!("file", path = filename).entered();

        let mut tree = parse(filename, source)?;
        let result = self.collect_and_classify(&tree);

        let Some(action) = action else {
            return Ok(FileOutcome {
                result,
                summary: None,
                rewritten: None,
            });
        };

        let summary = self.rewrite(&mut tree, action)?;
        let rewritten = print(&tree, source)?;

        Ok(FileOutcome {
            result,
            summary: Some(summary),
            rewritten: Some(rewritten),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_does_not_rewrite() {
        let engine = Engine::default();

        let outcome = engine
            .process_source("test.js", "const a = 1;", None)
            .unwrap();

        assert_eq!(outcome.result.variables, vec!["a"]);
        assert!(outcome.rewritten.is_none());
        assert!(!outcome.changed());
    }

    #[test]
    fn parse_errors_surface() {
        let engine = Engine::default();

        let err = engine
            .process_source("broken.js", "const = ;", Some(RewriteAction::Remove))
            .unwrap_err();

        assert!(matches!(err, FileError::Parse(_)));
    }

    #[test]
    fn structural_errors_surface() {
        let engine = Engine::default();

        let err = engine
            .process_source("loop.js", "for (;;) var x = 1;", Some(RewriteAction::Remove))
            .unwrap_err();

        assert!(matches!(err, FileError::Structural(_)));
        assert!(err.to_string().contains("`x`"));
    }

    #[test]
    fn rewrite_without_unused_is_unchanged() {
        let engine = Engine::default();
        let code = "export const a = 1;\n";

        let outcome = engine
            .process_source("test.js", code, Some(RewriteAction::Remove))
            .unwrap();

        assert!(!outcome.changed());
        assert_eq!(outcome.rewritten.as_deref(), Some(code));
    }
}
