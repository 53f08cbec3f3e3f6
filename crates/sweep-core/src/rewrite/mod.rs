//! Annotate or remove unused declarations
//!
//! The rewriter never trusts an earlier classification. It re-runs both
//! passes on the tree it is given, builds an [`EditPlan`], checks that every
//! planned edit can be made without breaking the enclosing statement, and only
//! then applies the whole plan: AST pruning for removals, plus text edits that
//! [`crate::printer::print`] later splices into the original source.

pub mod edits;
pub mod prune;

use std::collections::{HashMap, HashSet};

use swc_common::Span;

pub use edits::{EditLog, TextEdit};
pub use prune::Pruner;

use crate::classify::{EditPlan, UnusedItem};
use crate::collector::{Declared, collect};
use crate::config::{AnalysisConfig, Config, DEFAULT_MARKER};
use crate::observer::{Location, Observer};
use crate::parser::SyntaxTree;
use crate::resolver::resolve;
use crate::semantic::{BindingKind, DeclSite, Declaration, Placement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RewriteAction {
    Annotate,
    Remove,
}

impl RewriteAction {
    pub fn verb(self) -> &'static str {
        match self {
            RewriteAction::Annotate => "annotate",
            RewriteAction::Remove => "remove",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralEditError {
    #[error(
        "cannot {action} `{name}` at {line}:{column}: it is the only statement of its parent"
    )]
    SoleStatement {
        name: String,
        action: &'static str,
        line: usize,
        column: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteSummary {
    pub action: RewriteAction,
    /// Declarations the rewrite touched, in first-declaration order.
    pub edited: Vec<UnusedItem>,
}

impl RewriteSummary {
    pub fn is_empty(&self) -> bool {
        self.edited.is_empty()
    }
}

fn kind_label(kind: BindingKind) -> &'static str {
    match kind {
        BindingKind::Function => "Function",
        BindingKind::Component => "Component",
        _ => "Variable",
    }
}

/// Extends a statement range over a `;` the node's span stops short of.
fn statement_bounds(source: &str, start: usize, end: usize) -> (usize, usize) {
    let rest = &source[end..];
    let trimmed = rest.trim_start_matches([' ', '\t']);
    if trimmed.starts_with(';') {
        (start, end + (rest.len() - trimmed.len()) + 1)
    } else {
        (start, end)
    }
}

/// Widens a range to whole lines when nothing else shares them.
fn line_bounds(source: &str, start: usize, end: usize) -> (usize, usize) {
    let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
    let rest = &source[end..];
    let newline = rest.find('\n');
    let tail = &rest[..newline.unwrap_or(rest.len())];

    if source[line_start..start].trim().is_empty() && tail.trim().is_empty() {
        let line_end = newline.map_or(source.len(), |i| end + i + 1);
        (line_start, line_end)
    } else {
        (start, end)
    }
}

/// One declarator list that holds at least one unused declarator.
struct DeclaratorList {
    statement: Span,
    siblings: Vec<Span>,
}

pub struct Rewriter {
    analysis: AnalysisConfig,
    marker: String,
}

impl Default for Rewriter {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            marker: DEFAULT_MARKER.to_string(),
        }
    }
}

impl Rewriter {
    pub fn new(config: &Config) -> Self {
        Self {
            analysis: config.analysis.clone(),
            marker: config.rewrite.marker.clone(),
        }
    }

    pub fn rewrite(
        &self,
        tree: &mut SyntaxTree,
        action: RewriteAction,
        observer: &mut dyn Observer,
    ) -> Result<RewriteSummary, StructuralEditError> {
        let declared = collect(tree, observer);
        let usage = resolve(tree, &declared, observer);
        let plan = EditPlan::build(&declared, &usage, &self.analysis, action);

        let targets: Vec<&Declaration> = plan
            .edits()
            .map(|entry| declared.declarations.get(entry.declaration))
            .filter(|declaration| !declaration.sites.is_empty())
            .collect();

        self.validate(tree, &targets, action)?;

        let mut text_edits = Vec::new();
        let mut pruned_statements = HashSet::new();
        let mut pruned_declarators = HashSet::new();
        self.plan_functions(tree, &targets, action, &mut text_edits, &mut pruned_statements);
        self.plan_declarators(
            tree,
            &declared,
            &plan,
            action,
            &mut text_edits,
            &mut pruned_statements,
            &mut pruned_declarators,
        );

        let mut edited = Vec::with_capacity(targets.len());
        for declaration in &targets {
            let (line, column) = tree.location(declaration.span.lo);
            observer.edited(&declaration.name, action.verb(), Location { line, column });
            edited.push(UnusedItem {
                name: declaration.name.clone(),
                kind: declaration.kind,
                line,
                column,
            });
        }

        let (module, log) = tree.parts_mut();
        if action == RewriteAction::Remove {
            Pruner::new(&pruned_statements, &pruned_declarators).prune(module);
        }
        for edit in text_edits {
            log.push(edit);
        }

        Ok(RewriteSummary { action, edited })
    }

    fn validate(
        &self,
        tree: &SyntaxTree,
        targets: &[&Declaration],
        action: RewriteAction,
    ) -> Result<(), StructuralEditError> {
        for declaration in targets {
            for site in &declaration.sites {
                if site.placement() == Placement::Body {
                    let (line, column) = tree.location(site.node().lo);
                    return Err(StructuralEditError::SoleStatement {
                        name: declaration.name.clone(),
                        action: action.verb(),
                        line,
                        column,
                    });
                }
            }
        }
        Ok(())
    }

    fn marker(&self, kind: BindingKind, text: &str) -> String {
        format!(
            "/* {} {}\n{}\n*/",
            self.marker,
            kind_label(kind),
            text.replace("*/", "*\\/")
        )
    }

    /// Edit for a whole statement: a marker around it, or its deletion.
    fn statement_edit(
        &self,
        tree: &SyntaxTree,
        statement: Span,
        kind: BindingKind,
        action: RewriteAction,
    ) -> TextEdit {
        let source = tree.source();
        let (start, end) =
            statement_bounds(source, tree.offset(statement.lo), tree.offset(statement.hi));

        match action {
            RewriteAction::Annotate => {
                TextEdit::replace(start, end, self.marker(kind, &source[start..end]))
            }
            RewriteAction::Remove => {
                let (start, end) = line_bounds(source, start, end);
                TextEdit::delete(start, end)
            }
        }
    }

    fn plan_functions(
        &self,
        tree: &SyntaxTree,
        targets: &[&Declaration],
        action: RewriteAction,
        text_edits: &mut Vec<TextEdit>,
        pruned_statements: &mut HashSet<Span>,
    ) {
        for declaration in targets {
            for site in &declaration.sites {
                if let DeclSite::Function { statement, .. } = site {
                    text_edits.push(self.statement_edit(tree, *statement, declaration.kind, action));
                    pruned_statements.insert(*statement);
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn plan_declarators(
        &self,
        tree: &SyntaxTree,
        declared: &Declared,
        plan: &EditPlan,
        action: RewriteAction,
        text_edits: &mut Vec<TextEdit>,
        pruned_statements: &mut HashSet<Span>,
        pruned_declarators: &mut HashSet<Span>,
    ) {
        // Declarator span -> kind, for every declarator the plan edits
        let mut unused: HashMap<Span, BindingKind> = HashMap::new();
        let mut lists: Vec<DeclaratorList> = Vec::new();

        for entry in plan.edits() {
            let declaration = declared.declarations.get(entry.declaration);
            for site in &declaration.sites {
                let DeclSite::Declarator {
                    declarator,
                    statement,
                    siblings,
                    ..
                } = site
                else {
                    continue;
                };
                unused.insert(*declarator, declaration.kind);
                if !lists.iter().any(|list| list.statement == *statement) {
                    lists.push(DeclaratorList {
                        statement: *statement,
                        siblings: siblings.clone(),
                    });
                }
            }
        }

        for list in &lists {
            let kinds: Vec<Option<BindingKind>> =
                list.siblings.iter().map(|s| unused.get(s).copied()).collect();

            if kinds.iter().all(Option::is_some) {
                let kind = kinds[0].unwrap_or(BindingKind::Variable);
                text_edits.push(self.statement_edit(tree, list.statement, kind, action));
                pruned_statements.insert(list.statement);
                continue;
            }

            let mut index = 0;
            while index < list.siblings.len() {
                if kinds[index].is_none() {
                    index += 1;
                    continue;
                }
                let run_start = index;
                while index < list.siblings.len() && kinds[index].is_some() {
                    index += 1;
                }
                let run = run_start..index;

                text_edits.push(self.run_edit(tree, list, run.clone(), &kinds, action));
                for span in &list.siblings[run] {
                    pruned_declarators.insert(*span);
                }
            }
        }
    }

    /// Edit for a run of unused declarators inside a list that keeps at least
    /// one declarator. The separating comma goes with the run.
    fn run_edit(
        &self,
        tree: &SyntaxTree,
        list: &DeclaratorList,
        run: std::ops::Range<usize>,
        kinds: &[Option<BindingKind>],
        action: RewriteAction,
    ) -> TextEdit {
        let siblings = &list.siblings;
        let followed = run.end < siblings.len();

        let (start, end) = if followed {
            (
                tree.offset(siblings[run.start].lo),
                tree.offset(siblings[run.end].lo),
            )
        } else {
            (
                tree.offset(siblings[run.start - 1].hi),
                tree.offset(siblings[run.end - 1].hi),
            )
        };

        match action {
            RewriteAction::Remove => TextEdit::delete(start, end),
            RewriteAction::Annotate => {
                let markers: Vec<String> = run
                    .map(|i| {
                        let kind = kinds[i].unwrap_or(BindingKind::Variable);
                        self.marker(kind, tree.text(siblings[i]))
                    })
                    .collect();
                let markers = markers.join(" ");
                let replacement = if followed {
                    format!("{markers} ")
                } else {
                    format!(" {markers}")
                };
                TextEdit::replace(start, end, replacement)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{NoopObserver, ObserverEvent, RecordingObserver};
    use crate::parser::parse;
    use crate::printer::print;

    fn rewrite_code(code: &str, action: RewriteAction) -> String {
        let mut tree = parse("test.jsx", code).unwrap();
        Rewriter::default()
            .rewrite(&mut tree, action, &mut NoopObserver)
            .unwrap();
        print(&tree, code).unwrap()
    }

    #[test]
    fn remove_whole_lines() {
        let code = "const unused = 1;\nconst used = 2;\nconsole.log(used);\n";

        assert_eq!(
            rewrite_code(code, RewriteAction::Remove),
            "const used = 2;\nconsole.log(used);\n"
        );
    }

    #[test]
    fn remove_indented_function() {
        let code = "export function run() {\n  function helper() {}\n  return 1;\n}\n";

        assert_eq!(
            rewrite_code(code, RewriteAction::Remove),
            "export function run() {\n  return 1;\n}\n"
        );
    }

    #[test]
    fn remove_leading_declarator_takes_comma() {
        let code = "let a = 1, b = 2;\nb;";

        assert_eq!(rewrite_code(code, RewriteAction::Remove), "let b = 2;\nb;");
    }

    #[test]
    fn remove_trailing_declarator_takes_comma() {
        let code = "let a = 1, b = 2, c = 3;\na;";

        assert_eq!(rewrite_code(code, RewriteAction::Remove), "let a = 1;\na;");
    }

    #[test]
    fn remove_middle_run() {
        let code = "var a = 1, b = 2, c = 3, d = 4;\nconsole.log(a, d);";

        assert_eq!(
            rewrite_code(code, RewriteAction::Remove),
            "var a = 1, d = 4;\nconsole.log(a, d);"
        );
    }

    #[test]
    fn annotate_wraps_statement() {
        let code = "const unused = 5;\n";

        assert_eq!(
            rewrite_code(code, RewriteAction::Annotate),
            "/* TODO: Unused Variable\nconst unused = 5;\n*/\n"
        );
    }

    #[test]
    fn annotate_function_and_component() {
        let code = "function helper() {}\nconst Card = () => <div />;\n";

        assert_eq!(
            rewrite_code(code, RewriteAction::Annotate),
            "/* TODO: Unused Function\nfunction helper() {}\n*/\n/* TODO: Unused Component\nconst Card = () => <div />;\n*/\n"
        );
    }

    #[test]
    fn annotate_partial_list_keeps_statement_valid() {
        let code = "const a = 1, b = 2;\nb;";
        let output = rewrite_code(code, RewriteAction::Annotate);

        assert_eq!(output, "const /* TODO: Unused Variable\na = 1\n*/ b = 2;\nb;");
        assert!(parse("out.js", &output).is_ok());
    }

    #[test]
    fn annotate_trailing_declarator() {
        let code = "const a = 1, b = 2;\na;";
        let output = rewrite_code(code, RewriteAction::Annotate);

        assert_eq!(output, "const a = 1 /* TODO: Unused Variable\nb = 2\n*/;\na;");
        assert!(parse("out.js", &output).is_ok());
    }

    #[test]
    fn annotate_escapes_comment_terminators() {
        let code = "function noisy() { /* inner */ }\n";
        let output = rewrite_code(code, RewriteAction::Annotate);

        assert!(output.contains("/* inner *\\/"));
        assert!(parse("out.js", &output).is_ok());
    }

    #[test]
    fn custom_marker() {
        let mut config = Config::default();
        config.rewrite.marker = "FIXME dead".to_string();
        let code = "const gone = 1;";
        let mut tree = parse("test.js", code).unwrap();

        Rewriter::new(&config)
            .rewrite(&mut tree, RewriteAction::Annotate, &mut NoopObserver)
            .unwrap();

        assert!(print(&tree, code).unwrap().starts_with("/* FIXME dead Variable\n"));
    }

    #[test]
    fn outer_removal_wins_over_nested() {
        let code = "function outer() {\n  const inner = 1;\n}\n";

        assert_eq!(rewrite_code(code, RewriteAction::Remove), "");
    }

    #[test]
    fn sole_body_is_a_structural_error() {
        let code = "if (ready) var late = 1;";
        let mut tree = parse("test.js", code).unwrap();

        let err = Rewriter::default()
            .rewrite(&mut tree, RewriteAction::Remove, &mut NoopObserver)
            .unwrap_err();

        assert_eq!(
            err,
            StructuralEditError::SoleStatement {
                name: "late".to_string(),
                action: "remove",
                line: 1,
                column: 16,
            }
        );
        assert!(!tree.is_modified());
        assert_eq!(tree.module().body.len(), 1);
    }

    #[test]
    fn structural_error_leaves_other_edits_unapplied() {
        let code = "const unused = 1;\nwhile (go()) var spin = 2;";
        let mut tree = parse("test.js", code).unwrap();

        assert!(Rewriter::default()
            .rewrite(&mut tree, RewriteAction::Annotate, &mut NoopObserver)
            .is_err());
        assert!(!tree.is_modified());
    }

    #[test]
    fn summary_and_observer_report_edits() {
        let code = "const a = 1;\nfunction b() {}";
        let mut tree = parse("test.js", code).unwrap();
        let mut observer = RecordingObserver::new();

        let summary = Rewriter::default()
            .rewrite(&mut tree, RewriteAction::Remove, &mut observer)
            .unwrap();

        let names: Vec<&str> = summary.edited.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(observer.events.contains(&ObserverEvent::Edited {
            name: "b".to_string(),
            action: "remove",
            line: 2,
        }));
    }

    #[test]
    fn scoped_rewrite_keeps_used_twin() {
        let code = "function f() {\n  const x = 1;\n}\nfunction g() {\n  const x = 2;\n  console.log(x);\n}\nf();\ng();\n";

        assert_eq!(
            rewrite_code(code, RewriteAction::Remove),
            "function f() {\n}\nfunction g() {\n  const x = 2;\n  console.log(x);\n}\nf();\ng();\n"
        );
    }

    #[test]
    fn statement_bounds_take_detached_semicolon() {
        assert_eq!(statement_bounds("let a = 1 ;", 0, 9), (0, 11));
        assert_eq!(statement_bounds("function f() {}\n", 0, 15), (0, 15));
    }

    #[test]
    fn line_bounds_only_when_alone_on_line() {
        let source = "a();\n  const x = 1;\nb();";
        assert_eq!(line_bounds(source, 7, 19), (5, 20));
        assert_eq!(line_bounds("a(); const x = 1;", 5, 17), (5, 17));
    }
}
