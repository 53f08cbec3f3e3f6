//! Declared minus used
//!
//! Classification is a pure function of the two passes' output. It yields the
//! report-facing [`ClassificationResult`] and, for the rewriter, an
//! [`EditPlan`] with one tagged action per tracked declaration.

use serde::Serialize;

use crate::collector::Declared;
use crate::config::AnalysisConfig;
use crate::parser::SyntaxTree;
use crate::resolver::UsageSet;
use crate::rewrite::RewriteAction;
use crate::semantic::{BindingKind, Declaration, DeclarationId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnusedItem {
    pub name: String,
    pub kind: BindingKind,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub variables: Vec<String>,
    pub functions: Vec<String>,
    pub components: Vec<String>,
    pub unused_exports: Vec<String>,
    /// One entry per unused declaration, so shadowed names appear once each.
    pub items: Vec<UnusedItem>,
}

impl ClassificationResult {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.unused_exports.is_empty()
    }

    /// Number of unused declarations, not counting unused exports.
    pub fn unused_count(&self) -> usize {
        self.items.len()
    }
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|n| n == name) {
        names.push(name.to_string());
    }
}

/// A tracked, unexported declaration no reference resolved to.
pub fn is_unused(declaration: &Declaration, usage: &UsageSet, config: &AnalysisConfig) -> bool {
    declaration.is_tracked()
        && !declaration.exported
        && !usage.contains(declaration.id)
        && !config.is_ignored(&declaration.name)
}

pub fn classify(
    tree: &SyntaxTree,
    declared: &Declared,
    usage: &UsageSet,
    config: &AnalysisConfig,
) -> ClassificationResult {
    let mut result = ClassificationResult::default();

    for declaration in declared.declarations.tracked() {
        if !is_unused(declaration, usage, config) {
            continue;
        }

        let names = match declaration.kind {
            BindingKind::Variable => &mut result.variables,
            BindingKind::Function => &mut result.functions,
            BindingKind::Component => &mut result.components,
            _ => continue,
        };
        push_unique(names, &declaration.name);

        let (line, column) = tree.location(declaration.span.lo);
        result.items.push(UnusedItem {
            name: declaration.name.clone(),
            kind: declaration.kind,
            line,
            column,
        });
    }

    if config.report_exports {
        for name in declared.unimported_exports() {
            if !config.is_ignored(name) {
                push_unique(&mut result.unused_exports, name);
            }
        }
    }

    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Keep,
    Annotate,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedEdit {
    pub declaration: DeclarationId,
    pub action: EditAction,
}

/// Tagged edits for every tracked declaration, in first-declaration order.
#[derive(Debug, Clone, Default)]
pub struct EditPlan {
    entries: Vec<PlannedEdit>,
}

impl EditPlan {
    pub fn build(
        declared: &Declared,
        usage: &UsageSet,
        config: &AnalysisConfig,
        action: RewriteAction,
    ) -> Self {
        let on_unused = match action {
            RewriteAction::Annotate => EditAction::Annotate,
            RewriteAction::Remove => EditAction::Remove,
        };

        let entries = declared
            .declarations
            .tracked()
            .map(|declaration| PlannedEdit {
                declaration: declaration.id,
                action: if is_unused(declaration, usage, config) {
                    on_unused
                } else {
                    EditAction::Keep
                },
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[PlannedEdit] {
        &self.entries
    }

    /// Entries whose action is not [`EditAction::Keep`].
    pub fn edits(&self) -> impl Iterator<Item = &PlannedEdit> {
        self.entries.iter().filter(|e| e.action != EditAction::Keep)
    }
}
