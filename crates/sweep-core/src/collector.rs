//! First pass: every scope and every binding in the file

use swc_common::Span;

use crate::observer::{Location, Observer};
use crate::parser::SyntaxTree;
use crate::semantic::{
    Binding, DeclarationTable, Pass, ScopeId, ScopeKind, ScopeTree, walk_module,
};

/// Everything the first pass learned about one file.
pub struct Declared {
    pub scopes: ScopeTree,
    pub declarations: DeclarationTable,
    /// Exported names, deduplicated, in first-export order.
    pub exports: Vec<String>,
    /// Local names bound by named import specifiers.
    pub imports: Vec<String>,
}

impl Declared {
    fn new() -> Self {
        Self {
            scopes: ScopeTree::new(),
            declarations: DeclarationTable::new(),
            exports: Vec::new(),
            imports: Vec::new(),
        }
    }

    /// Exports this file does not itself import back, in first-export order.
    pub fn unimported_exports(&self) -> impl Iterator<Item = &str> {
        self.exports
            .iter()
            .filter(|name| !self.imports.contains(name))
            .map(String::as_str)
    }
}

struct Collector<'a> {
    tree: &'a SyntaxTree,
    observer: &'a mut dyn Observer,
    declared: Declared,
}

impl Pass for Collector<'_> {
    fn open_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>, span: Span) -> ScopeId {
        self.declared.scopes.create_scope(kind, parent, span)
    }

    fn declare(&mut self, binding: Binding<'_>) {
        let scope = if binding.hoisted {
            self.declared.scopes.hoisting_target(binding.scope)
        } else {
            binding.scope
        };

        self.declared.declarations.declare(
            binding.name,
            binding.kind,
            scope,
            binding.span,
            binding.site,
            binding.exported,
        );

        if self.observer.is_enabled() {
            let (line, column) = self.tree.location(binding.span.lo);
            self.observer
                .declared(binding.name, binding.kind, Location { line, column });
        }
    }

    fn export_name(&mut self, name: &str) {
        if !self.declared.exports.iter().any(|n| n == name) {
            self.declared.exports.push(name.to_string());
        }
    }

    fn import_name(&mut self, name: &str) {
        if !self.declared.imports.iter().any(|n| n == name) {
            self.declared.imports.push(name.to_string());
        }
    }
}

/// Builds the scope tree and declaration table for `tree`. Read-only.
pub fn collect(tree: &SyntaxTree, observer: &mut dyn Observer) -> Declared {
    let mut collector = Collector {
        tree,
        observer,
        declared: Declared::new(),
    };
    walk_module(tree.module(), &mut collector);
    collector.declared
}
