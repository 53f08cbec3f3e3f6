//! Declaration table for tracking bindings per lexical scope
//!
//! Every binding the walker sees is recorded here, tracked or not, so that
//! name lookup honours shadowing. Only [`BindingKind::is_tracked`] kinds are
//! ever judged used or unused.

use std::collections::HashMap;

use id_arena::{Arena, Id};
use serde::Serialize;
use swc_common::Span;

use super::scope::{ScopeId, ScopeTree};

pub type DeclarationId = Id<Declaration>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    Variable,
    Function,
    Component,
    Parameter,
    Import,
    Class,
    TypeOnly,
    Pattern,
    /// Inner name of a named function or class expression.
    ExpressionName,
}

impl BindingKind {
    pub fn is_tracked(self) -> bool {
        matches!(
            self,
            BindingKind::Variable | BindingKind::Function | BindingKind::Component
        )
    }
}

/// How the statement holding a declaration is attached to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// An entry of a module body, block, or switch case.
    List,
    /// The single-statement body of `if`, a loop, or a label.
    Body,
}

/// The node the rewriter edits for one occurrence of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclSite {
    Function {
        statement: Span,
        placement: Placement,
    },
    Declarator {
        declarator: Span,
        statement: Span,
        /// Every declarator of the enclosing statement, in source order.
        siblings: Vec<Span>,
        placement: Placement,
    },
}

impl DeclSite {
    pub fn statement(&self) -> Span {
        match self {
            DeclSite::Function { statement, .. } | DeclSite::Declarator { statement, .. } => {
                *statement
            }
        }
    }

    pub fn placement(&self) -> Placement {
        match self {
            DeclSite::Function { placement, .. } | DeclSite::Declarator { placement, .. } => {
                *placement
            }
        }
    }

    /// The range this occurrence covers on its own.
    pub fn node(&self) -> Span {
        match self {
            DeclSite::Function { statement, .. } => *statement,
            DeclSite::Declarator { declarator, .. } => *declarator,
        }
    }
}

#[derive(Debug)]
pub struct Declaration {
    pub id: DeclarationId,
    pub name: String,
    pub kind: BindingKind,
    pub scope: ScopeId,
    /// Span of the first binding identifier.
    pub span: Span,
    pub sites: Vec<DeclSite>,
    pub exported: bool,
}

impl Declaration {
    pub fn is_tracked(&self) -> bool {
        self.kind.is_tracked()
    }
}

pub struct DeclarationTable {
    arena: Arena<Declaration>,
    by_scope: HashMap<ScopeId, HashMap<String, DeclarationId>>,
}

impl Default for DeclarationTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclarationTable {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            by_scope: HashMap::new(),
        }
    }

    /// Records a binding. A second binding of the same name in the same scope
    /// folds into the first one and only contributes its site.
    pub fn declare(
        &mut self,
        name: &str,
        kind: BindingKind,
        scope: ScopeId,
        span: Span,
        site: Option<DeclSite>,
        exported: bool,
    ) -> DeclarationId {
        if let Some(&existing) = self.by_scope.get(&scope).and_then(|names| names.get(name)) {
            let declaration = &mut self.arena[existing];
            declaration.sites.extend(site);
            declaration.exported |= exported;
            return existing;
        }

        let id = self.arena.alloc_with_id(|id| Declaration {
            id,
            name: name.to_string(),
            kind,
            scope,
            span,
            sites: site.into_iter().collect(),
            exported,
        });

        self.by_scope
            .entry(scope)
            .or_default()
            .insert(name.to_string(), id);

        id
    }

    pub fn lookup(&self, name: &str, scope: ScopeId, scope_tree: &ScopeTree) -> Option<DeclarationId> {
        scope_tree.ancestors(scope).find_map(|s| {
            self.by_scope
                .get(&s.id)
                .and_then(|names| names.get(name))
                .copied()
        })
    }

    pub fn get(&self, id: DeclarationId) -> &Declaration {
        &self.arena[id]
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    /// All declarations in first-declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.arena.iter().map(|(_, d)| d)
    }

    pub fn tracked(&self) -> impl Iterator<Item = &Declaration> {
        self.iter().filter(|d| d.is_tracked())
    }
}
