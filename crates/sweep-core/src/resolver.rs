//! Second pass: which declarations are referenced
//!
//! The resolver runs the same walker as the collector and replays the scopes
//! the collector allocated, in creation order, so every reference is looked up
//! from the exact scope it appears in.

use std::collections::HashSet;

use swc_common::{BytePos, Span};
use swc_ecma_ast::Ident;

use crate::collector::Declared;
use crate::observer::{Location, Observer};
use crate::parser::SyntaxTree;
use crate::semantic::{
    DeclarationId, Pass, ReferenceShape, ScopeId, ScopeKind, ScopeTree, walk_module,
};

/// Declarations with at least one qualifying reference. Membership only grows.
#[derive(Debug, Default, Clone)]
pub struct UsageSet {
    used: HashSet<DeclarationId>,
}

impl UsageSet {
    pub fn mark(&mut self, id: DeclarationId) -> bool {
        self.used.insert(id)
    }

    pub fn contains(&self, id: DeclarationId) -> bool {
        self.used.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

struct Resolver<'a> {
    tree: &'a SyntaxTree,
    declared: &'a Declared,
    observer: &'a mut dyn Observer,
    next_scope: usize,
    /// Cleared once the walk opens a scope the collector never allocated,
    /// which means `declared` came from a different tree.
    in_sync: bool,
    /// Holds the scopes opened after replay fell out of sync.
    stray_scopes: ScopeTree,
    usage: UsageSet,
}

impl Resolver<'_> {
    fn at(&self, pos: BytePos) -> Location {
        let (line, column) = self.tree.location(pos);
        Location { line, column }
    }
}

impl Pass for Resolver<'_> {
    fn open_scope(&mut self, kind: ScopeKind, _parent: Option<ScopeId>, span: Span) -> ScopeId {
        if self.in_sync {
            if let Some(&id) = self.declared.scopes.ids().get(self.next_scope) {
                self.next_scope += 1;
                return id;
            }
            tracing::warn!(
                file = self.tree.filename(),
                scopes = self.declared.scopes.len(),
                "declarations do not match the tree being resolved; skipping the rest"
            );
            self.in_sync = false;
        }
        self.stray_scopes.create_scope(kind, None, span)
    }

    fn reference(&mut self, ident: &Ident, scope: ScopeId, shape: ReferenceShape) {
        if !self.in_sync {
            return;
        }
        let name = ident.sym.as_str();

        match self
            .declared
            .declarations
            .lookup(name, scope, &self.declared.scopes)
        {
            Some(id) => {
                if self.usage.mark(id)
                    && self.declared.declarations.get(id).is_tracked()
                    && self.observer.is_enabled()
                {
                    let at = self.at(ident.span.lo);
                    self.observer.used(name, shape, at);
                }
            }
            None if self.observer.is_enabled() => {
                let at = self.at(ident.span.lo);
                self.observer.unresolved(name, at);
            }
            None => {}
        }
    }
}

/// Resolves every reference in `tree` against the tables built by
/// [`crate::collector::collect`] over the same, unmodified tree.
pub fn resolve(tree: &SyntaxTree, declared: &Declared, observer: &mut dyn Observer) -> UsageSet {
    let mut resolver = Resolver {
        tree,
        declared,
        observer,
        next_scope: 0,
        in_sync: true,
        stray_scopes: ScopeTree::new(),
        usage: UsageSet::default(),
    };
    walk_module(tree.module(), &mut resolver);
    resolver.usage
}
