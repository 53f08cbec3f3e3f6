//! Lexical scope tree
//!
//! Scopes live in an arena and are referenced by [`ScopeId`]. They are
//! allocated in traversal order, which lets a later pass over the same tree
//! replay them without any span-keyed lookup.

use id_arena::{Arena, Id};
use swc_common::Span;

pub type ScopeId = Id<Scope>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Function,
    ArrowFunction,
    Block,
    For,
    Switch,
    Catch,
    Class,
    StaticBlock,
    /// Body of a TypeScript `namespace` or `declare module`.
    Namespace,
}

impl ScopeKind {
    /// `var` and function declarations bind in the nearest scope of this kind.
    pub fn is_hoisting_target(self) -> bool {
        matches!(
            self,
            ScopeKind::Module
                | ScopeKind::Function
                | ScopeKind::ArrowFunction
                | ScopeKind::StaticBlock
                | ScopeKind::Namespace
        )
    }
}

#[derive(Debug)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub span: Span,
}

pub struct ScopeTree {
    arena: Arena<Scope>,
    order: Vec<ScopeId>,
    root: Option<ScopeId>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            order: Vec::new(),
            root: None,
        }
    }

    pub fn create_scope(
        &mut self,
        kind: ScopeKind,
        parent: Option<ScopeId>,
        span: Span,
    ) -> ScopeId {
        let id = self.arena.alloc_with_id(|id| Scope {
            id,
            kind,
            parent,
            children: Vec::new(),
            span,
        });

        if let Some(parent_id) = parent {
            self.arena[parent_id].children.push(id);
        }

        if self.root.is_none() {
            self.root = Some(id);
        }

        self.order.push(id);
        id
    }

    pub fn root(&self) -> Option<ScopeId> {
        self.root
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.arena[id]
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Scope ids in the order they were created.
    pub fn ids(&self) -> &[ScopeId] {
        &self.order
    }

    pub fn ancestors(&self, id: ScopeId) -> AncestorIter<'_> {
        AncestorIter {
            tree: self,
            current: Some(id),
        }
    }

    pub fn hoisting_target(&self, id: ScopeId) -> ScopeId {
        self.ancestors(id)
            .find(|scope| scope.kind.is_hoisting_target())
            .map(|scope| scope.id)
            .unwrap_or(id)
    }
}

pub struct AncestorIter<'a> {
    tree: &'a ScopeTree,
    current: Option<ScopeId>,
}

impl<'a> Iterator for AncestorIter<'a> {
    type Item = &'a Scope;

    fn next(&mut self) -> Option<Self::Item> {
        let current_id = self.current?;
        let scope = &self.tree.arena[current_id];
        self.current = scope.parent;
        Some(scope)
    }
}
