//! Semantic analysis module
//!
//! Provides the scope tree, the declaration table, and the traversal that
//! feeds them.

pub mod declarations;
pub mod scope;
pub mod walker;

pub use declarations::{
    BindingKind, DeclSite, Declaration, DeclarationId, DeclarationTable, Placement,
};
pub use scope::{AncestorIter, Scope, ScopeId, ScopeKind, ScopeTree};
pub use walker::{Binding, Pass, ReferenceShape, produces_markup, walk_module};
