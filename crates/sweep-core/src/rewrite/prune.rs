//! AST side of removal: drops the nodes whose text the rewriter deletes

use std::collections::HashSet;

use swc_common::{Span, Spanned};
use swc_ecma_ast::{Decl, Module, ModuleItem, Stmt, VarDecl};
use swc_ecma_visit::{VisitMut, VisitMutWith};

/// Removes function declaration statements and variable declarators by span.
/// A variable statement left without declarators is removed with them.
pub struct Pruner<'a> {
    statements: &'a HashSet<Span>,
    declarators: &'a HashSet<Span>,
}

impl<'a> Pruner<'a> {
    pub fn new(statements: &'a HashSet<Span>, declarators: &'a HashSet<Span>) -> Self {
        Self {
            statements,
            declarators,
        }
    }

    pub fn prune(&mut self, module: &mut Module) {
        module.visit_mut_with(self);
    }

    fn drops(&self, stmt: &Stmt) -> bool {
        match stmt {
            Stmt::Decl(Decl::Fn(fn_decl)) => self.statements.contains(&fn_decl.span()),
            Stmt::Decl(Decl::Var(var)) => {
                var.decls.is_empty() || self.statements.contains(&var.span)
            }
            _ => false,
        }
    }
}

impl VisitMut for Pruner<'_> {
    fn visit_mut_module_items(&mut self, items: &mut Vec<ModuleItem>) {
        items.visit_mut_children_with(self);
        items.retain(|item| match item {
            ModuleItem::Stmt(stmt) => !self.drops(stmt),
            ModuleItem::ModuleDecl(_) => true,
        });
    }

    fn visit_mut_stmts(&mut self, stmts: &mut Vec<Stmt>) {
        stmts.visit_mut_children_with(self);
        stmts.retain(|stmt| !self.drops(stmt));
    }

    fn visit_mut_var_decl(&mut self, node: &mut VarDecl) {
        node.visit_mut_children_with(self);
        node.decls
            .retain(|declarator| !self.declarators.contains(&declarator.span));
    }
}
