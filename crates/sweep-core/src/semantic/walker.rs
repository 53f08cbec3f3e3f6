//! Scope-aware traversal shared by the collecting and resolving passes
//!
//! The walker knows the binding rules of the language: which nodes open a
//! scope, which identifiers bind names, and which identifiers are references.
//! It reports all of that to a [`Pass`], which decides what to record. Both
//! passes run the exact same traversal, so scopes are opened in the same order
//! every time and a resolving pass can replay the scopes a collecting pass
//! allocated.

use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    ArrowExpr, BlockStmt, BlockStmtOrExpr, CatchClause, Class, ClassMember, Decl, DefaultDecl,
    ExportSpecifier, Expr, FnDecl, ForHead, Function, Ident, ImportSpecifier, JSXAttrOrSpread,
    JSXAttrValue, JSXElement, JSXElementChild, JSXElementName, JSXExpr, JSXFragment,
    JSXMemberExpr, JSXObject, MemberProp, Module, ModuleDecl, ModuleExportName, ModuleItem,
    Key, ObjectPatProp, OptChainBase, OptChainExpr, ParamOrTsParamProp, Pat, Prop, PropName,
    PropOrSpread, Stmt, TsEntityName, TsFnParam, TsModuleName, TsNamespaceBody, TsParamPropParam,
    TsType, TsTypeElement, TsTypeParamDecl, VarDecl, VarDeclOrExpr,
};
use swc_ecma_visit::{Visit, VisitWith};

use super::declarations::{BindingKind, DeclSite, Placement};
use super::scope::{ScopeId, ScopeKind};

/// The syntactic shape a reference was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceShape {
    Identifier,
    /// Callee of a direct call, `f()`.
    Call,
    /// Receiver of a member access or qualified call, `obj` in `obj.method()`.
    Receiver,
    /// Tag-position name, `<Foo />`.
    Markup,
    /// `export { x }` or `export default x`.
    Export,
    /// Type position (`let a: Foo`, `typeof x`).
    Type,
}

/// One name-introducing occurrence.
#[derive(Debug)]
pub struct Binding<'a> {
    pub name: &'a str,
    pub kind: BindingKind,
    pub span: Span,
    /// Scope the binding appeared in.
    pub scope: ScopeId,
    /// `var` and sloppy function bindings belong to the nearest function scope.
    pub hoisted: bool,
    pub site: Option<DeclSite>,
    pub exported: bool,
}

/// Receiver of walker events. Only scope allocation is mandatory.
pub trait Pass {
    fn open_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>, span: Span) -> ScopeId;

    fn declare(&mut self, _binding: Binding<'_>) {}

    fn reference(&mut self, _ident: &Ident, _scope: ScopeId, _shape: ReferenceShape) {}

    fn export_name(&mut self, _name: &str) {}

    fn import_name(&mut self, _name: &str) {}
}

pub fn walk_module<P: Pass>(module: &Module, pass: &mut P) {
    let scope = pass.open_scope(ScopeKind::Module, None, module.span);
    let mut walker = Walker {
        pass,
        scope,
        in_namespace: false,
        ambient: false,
    };
    walker.visit_module(module);
}

/// Whether `node` contains a JSX element or fragment anywhere below it.
pub fn produces_markup<N: VisitWith<JsxDetector>>(node: &N) -> bool {
    let mut detector = JsxDetector { found_jsx: false };
    node.visit_with(&mut detector);
    detector.found_jsx
}

pub struct JsxDetector {
    found_jsx: bool,
}

impl Visit for JsxDetector {
    fn visit_jsx_element(&mut self, _node: &JSXElement) {
        self.found_jsx = true;
    }

    fn visit_jsx_fragment(&mut self, _node: &JSXFragment) {
        self.found_jsx = true;
    }
}

fn is_component_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}

struct Walker<'p, P: Pass> {
    pass: &'p mut P,
    scope: ScopeId,
    /// Inside a namespace body, where `export` names a namespace member.
    in_namespace: bool,
    /// Inside `declare namespace`, `declare module` or `declare global`.
    ambient: bool,
}

impl<P: Pass> Walker<'_, P> {
    fn in_scope(&mut self, kind: ScopeKind, span: Span, f: impl FnOnce(&mut Self)) {
        let parent = self.scope;
        self.scope = self.pass.open_scope(kind, Some(parent), span);
        f(self);
        self.scope = parent;
    }

    fn declare(&mut self, ident: &Ident, kind: BindingKind, site: Option<DeclSite>, exported: bool) {
        self.declare_with(ident, kind, false, site, exported);
    }

    fn declare_with(
        &mut self,
        ident: &Ident,
        kind: BindingKind,
        hoisted: bool,
        site: Option<DeclSite>,
        exported: bool,
    ) {
        // ambient bodies only describe shapes; nothing in them can be removed
        let (kind, site) = if self.ambient {
            (BindingKind::TypeOnly, None)
        } else {
            (kind, site)
        };
        self.pass.declare(Binding {
            name: ident.sym.as_str(),
            kind,
            span: ident.span,
            scope: self.scope,
            hoisted,
            site,
            exported,
        });
    }

    fn reference(&mut self, ident: &Ident, shape: ReferenceShape) {
        self.pass.reference(ident, self.scope, shape);
    }

    fn export_name(&mut self, name: &str) {
        if !self.in_namespace {
            self.pass.export_name(name);
        }
    }

    fn visit_module(&mut self, module: &Module) {
        self.visit_module_items(&module.body);
    }

    fn visit_module_items(&mut self, items: &[ModuleItem]) {
        for item in items {
            match item {
                ModuleItem::ModuleDecl(decl) => self.visit_module_decl(decl),
                ModuleItem::Stmt(stmt) => self.visit_stmt(stmt, Placement::List),
            }
        }
    }

    fn visit_namespace_body(&mut self, body: &TsNamespaceBody, span: Span, ambient: bool) {
        let outer = (self.in_namespace, self.ambient);
        self.in_namespace = true;
        self.ambient |= ambient;
        self.in_scope(ScopeKind::Namespace, span, |this| match body {
            TsNamespaceBody::TsModuleBlock(block) => this.visit_module_items(&block.body),
            // `namespace A.B {}` holds B as the body of A
            TsNamespaceBody::TsNamespaceDecl(nested) => {
                this.visit_namespace_body(&nested.body, nested.span, nested.declare)
            }
        });
        (self.in_namespace, self.ambient) = outer;
    }

    fn visit_module_decl(&mut self, decl: &ModuleDecl) {
        match decl {
            ModuleDecl::Import(import) => {
                for specifier in &import.specifiers {
                    let local = match specifier {
                        ImportSpecifier::Named(named) => {
                            self.pass.import_name(named.local.sym.as_str());
                            &named.local
                        }
                        ImportSpecifier::Default(default) => &default.local,
                        ImportSpecifier::Namespace(namespace) => &namespace.local,
                    };
                    self.declare(local, BindingKind::Import, None, false);
                }
            }
            ModuleDecl::ExportDecl(export_decl) => {
                for name in exported_names(&export_decl.decl) {
                    self.export_name(name);
                }
                self.visit_decl(&export_decl.decl, export_decl.span, Placement::List, true);
            }
            ModuleDecl::ExportNamed(named_export) => {
                for specifier in &named_export.specifiers {
                    match specifier {
                        ExportSpecifier::Named(named) => {
                            let exported = named.exported.as_ref().unwrap_or(&named.orig);
                            if let ModuleExportName::Ident(ident) = exported {
                                self.export_name(ident.sym.as_str());
                            }
                            // `export { foo } from 'mod'` names nothing local
                            if named_export.src.is_none() {
                                if let ModuleExportName::Ident(ident) = &named.orig {
                                    self.reference(ident, ReferenceShape::Export);
                                }
                            }
                        }
                        ExportSpecifier::Default(default) => {
                            self.export_name(default.exported.sym.as_str());
                        }
                        ExportSpecifier::Namespace(namespace) => {
                            if let ModuleExportName::Ident(ident) = &namespace.name {
                                self.export_name(ident.sym.as_str());
                            }
                        }
                    }
                }
            }
            ModuleDecl::ExportDefaultDecl(export_default) => match &export_default.decl {
                DefaultDecl::Fn(fn_expr) => {
                    if let Some(ident) = &fn_expr.ident {
                        let kind = if is_component_name(&ident.sym)
                            && produces_markup(&*fn_expr.function)
                        {
                            BindingKind::Component
                        } else {
                            BindingKind::Function
                        };
                        self.declare(ident, kind, None, true);
                    }
                    self.visit_function(&fn_expr.function, None);
                }
                DefaultDecl::Class(class_expr) => {
                    if let Some(ident) = &class_expr.ident {
                        self.declare(ident, BindingKind::Class, None, true);
                    }
                    self.visit_class(&class_expr.class, None);
                }
                DefaultDecl::TsInterfaceDecl(interface) => {
                    self.declare(&interface.id, BindingKind::TypeOnly, None, true);
                    for member in &interface.body.body {
                        self.visit_ts_type_element(member);
                    }
                }
            },
            ModuleDecl::ExportDefaultExpr(export_expr) => {
                if let Expr::Ident(ident) = &*export_expr.expr {
                    self.reference(ident, ReferenceShape::Export);
                } else {
                    self.visit_expr(&export_expr.expr);
                }
            }
            ModuleDecl::TsImportEquals(import_equals) => {
                self.declare(&import_equals.id, BindingKind::Import, None, import_equals.is_export);
            }
            ModuleDecl::TsExportAssignment(assignment) => {
                self.visit_expr(&assignment.expr);
            }
            ModuleDecl::ExportAll(_) | ModuleDecl::TsNamespaceExport(_) => {}
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt, placement: Placement) {
        match stmt {
            Stmt::Decl(decl) => self.visit_decl(decl, decl.span(), placement, false),
            Stmt::Block(block) => self.visit_block_stmt(block),
            Stmt::If(if_stmt) => {
                self.visit_expr(&if_stmt.test);
                self.visit_body(&if_stmt.cons);
                if let Some(alt) = &if_stmt.alt {
                    self.visit_body(alt);
                }
            }
            Stmt::For(for_stmt) => {
                self.in_scope(ScopeKind::For, for_stmt.span, |this| {
                    match &for_stmt.init {
                        Some(VarDeclOrExpr::VarDecl(var_decl)) => this.visit_loop_head(var_decl),
                        Some(VarDeclOrExpr::Expr(expr)) => this.visit_expr(expr),
                        None => {}
                    }
                    if let Some(test) = &for_stmt.test {
                        this.visit_expr(test);
                    }
                    if let Some(update) = &for_stmt.update {
                        this.visit_expr(update);
                    }
                    this.visit_body(&for_stmt.body);
                });
            }
            Stmt::ForIn(for_in) => {
                self.in_scope(ScopeKind::For, for_in.span, |this| {
                    this.visit_for_head(&for_in.left);
                    this.visit_expr(&for_in.right);
                    this.visit_body(&for_in.body);
                });
            }
            Stmt::ForOf(for_of) => {
                self.in_scope(ScopeKind::For, for_of.span, |this| {
                    this.visit_for_head(&for_of.left);
                    this.visit_expr(&for_of.right);
                    this.visit_body(&for_of.body);
                });
            }
            Stmt::While(while_stmt) => {
                self.visit_expr(&while_stmt.test);
                self.visit_body(&while_stmt.body);
            }
            Stmt::DoWhile(do_while) => {
                self.visit_body(&do_while.body);
                self.visit_expr(&do_while.test);
            }
            Stmt::Switch(switch_stmt) => {
                self.visit_expr(&switch_stmt.discriminant);
                self.in_scope(ScopeKind::Switch, switch_stmt.span, |this| {
                    for case in &switch_stmt.cases {
                        if let Some(test) = &case.test {
                            this.visit_expr(test);
                        }
                        for stmt in &case.cons {
                            this.visit_stmt(stmt, Placement::List);
                        }
                    }
                });
            }
            Stmt::Try(try_stmt) => {
                self.visit_block_stmt(&try_stmt.block);
                if let Some(handler) = &try_stmt.handler {
                    self.visit_catch_clause(handler);
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    self.visit_block_stmt(finalizer);
                }
            }
            Stmt::Labeled(labeled) => self.visit_body(&labeled.body),
            Stmt::With(with_stmt) => {
                self.visit_expr(&with_stmt.obj);
                self.visit_body(&with_stmt.body);
            }
            Stmt::Return(ret) => {
                if let Some(arg) = &ret.arg {
                    self.visit_expr(arg);
                }
            }
            Stmt::Throw(throw_stmt) => self.visit_expr(&throw_stmt.arg),
            Stmt::Expr(expr_stmt) => self.visit_expr(&expr_stmt.expr),
            Stmt::Empty(_) | Stmt::Debugger(_) | Stmt::Break(_) | Stmt::Continue(_) => {}
        }
    }

    /// Single-statement body of a compound statement.
    fn visit_body(&mut self, stmt: &Stmt) {
        self.visit_stmt(stmt, Placement::Body);
    }

    fn visit_block_stmt(&mut self, block: &BlockStmt) {
        self.in_scope(ScopeKind::Block, block.span, |this| {
            this.visit_stmts(&block.stmts);
        });
    }

    fn visit_stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.visit_stmt(stmt, Placement::List);
        }
    }

    fn visit_catch_clause(&mut self, catch: &CatchClause) {
        self.in_scope(ScopeKind::Catch, catch.span, |this| {
            if let Some(param) = &catch.param {
                this.declare_pat(param, BindingKind::Parameter, false);
            }
            this.visit_stmts(&catch.body.stmts);
        });
    }

    fn visit_decl(&mut self, decl: &Decl, statement: Span, placement: Placement, exported: bool) {
        match decl {
            Decl::Var(var_decl) => self.visit_var_decl(var_decl, statement, placement, exported),
            Decl::Fn(fn_decl) => self.visit_fn_decl(fn_decl, statement, placement, exported),
            Decl::Class(class_decl) => {
                self.declare(&class_decl.ident, BindingKind::Class, None, exported);
                self.visit_class(&class_decl.class, None);
            }
            Decl::Using(using) => {
                for declarator in &using.decls {
                    self.declare_pat(&declarator.name, BindingKind::Pattern, false);
                    if let Some(init) = &declarator.init {
                        self.visit_expr(init);
                    }
                }
            }
            Decl::TsInterface(interface) => {
                self.declare(&interface.id, BindingKind::TypeOnly, None, exported);
                if let Some(type_params) = &interface.type_params {
                    self.visit_ts_type_param_decl(type_params);
                }
                for extends in &interface.extends {
                    self.visit_expr(&extends.expr);
                    if let Some(type_args) = &extends.type_args {
                        for arg in &type_args.params {
                            self.visit_ts_type(arg);
                        }
                    }
                }
                for member in &interface.body.body {
                    self.visit_ts_type_element(member);
                }
            }
            Decl::TsTypeAlias(alias) => {
                self.declare(&alias.id, BindingKind::TypeOnly, None, exported);
                if let Some(type_params) = &alias.type_params {
                    self.visit_ts_type_param_decl(type_params);
                }
                self.visit_ts_type(&alias.type_ann);
            }
            Decl::TsEnum(ts_enum) => {
                self.declare(&ts_enum.id, BindingKind::TypeOnly, None, exported);
                for member in &ts_enum.members {
                    if let Some(init) = &member.init {
                        self.visit_expr(init);
                    }
                }
            }
            Decl::TsModule(ts_module) => {
                // `declare global` names no binding
                if let (TsModuleName::Ident(ident), false) = (&ts_module.id, ts_module.global) {
                    self.declare(ident, BindingKind::TypeOnly, None, exported);
                }
                if let Some(body) = &ts_module.body {
                    let ambient = ts_module.declare
                        || ts_module.global
                        || matches!(ts_module.id, TsModuleName::Str(_));
                    self.visit_namespace_body(body, ts_module.span, ambient);
                }
            }
        }
    }

    fn visit_var_decl(
        &mut self,
        var_decl: &VarDecl,
        statement: Span,
        placement: Placement,
        exported: bool,
    ) {
        let hoisted = var_decl.kind == swc_ecma_ast::VarDeclKind::Var;
        let siblings: Vec<Span> = var_decl.decls.iter().map(|d| d.span).collect();

        for declarator in &var_decl.decls {
            match &declarator.name {
                Pat::Ident(binding) if !var_decl.declare => {
                    let produces_jsx = declarator.init.as_deref().is_some_and(produces_markup);
                    let kind = if is_component_name(&binding.id.sym) && produces_jsx {
                        BindingKind::Component
                    } else {
                        BindingKind::Variable
                    };
                    let site = (!exported).then(|| DeclSite::Declarator {
                        declarator: declarator.span,
                        statement,
                        siblings: siblings.clone(),
                        placement,
                    });
                    self.declare_with(&binding.id, kind, hoisted, site, exported);
                    if let Some(type_ann) = &binding.type_ann {
                        self.visit_ts_type(&type_ann.type_ann);
                    }
                }
                pat => {
                    let kind = if var_decl.declare {
                        BindingKind::TypeOnly
                    } else {
                        BindingKind::Pattern
                    };
                    self.declare_pat(pat, kind, hoisted);
                }
            }

            if let Some(init) = &declarator.init {
                self.visit_expr(init);
            }
        }
    }

    fn visit_loop_head(&mut self, var_decl: &VarDecl) {
        let hoisted = var_decl.kind == swc_ecma_ast::VarDeclKind::Var;
        for declarator in &var_decl.decls {
            self.declare_pat(&declarator.name, BindingKind::Pattern, hoisted);
            if let Some(init) = &declarator.init {
                self.visit_expr(init);
            }
        }
    }

    fn visit_for_head(&mut self, head: &ForHead) {
        match head {
            ForHead::VarDecl(var_decl) => self.visit_loop_head(var_decl),
            ForHead::UsingDecl(using) => {
                for declarator in &using.decls {
                    self.declare_pat(&declarator.name, BindingKind::Pattern, false);
                }
            }
            ForHead::Pat(pat) => self.visit_pat_target(pat),
        }
    }

    fn visit_fn_decl(
        &mut self,
        fn_decl: &FnDecl,
        statement: Span,
        placement: Placement,
        exported: bool,
    ) {
        let kind = if fn_decl.declare {
            BindingKind::TypeOnly
        } else if is_component_name(&fn_decl.ident.sym) && produces_markup(&*fn_decl.function) {
            BindingKind::Component
        } else {
            BindingKind::Function
        };
        let site = (!exported && !fn_decl.declare).then_some(DeclSite::Function {
            statement,
            placement,
        });
        self.declare(&fn_decl.ident, kind, site, exported);
        self.visit_function(&fn_decl.function, None);
    }

    /// `self_name` is the inner name of a named function expression, visible
    /// only inside its own body.
    fn visit_function(&mut self, func: &Function, self_name: Option<&Ident>) {
        for decorator in &func.decorators {
            self.visit_expr(&decorator.expr);
        }
        if let Some(type_params) = &func.type_params {
            self.visit_ts_type_param_decl(type_params);
        }
        if let Some(return_type) = &func.return_type {
            self.visit_ts_type(&return_type.type_ann);
        }

        // Overload signatures declare nothing
        let Some(body) = &func.body else {
            for param in &func.params {
                self.visit_pat_types(&param.pat);
            }
            return;
        };

        self.in_scope(ScopeKind::Function, func.span, |this| {
            if let Some(ident) = self_name {
                this.declare(ident, BindingKind::ExpressionName, None, false);
            }
            for param in &func.params {
                for decorator in &param.decorators {
                    this.visit_expr(&decorator.expr);
                }
                this.declare_pat(&param.pat, BindingKind::Parameter, false);
            }
            this.visit_stmts(&body.stmts);
        });
    }

    fn visit_arrow_expr(&mut self, arrow: &ArrowExpr) {
        self.in_scope(ScopeKind::ArrowFunction, arrow.span, |this| {
            if let Some(type_params) = &arrow.type_params {
                this.visit_ts_type_param_decl(type_params);
            }
            for param in &arrow.params {
                this.declare_pat(param, BindingKind::Parameter, false);
            }
            if let Some(return_type) = &arrow.return_type {
                this.visit_ts_type(&return_type.type_ann);
            }
            match &*arrow.body {
                BlockStmtOrExpr::BlockStmt(block) => this.visit_stmts(&block.stmts),
                BlockStmtOrExpr::Expr(expr) => this.visit_expr(expr),
            }
        });
    }

    fn visit_class(&mut self, class: &Class, self_name: Option<&Ident>) {
        for decorator in &class.decorators {
            self.visit_expr(&decorator.expr);
        }
        if let Some(super_class) = &class.super_class {
            self.visit_expr(super_class);
        }
        for implements in &class.implements {
            self.visit_expr(&implements.expr);
        }

        self.in_scope(ScopeKind::Class, class.span, |this| {
            if let Some(ident) = self_name {
                this.declare(ident, BindingKind::ExpressionName, None, false);
            }
            for member in &class.body {
                this.visit_class_member(member);
            }
        });
    }

    fn visit_class_member(&mut self, member: &ClassMember) {
        match member {
            ClassMember::Method(method) => {
                self.visit_prop_name(&method.key);
                self.visit_function(&method.function, None);
            }
            ClassMember::PrivateMethod(method) => {
                self.visit_function(&method.function, None);
            }
            ClassMember::Constructor(ctor) => {
                self.in_scope(ScopeKind::Function, ctor.span, |this| {
                    for param in &ctor.params {
                        match param {
                            ParamOrTsParamProp::Param(p) => {
                                for decorator in &p.decorators {
                                    this.visit_expr(&decorator.expr);
                                }
                                this.declare_pat(&p.pat, BindingKind::Parameter, false);
                            }
                            ParamOrTsParamProp::TsParamProp(prop) => {
                                for decorator in &prop.decorators {
                                    this.visit_expr(&decorator.expr);
                                }
                                match &prop.param {
                                    TsParamPropParam::Ident(binding) => {
                                        this.declare(
                                            &binding.id,
                                            BindingKind::Parameter,
                                            None,
                                            false,
                                        );
                                        if let Some(type_ann) = &binding.type_ann {
                                            this.visit_ts_type(&type_ann.type_ann);
                                        }
                                    }
                                    TsParamPropParam::Assign(assign) => {
                                        this.declare_pat(
                                            &assign.left,
                                            BindingKind::Parameter,
                                            false,
                                        );
                                        this.visit_expr(&assign.right);
                                    }
                                }
                            }
                        }
                    }
                    if let Some(body) = &ctor.body {
                        this.visit_stmts(&body.stmts);
                    }
                });
            }
            ClassMember::ClassProp(prop) => {
                for decorator in &prop.decorators {
                    self.visit_expr(&decorator.expr);
                }
                self.visit_prop_name(&prop.key);
                if let Some(value) = &prop.value {
                    self.visit_expr(value);
                }
                if let Some(type_ann) = &prop.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            ClassMember::PrivateProp(prop) => {
                if let Some(value) = &prop.value {
                    self.visit_expr(value);
                }
                if let Some(type_ann) = &prop.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            ClassMember::AutoAccessor(accessor) => {
                for decorator in &accessor.decorators {
                    self.visit_expr(&decorator.expr);
                }
                if let Key::Public(key) = &accessor.key {
                    self.visit_prop_name(key);
                }
                if let Some(value) = &accessor.value {
                    self.visit_expr(value);
                }
                if let Some(type_ann) = &accessor.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            ClassMember::StaticBlock(block) => {
                self.in_scope(ScopeKind::StaticBlock, block.span, |this| {
                    this.visit_stmts(&block.body.stmts);
                });
            }
            _ => {}
        }
    }

    fn visit_prop_name(&mut self, key: &PropName) {
        if let PropName::Computed(computed) = key {
            self.visit_expr(&computed.expr);
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) => self.reference(ident, ReferenceShape::Identifier),
            Expr::Arrow(arrow) => self.visit_arrow_expr(arrow),
            Expr::Fn(fn_expr) => self.visit_function(&fn_expr.function, fn_expr.ident.as_ref()),
            Expr::Class(class_expr) => {
                self.visit_class(&class_expr.class, class_expr.ident.as_ref())
            }
            Expr::Call(call) => {
                if let Some(callee) = call.callee.as_expr() {
                    self.visit_callee(callee);
                }
                for arg in &call.args {
                    self.visit_expr(&arg.expr);
                }
                if let Some(type_args) = &call.type_args {
                    for arg in &type_args.params {
                        self.visit_ts_type(arg);
                    }
                }
            }
            Expr::New(new_expr) => {
                self.visit_callee(&new_expr.callee);
                for arg in new_expr.args.iter().flatten() {
                    self.visit_expr(&arg.expr);
                }
                if let Some(type_args) = &new_expr.type_args {
                    for arg in &type_args.params {
                        self.visit_ts_type(arg);
                    }
                }
            }
            Expr::Member(member) => self.visit_member(&member.obj, &member.prop),
            Expr::SuperProp(super_prop) => {
                if let swc_ecma_ast::SuperProp::Computed(computed) = &super_prop.prop {
                    self.visit_expr(&computed.expr);
                }
            }
            Expr::OptChain(opt_chain) => self.visit_opt_chain(opt_chain),
            Expr::Array(arr) => {
                for elem in arr.elems.iter().flatten() {
                    self.visit_expr(&elem.expr);
                }
            }
            Expr::Object(obj) => {
                for prop in &obj.props {
                    match prop {
                        PropOrSpread::Spread(spread) => self.visit_expr(&spread.expr),
                        PropOrSpread::Prop(prop) => self.visit_prop(prop),
                    }
                }
            }
            Expr::Assign(assign) => {
                match &assign.left {
                    swc_ecma_ast::AssignTarget::Simple(simple) => {
                        self.visit_simple_assign_target(simple)
                    }
                    swc_ecma_ast::AssignTarget::Pat(pat) => match pat {
                        swc_ecma_ast::AssignTargetPat::Array(array) => {
                            for elem in array.elems.iter().flatten() {
                                self.visit_pat_target(elem);
                            }
                        }
                        swc_ecma_ast::AssignTargetPat::Object(object) => {
                            self.visit_object_pat_target(&object.props)
                        }
                        swc_ecma_ast::AssignTargetPat::Invalid(_) => {}
                    },
                }
                self.visit_expr(&assign.right);
            }
            Expr::Update(update) => self.visit_expr(&update.arg),
            Expr::Unary(unary) => self.visit_expr(&unary.arg),
            Expr::Bin(bin) => {
                self.visit_expr(&bin.left);
                self.visit_expr(&bin.right);
            }
            Expr::Cond(cond) => {
                self.visit_expr(&cond.test);
                self.visit_expr(&cond.cons);
                self.visit_expr(&cond.alt);
            }
            Expr::Seq(seq) => {
                for expr in &seq.exprs {
                    self.visit_expr(expr);
                }
            }
            Expr::Paren(paren) => self.visit_expr(&paren.expr),
            Expr::Tpl(tpl) => {
                for expr in &tpl.exprs {
                    self.visit_expr(expr);
                }
            }
            Expr::TaggedTpl(tagged) => {
                self.visit_callee(&tagged.tag);
                for expr in &tagged.tpl.exprs {
                    self.visit_expr(expr);
                }
            }
            Expr::Yield(yield_expr) => {
                if let Some(arg) = &yield_expr.arg {
                    self.visit_expr(arg);
                }
            }
            Expr::Await(await_expr) => self.visit_expr(&await_expr.arg),
            Expr::TsAs(ts_as) => {
                self.visit_expr(&ts_as.expr);
                self.visit_ts_type(&ts_as.type_ann);
            }
            Expr::TsTypeAssertion(assertion) => {
                self.visit_expr(&assertion.expr);
                self.visit_ts_type(&assertion.type_ann);
            }
            Expr::TsSatisfies(satisfies) => {
                self.visit_expr(&satisfies.expr);
                self.visit_ts_type(&satisfies.type_ann);
            }
            Expr::TsInstantiation(inst) => {
                self.visit_expr(&inst.expr);
                for arg in &inst.type_args.params {
                    self.visit_ts_type(arg);
                }
            }
            Expr::TsNonNull(non_null) => self.visit_expr(&non_null.expr),
            Expr::TsConstAssertion(const_assert) => self.visit_expr(&const_assert.expr),
            Expr::JSXElement(element) => self.visit_jsx_element(element),
            Expr::JSXFragment(fragment) => self.visit_jsx_children(&fragment.children),
            _ => {}
        }
    }

    fn visit_callee(&mut self, callee: &Expr) {
        if let Expr::Ident(ident) = callee {
            self.reference(ident, ReferenceShape::Call);
        } else {
            self.visit_expr(callee);
        }
    }

    fn visit_opt_chain(&mut self, opt_chain: &OptChainExpr) {
        match &*opt_chain.base {
            OptChainBase::Member(member) => self.visit_member(&member.obj, &member.prop),
            OptChainBase::Call(call) => {
                self.visit_callee(&call.callee);
                for arg in &call.args {
                    self.visit_expr(&arg.expr);
                }
            }
        }
    }

    fn visit_member(&mut self, obj: &Expr, prop: &MemberProp) {
        if let Expr::Ident(ident) = obj {
            self.reference(ident, ReferenceShape::Receiver);
        } else {
            self.visit_expr(obj);
        }
        if let MemberProp::Computed(computed) = prop {
            self.visit_expr(&computed.expr);
        }
    }

    fn visit_prop(&mut self, prop: &Prop) {
        match prop {
            Prop::Shorthand(ident) => self.reference(ident, ReferenceShape::Identifier),
            Prop::KeyValue(kv) => {
                self.visit_prop_name(&kv.key);
                self.visit_expr(&kv.value);
            }
            Prop::Assign(assign) => self.visit_expr(&assign.value),
            Prop::Method(method) => {
                self.visit_prop_name(&method.key);
                self.visit_function(&method.function, None);
            }
            Prop::Getter(getter) => {
                self.visit_prop_name(&getter.key);
                if let Some(body) = &getter.body {
                    self.in_scope(ScopeKind::Function, getter.span, |this| {
                        this.visit_stmts(&body.stmts);
                    });
                }
            }
            Prop::Setter(setter) => {
                self.visit_prop_name(&setter.key);
                if let Some(body) = &setter.body {
                    self.in_scope(ScopeKind::Function, setter.span, |this| {
                        this.declare_pat(&setter.param, BindingKind::Parameter, false);
                        this.visit_stmts(&body.stmts);
                    });
                }
            }
        }
    }

    fn visit_simple_assign_target(&mut self, target: &swc_ecma_ast::SimpleAssignTarget) {
        use swc_ecma_ast::SimpleAssignTarget;

        match target {
            SimpleAssignTarget::Ident(binding) => {
                self.reference(&binding.id, ReferenceShape::Identifier)
            }
            SimpleAssignTarget::Member(member) => self.visit_member(&member.obj, &member.prop),
            SimpleAssignTarget::Paren(paren) => self.visit_expr(&paren.expr),
            SimpleAssignTarget::TsAs(ts_as) => self.visit_expr(&ts_as.expr),
            SimpleAssignTarget::TsSatisfies(satisfies) => self.visit_expr(&satisfies.expr),
            SimpleAssignTarget::TsNonNull(non_null) => self.visit_expr(&non_null.expr),
            SimpleAssignTarget::TsTypeAssertion(assertion) => self.visit_expr(&assertion.expr),
            SimpleAssignTarget::TsInstantiation(inst) => self.visit_expr(&inst.expr),
            SimpleAssignTarget::OptChain(opt_chain) => self.visit_opt_chain(opt_chain),
            SimpleAssignTarget::SuperProp(_) | SimpleAssignTarget::Invalid(_) => {}
        }
    }

    /// A pattern in assignment position: its identifiers are references, not
    /// bindings.
    fn visit_pat_target(&mut self, pat: &Pat) {
        match pat {
            Pat::Ident(binding) => self.reference(&binding.id, ReferenceShape::Identifier),
            Pat::Array(array) => {
                for elem in array.elems.iter().flatten() {
                    self.visit_pat_target(elem);
                }
            }
            Pat::Object(object) => self.visit_object_pat_target(&object.props),
            Pat::Rest(rest) => self.visit_pat_target(&rest.arg),
            Pat::Assign(assign) => {
                self.visit_pat_target(&assign.left);
                self.visit_expr(&assign.right);
            }
            Pat::Expr(expr) => self.visit_expr(expr),
            Pat::Invalid(_) => {}
        }
    }

    fn visit_object_pat_target(&mut self, props: &[ObjectPatProp]) {
        for prop in props {
            match prop {
                ObjectPatProp::KeyValue(kv) => {
                    self.visit_prop_name(&kv.key);
                    self.visit_pat_target(&kv.value);
                }
                ObjectPatProp::Assign(assign) => {
                    self.reference(&assign.key.id, ReferenceShape::Identifier);
                    if let Some(value) = &assign.value {
                        self.visit_expr(value);
                    }
                }
                ObjectPatProp::Rest(rest) => self.visit_pat_target(&rest.arg),
            }
        }
    }

    /// Declares every name bound by `pat`, visiting defaults and annotations.
    fn declare_pat(&mut self, pat: &Pat, kind: BindingKind, hoisted: bool) {
        match pat {
            Pat::Ident(binding) => {
                self.declare_with(&binding.id, kind, hoisted, None, false);
                if let Some(type_ann) = &binding.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            Pat::Array(array) => {
                for elem in array.elems.iter().flatten() {
                    self.declare_pat(elem, kind, hoisted);
                }
                if let Some(type_ann) = &array.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            Pat::Object(object) => {
                for prop in &object.props {
                    match prop {
                        ObjectPatProp::KeyValue(kv) => {
                            self.visit_prop_name(&kv.key);
                            self.declare_pat(&kv.value, kind, hoisted);
                        }
                        ObjectPatProp::Assign(assign) => {
                            self.declare_with(&assign.key.id, kind, hoisted, None, false);
                            if let Some(value) = &assign.value {
                                self.visit_expr(value);
                            }
                        }
                        ObjectPatProp::Rest(rest) => self.declare_pat(&rest.arg, kind, hoisted),
                    }
                }
                if let Some(type_ann) = &object.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            Pat::Rest(rest) => {
                self.declare_pat(&rest.arg, kind, hoisted);
                if let Some(type_ann) = &rest.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            Pat::Assign(assign) => {
                self.declare_pat(&assign.left, kind, hoisted);
                self.visit_expr(&assign.right);
            }
            Pat::Invalid(_) | Pat::Expr(_) => {}
        }
    }

    /// Type annotations and defaults of an overload signature's parameters.
    fn visit_pat_types(&mut self, pat: &Pat) {
        match pat {
            Pat::Ident(binding) => {
                if let Some(type_ann) = &binding.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            Pat::Array(array) => {
                if let Some(type_ann) = &array.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            Pat::Object(object) => {
                if let Some(type_ann) = &object.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            Pat::Rest(rest) => {
                if let Some(type_ann) = &rest.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            Pat::Assign(assign) => {
                self.visit_pat_types(&assign.left);
                self.visit_expr(&assign.right);
            }
            Pat::Invalid(_) | Pat::Expr(_) => {}
        }
    }

    fn visit_jsx_element(&mut self, element: &JSXElement) {
        let opening = &element.opening;
        match &opening.name {
            // Lowercase tags are intrinsic elements, not bindings
            JSXElementName::Ident(ident) if is_component_name(&ident.sym) => {
                self.reference(ident, ReferenceShape::Markup);
            }
            JSXElementName::JSXMemberExpr(member) => self.visit_jsx_member_expr(member),
            _ => {}
        }

        for attr in &opening.attrs {
            match attr {
                JSXAttrOrSpread::JSXAttr(attr) => match &attr.value {
                    Some(JSXAttrValue::JSXExprContainer(container)) => {
                        self.visit_jsx_expr(&container.expr)
                    }
                    Some(JSXAttrValue::JSXElement(element)) => self.visit_jsx_element(element),
                    Some(JSXAttrValue::JSXFragment(fragment)) => {
                        self.visit_jsx_children(&fragment.children)
                    }
                    _ => {}
                },
                JSXAttrOrSpread::SpreadElement(spread) => self.visit_expr(&spread.expr),
            }
        }

        if let Some(type_args) = &opening.type_args {
            for arg in &type_args.params {
                self.visit_ts_type(arg);
            }
        }

        self.visit_jsx_children(&element.children);
    }

    fn visit_jsx_member_expr(&mut self, member: &JSXMemberExpr) {
        match &member.obj {
            JSXObject::Ident(ident) => self.reference(ident, ReferenceShape::Markup),
            JSXObject::JSXMemberExpr(nested) => self.visit_jsx_member_expr(nested),
        }
    }

    fn visit_jsx_children(&mut self, children: &[JSXElementChild]) {
        for child in children {
            match child {
                JSXElementChild::JSXExprContainer(container) => {
                    self.visit_jsx_expr(&container.expr)
                }
                JSXElementChild::JSXSpreadChild(spread) => self.visit_expr(&spread.expr),
                JSXElementChild::JSXElement(element) => self.visit_jsx_element(element),
                JSXElementChild::JSXFragment(fragment) => {
                    self.visit_jsx_children(&fragment.children)
                }
                JSXElementChild::JSXText(_) => {}
            }
        }
    }

    fn visit_jsx_expr(&mut self, expr: &JSXExpr) {
        if let JSXExpr::Expr(expr) = expr {
            self.visit_expr(expr);
        }
    }

    fn visit_ts_type(&mut self, ts_type: &TsType) {
        use swc_ecma_ast::{TsFnOrConstructorType, TsTypeQueryExpr, TsUnionOrIntersectionType};

        match ts_type {
            TsType::TsTypeRef(type_ref) => {
                self.visit_ts_entity_name(&type_ref.type_name);
                if let Some(type_params) = &type_ref.type_params {
                    for param in &type_params.params {
                        self.visit_ts_type(param);
                    }
                }
            }
            TsType::TsTypeQuery(query) => {
                if let TsTypeQueryExpr::TsEntityName(entity) = &query.expr_name {
                    self.visit_ts_entity_name(entity);
                }
            }
            TsType::TsArrayType(arr) => self.visit_ts_type(&arr.elem_type),
            TsType::TsTupleType(tuple) => {
                for elem in &tuple.elem_types {
                    self.visit_ts_type(&elem.ty);
                }
            }
            TsType::TsUnionOrIntersectionType(union_or_intersection) => {
                let types = match union_or_intersection {
                    TsUnionOrIntersectionType::TsUnionType(union) => &union.types,
                    TsUnionOrIntersectionType::TsIntersectionType(intersection) => {
                        &intersection.types
                    }
                };
                for ty in types {
                    self.visit_ts_type(ty);
                }
            }
            TsType::TsParenthesizedType(paren) => self.visit_ts_type(&paren.type_ann),
            TsType::TsOptionalType(opt) => self.visit_ts_type(&opt.type_ann),
            TsType::TsRestType(rest) => self.visit_ts_type(&rest.type_ann),
            TsType::TsTypeOperator(op) => self.visit_ts_type(&op.type_ann),
            TsType::TsIndexedAccessType(indexed) => {
                self.visit_ts_type(&indexed.obj_type);
                self.visit_ts_type(&indexed.index_type);
            }
            TsType::TsConditionalType(cond) => {
                self.visit_ts_type(&cond.check_type);
                self.visit_ts_type(&cond.extends_type);
                self.visit_ts_type(&cond.true_type);
                self.visit_ts_type(&cond.false_type);
            }
            TsType::TsMappedType(mapped) => {
                if let Some(constraint) = &mapped.type_param.constraint {
                    self.visit_ts_type(constraint);
                }
                if let Some(name_type) = &mapped.name_type {
                    self.visit_ts_type(name_type);
                }
                if let Some(type_ann) = &mapped.type_ann {
                    self.visit_ts_type(type_ann);
                }
            }
            TsType::TsTypeLit(type_lit) => {
                for member in &type_lit.members {
                    self.visit_ts_type_element(member);
                }
            }
            TsType::TsFnOrConstructorType(fn_or_ctor) => {
                let (params, type_ann) = match fn_or_ctor {
                    TsFnOrConstructorType::TsFnType(fn_type) => {
                        (&fn_type.params, &fn_type.type_ann)
                    }
                    TsFnOrConstructorType::TsConstructorType(ctor_type) => {
                        (&ctor_type.params, &ctor_type.type_ann)
                    }
                };
                for param in params {
                    self.visit_ts_fn_param(param);
                }
                self.visit_ts_type(&type_ann.type_ann);
            }
            _ => {}
        }
    }

    fn visit_ts_entity_name(&mut self, entity_name: &TsEntityName) {
        match entity_name {
            TsEntityName::Ident(ident) => self.reference(ident, ReferenceShape::Type),
            // `A.B.C` only names the leftmost binding
            TsEntityName::TsQualifiedName(qualified) => self.visit_ts_entity_name(&qualified.left),
        }
    }

    fn visit_ts_type_element(&mut self, element: &TsTypeElement) {
        match element {
            TsTypeElement::TsPropertySignature(prop) => {
                if prop.computed {
                    self.visit_expr(&prop.key);
                }
                if let Some(type_ann) = &prop.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            TsTypeElement::TsMethodSignature(method) => {
                if method.computed {
                    self.visit_expr(&method.key);
                }
                for param in &method.params {
                    self.visit_ts_fn_param(param);
                }
                if let Some(type_ann) = &method.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            TsTypeElement::TsIndexSignature(index) => {
                if let Some(type_ann) = &index.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            TsTypeElement::TsCallSignatureDecl(call) => {
                for param in &call.params {
                    self.visit_ts_fn_param(param);
                }
                if let Some(type_ann) = &call.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            TsTypeElement::TsConstructSignatureDecl(ctor) => {
                for param in &ctor.params {
                    self.visit_ts_fn_param(param);
                }
                if let Some(type_ann) = &ctor.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            TsTypeElement::TsGetterSignature(getter) => {
                if getter.computed {
                    self.visit_expr(&getter.key);
                }
                if let Some(type_ann) = &getter.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            TsTypeElement::TsSetterSignature(setter) => {
                if setter.computed {
                    self.visit_expr(&setter.key);
                }
                self.visit_ts_fn_param(&setter.param);
            }
        }
    }

    fn visit_ts_fn_param(&mut self, param: &TsFnParam) {
        let type_ann = match param {
            TsFnParam::Ident(ident) => &ident.type_ann,
            TsFnParam::Array(arr) => &arr.type_ann,
            TsFnParam::Object(obj) => &obj.type_ann,
            TsFnParam::Rest(rest) => &rest.type_ann,
        };
        if let Some(type_ann) = type_ann {
            self.visit_ts_type(&type_ann.type_ann);
        }
    }

    fn visit_ts_type_param_decl(&mut self, decl: &TsTypeParamDecl) {
        for param in &decl.params {
            if let Some(constraint) = &param.constraint {
                self.visit_ts_type(constraint);
            }
            if let Some(default) = &param.default {
                self.visit_ts_type(default);
            }
        }
    }
}

/// Names a `export <decl>` statement adds to the module's export set.
fn exported_names(decl: &Decl) -> Vec<&str> {
    match decl {
        Decl::Var(var_decl) => var_decl
            .decls
            .iter()
            .filter_map(|d| d.name.as_ident().map(|b| b.id.sym.as_str()))
            .collect(),
        Decl::Fn(fn_decl) => vec![fn_decl.ident.sym.as_str()],
        Decl::Class(class_decl) => vec![class_decl.ident.sym.as_str()],
        Decl::TsInterface(interface) => vec![interface.id.sym.as_str()],
        Decl::TsTypeAlias(alias) => vec![alias.id.sym.as_str()],
        Decl::TsEnum(ts_enum) => vec![ts_enum.id.sym.as_str()],
        Decl::TsModule(ts_module) => match &ts_module.id {
            TsModuleName::Ident(ident) => vec![ident.sym.as_str()],
            TsModuleName::Str(_) => Vec::new(),
        },
        Decl::Using(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::semantic::scope::ScopeTree;

    #[derive(Default)]
    struct EventLog {
        tree: ScopeTree,
        scopes: Vec<ScopeKind>,
        bindings: Vec<(String, BindingKind, bool)>,
        references: Vec<(String, ReferenceShape)>,
        exports: Vec<String>,
        imports: Vec<String>,
    }

    impl Pass for EventLog {
        fn open_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>, span: Span) -> ScopeId {
            self.scopes.push(kind);
            self.tree.create_scope(kind, parent, span)
        }

        fn declare(&mut self, binding: Binding<'_>) {
            self.bindings
                .push((binding.name.to_string(), binding.kind, binding.site.is_some()));
        }

        fn reference(&mut self, ident: &Ident, _scope: ScopeId, shape: ReferenceShape) {
            self.references.push((ident.sym.to_string(), shape));
        }

        fn export_name(&mut self, name: &str) {
            self.exports.push(name.to_string());
        }

        fn import_name(&mut self, name: &str) {
            self.imports.push(name.to_string());
        }
    }

    fn walk(code: &str, filename: &str) -> EventLog {
        let tree = parse(filename, code).expect("parse failed");
        let mut log = EventLog::default();
        walk_module(tree.module(), &mut log);
        log
    }

    fn binding<'a>(log: &'a EventLog, name: &str) -> Option<&'a (String, BindingKind, bool)> {
        log.bindings.iter().find(|(n, _, _)| n == name)
    }

    #[test]
    fn declaration_site_is_not_a_reference() {
        let log = walk("const unused = 5;", "test.js");

        assert_eq!(
            log.bindings,
            vec![("unused".to_string(), BindingKind::Variable, true)]
        );
        assert!(log.references.is_empty());
    }

    #[test]
    fn call_and_receiver_shapes() {
        let log = walk("const obj = {}; function f() {} f(); obj.method();", "test.js");

        assert!(log
            .references
            .contains(&("f".to_string(), ReferenceShape::Call)));
        assert!(log
            .references
            .contains(&("obj".to_string(), ReferenceShape::Receiver)));
        assert!(!log.references.iter().any(|(n, _)| n == "method"));
    }

    #[test]
    fn destructuring_binds_untracked_patterns() {
        let log = walk("const { a, b: renamed } = source; const [x] = list;", "test.js");

        assert_eq!(binding(&log, "a").map(|b| b.1), Some(BindingKind::Pattern));
        assert_eq!(binding(&log, "renamed").map(|b| b.1), Some(BindingKind::Pattern));
        assert_eq!(binding(&log, "x").map(|b| b.1), Some(BindingKind::Pattern));
        assert!(log.references.contains(&("source".to_string(), ReferenceShape::Identifier)));
    }

    #[test]
    fn function_scopes_and_parameters() {
        let log = walk("function add(a, b) { return a + b; }", "test.js");

        assert_eq!(log.scopes, vec![ScopeKind::Module, ScopeKind::Function]);
        assert_eq!(binding(&log, "add").map(|b| b.1), Some(BindingKind::Function));
        assert_eq!(binding(&log, "a").map(|b| b.1), Some(BindingKind::Parameter));
        assert_eq!(log.references.len(), 2);
    }

    #[test]
    fn jsx_tags_reference_components() {
        let code = r#"
function Button() { return <button>ok</button>; }
const App = () => <div><Button /><Layout.Header /></div>;
"#;
        let log = walk(code, "app.jsx");

        assert_eq!(binding(&log, "Button").map(|b| b.1), Some(BindingKind::Component));
        assert_eq!(binding(&log, "App").map(|b| b.1), Some(BindingKind::Component));
        assert!(log.references.contains(&("Button".to_string(), ReferenceShape::Markup)));
        assert!(log.references.contains(&("Layout".to_string(), ReferenceShape::Markup)));
        assert!(!log.references.iter().any(|(n, _)| n == "div" || n == "button"));
    }

    #[test]
    fn capitalized_without_markup_is_plain_variable() {
        let log = walk("const Config = { debug: true };", "test.js");

        assert_eq!(binding(&log, "Config").map(|b| b.1), Some(BindingKind::Variable));
    }

    #[test]
    fn exports_and_imports_are_reported() {
        let code = r#"
import { helper, other as alias } from './helpers';
import Default from './default';
export const value = helper();
export function run() {}
const local = 1;
export { local as renamed };
"#;
        let log = walk(code, "test.js");

        assert_eq!(log.imports, vec!["helper", "alias"]);
        assert_eq!(log.exports, vec!["value", "run", "renamed"]);
        assert_eq!(binding(&log, "Default").map(|b| b.1), Some(BindingKind::Import));
        assert!(log.references.contains(&("local".to_string(), ReferenceShape::Export)));
        // Exported declarations carry no rewrite site
        assert_eq!(binding(&log, "value").map(|b| b.2), Some(false));
    }

    #[test]
    fn loop_heads_are_untracked() {
        let log = walk("for (const item of items) { use(item); }", "test.js");

        assert_eq!(binding(&log, "item").map(|b| b.1), Some(BindingKind::Pattern));
        assert_eq!(log.scopes, vec![ScopeKind::Module, ScopeKind::For, ScopeKind::Block]);
    }

    #[test]
    fn named_function_expression_binds_inside() {
        let log = walk("const run = function loop() { loop(); };", "test.js");

        assert_eq!(
            binding(&log, "loop").map(|b| b.1),
            Some(BindingKind::ExpressionName)
        );
    }

    #[test]
    fn type_references_are_reported() {
        let code = "const defaults = { a: 1 };\ntype Options = typeof defaults;\nlet x: Options;";
        let log = walk(code, "test.ts");

        assert!(log.references.contains(&("defaults".to_string(), ReferenceShape::Type)));
        assert!(log.references.contains(&("Options".to_string(), ReferenceShape::Type)));
        assert_eq!(binding(&log, "Options").map(|b| b.1), Some(BindingKind::TypeOnly));
    }
    fn referenced(log: &EventLog, name: &str) -> bool {
        log.references.iter().any(|(n, _)| n == name)
    }

    #[test]
    fn namespace_bodies_are_walked() {
        let code = "const helper = 1;\nnamespace NS {\n  const local = 2;\n  export const v = helper + local;\n}";
        let log = walk(code, "test.ts");

        assert!(referenced(&log, "helper"));
        assert!(referenced(&log, "local"));
        assert_eq!(log.scopes, vec![ScopeKind::Module, ScopeKind::Namespace]);
        assert_eq!(binding(&log, "NS").map(|b| b.1), Some(BindingKind::TypeOnly));
        assert_eq!(binding(&log, "local").map(|b| b.2), Some(true));
        // Namespace members are not module exports
        assert!(log.exports.is_empty());
    }

    #[test]
    fn dotted_namespace_nests_scopes() {
        let log = walk("export namespace A.B {\n  export const c = seed;\n}", "test.ts");

        assert!(referenced(&log, "seed"));
        assert_eq!(log.exports, vec!["A"]);
        assert_eq!(
            log.scopes,
            vec![ScopeKind::Module, ScopeKind::Namespace, ScopeKind::Namespace]
        );
    }

    #[test]
    fn ambient_module_bindings_are_untracked() {
        let code = "declare module \"lib\" {\n  export function load(): Item;\n  let cache: number;\n}";
        let log = walk(code, "test.d.ts");

        assert!(referenced(&log, "Item"));
        assert_eq!(
            binding(&log, "load").map(|b| (b.1, b.2)),
            Some((BindingKind::TypeOnly, false))
        );
        assert_eq!(
            binding(&log, "cache").map(|b| (b.1, b.2)),
            Some((BindingKind::TypeOnly, false))
        );
    }

    #[test]
    fn mapped_type_constraint_is_a_reference() {
        let code = "const config = { a: 1 };\ntype Flags = { [K in keyof typeof config]: boolean };";
        let log = walk(code, "test.ts");

        assert!(log.references.contains(&("config".to_string(), ReferenceShape::Type)));
    }

    #[test]
    fn computed_signature_keys_are_references() {
        let code = "const KEY = 'k';\nconst METHOD = 'm';\ninterface Shape {\n  [KEY]: string;\n  [METHOD](): void;\n}";
        let log = walk(code, "test.ts");

        assert!(referenced(&log, "KEY"));
        assert!(referenced(&log, "METHOD"));
    }

    #[test]
    fn auto_accessor_values_and_keys_are_references() {
        let code = "const seed = 1;\nconst slot = 'n';\nclass Counter {\n  accessor value: Seed = seed;\n  accessor [slot] = 0;\n}";
        let log = walk(code, "test.ts");

        assert!(referenced(&log, "seed"));
        assert!(referenced(&log, "slot"));
        assert!(log.references.contains(&("Seed".to_string(), ReferenceShape::Type)));
    }
}
