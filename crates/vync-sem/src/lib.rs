//! vync-sem - Semantic analysis for the Vyn language.
//!
//! A visitor-driven walk over the parsed module that maintains a stack of
//! lexical scopes, an "inside unsafe" flag and an "inside loop" flag, and
//! accumulates diagnostics. The analyzer never aborts: every rule
//! violation becomes one diagnostic and the walk continues, so a single
//! run reports everything it can find, in source order.
//!
//! The central invariant is the pointer-safety rule. Three expression
//! forms are legal only inside an `unsafe` block:
//!
//! - `at(p)` - pointer dereference
//! - `addr(l)` - taking the address of a location
//! - `from<T>(n)` - casting an integer to a location
//!
//! `loc(e)` is always permitted; its safety is deferred to the
//! dereference site.
//!
//! # Example
//!
//! ```
//! use vync_lex::lex;
//! use vync_par::parse;
//! use vync_sem::analyze;
//!
//! let source = "fn f() { unsafe { p = at(q); } }";
//! let module = parse(lex(source, "ok.vyn"), "ok.vyn").unwrap();
//! assert!(analyze(&module).is_empty());
//! ```

pub mod scope;

#[cfg(test)]
mod edge_cases;

use vync_par::ast::{
    walk_decl, walk_expr, walk_stmt, Decl, DeclKind, Expr, ExprKind, Module, Stmt, StmtKind,
    Visitor,
};
use vync_util::{Diagnostic, SourceLocation};

pub use scope::{ScopeStack, SymbolInfo, SymbolKind};

/// Runs semantic analysis over a module and returns its diagnostics.
///
/// Analysis does not mutate the tree; running it twice yields identical
/// diagnostics.
pub fn analyze(module: &Module) -> Vec<Diagnostic> {
    let mut analyzer = SemanticAnalyzer::new();
    analyzer.visit_module(module);
    let diagnostics = analyzer.into_diagnostics();
    tracing::debug!(count = diagnostics.len(), "semantic analysis finished");
    diagnostics
}

/// The names reserved for memory intrinsics in call position.
const INTRINSIC_NAMES: [&str; 4] = ["loc", "addr", "at", "from"];

/// Returns true when declaring `name` would collide with an intrinsic.
pub fn is_reserved_intrinsic_name(name: &str) -> bool {
    INTRINSIC_NAMES.contains(&name)
}

/// The scoped, visitor-driven analyzer.
///
/// One instance analyzes one module; instances share nothing, so a driver
/// may run several in parallel on independent inputs.
pub struct SemanticAnalyzer {
    /// Lexical scope stack (module scope at the bottom).
    scopes: ScopeStack,
    /// True while visiting the body of an `unsafe` block.
    in_unsafe: bool,
    /// True while visiting a loop body; reserved for break/continue
    /// placement checks.
    in_loop: bool,
    /// Collected diagnostics in source order.
    diagnostics: Vec<Diagnostic>,
}

impl SemanticAnalyzer {
    /// Creates an analyzer with an empty module scope.
    pub fn new() -> Self {
        Self {
            scopes: ScopeStack::new(),
            in_unsafe: false,
            in_loop: false,
            diagnostics: Vec::new(),
        }
    }

    /// Consumes the analyzer, yielding its diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// True while the current node is lexically inside an unsafe block.
    pub fn in_unsafe_block(&self) -> bool {
        self.in_unsafe
    }

    /// True while the current node is inside a loop body.
    pub fn in_loop(&self) -> bool {
        self.in_loop
    }

    fn report(&mut self, message: impl Into<String>, loc: &SourceLocation) {
        self.diagnostics.push(Diagnostic::error(message, loc.clone()));
    }

    /// Flags declarations whose name collides with a reserved intrinsic.
    /// The declaration still proceeds.
    fn check_reserved_name(&mut self, what: &str, name: &str, loc: &SourceLocation) {
        if is_reserved_intrinsic_name(name) {
            self.report(
                format!(
                    "{what} name '{name}' conflicts with a reserved intrinsic function name"
                ),
                loc,
            );
        }
    }

    fn declare_variable(&mut self, name: &str, is_const: bool, ty: Option<&vync_par::TypeExpr>) {
        self.scopes.declare(SymbolInfo {
            name: name.to_string(),
            kind: SymbolKind::Variable,
            is_const,
            ty: ty.cloned(),
        });
    }

    /// Visits a declaration, managing scopes and symbol insertion.
    fn analyze_decl(&mut self, decl: &Decl) {
        match &decl.kind {
            DeclKind::Var(var) => {
                self.check_reserved_name("variable", &var.name, &decl.loc);
                if var.ty.is_none() && var.init.is_none() {
                    self.report(
                        format!(
                            "variable '{}' needs a type annotation or an initializer",
                            var.name
                        ),
                        &decl.loc,
                    );
                }
                // Initializer is analyzed in the enclosing scope, before
                // the name becomes visible.
                walk_decl(self, decl);
                self.declare_variable(&var.name, var.is_const, var.ty.as_ref());
            }
            DeclKind::Fun(fun) => {
                self.check_reserved_name("function", &fun.name, &decl.loc);
                self.scopes.declare(SymbolInfo {
                    name: fun.name.clone(),
                    kind: SymbolKind::Function,
                    is_const: false,
                    ty: fun.return_type.clone(),
                });
                self.scopes.enter();
                for param in &fun.params {
                    self.declare_variable(&param.name, !param.is_mutable, param.ty.as_ref());
                }
                // A function body is its own island: unsafe and loop
                // contexts do not leak in.
                let outer_unsafe = std::mem::replace(&mut self.in_unsafe, false);
                let outer_loop = std::mem::replace(&mut self.in_loop, false);
                walk_decl(self, decl);
                self.in_unsafe = outer_unsafe;
                self.in_loop = outer_loop;
                self.scopes.exit();
            }
            DeclKind::Struct(s) => {
                self.declare_type_symbol(&s.name);
                walk_decl(self, decl);
            }
            DeclKind::Class(c) => {
                self.declare_type_symbol(&c.name);
                self.scopes.enter();
                walk_decl(self, decl);
                self.scopes.exit();
            }
            DeclKind::Enum(e) => {
                self.declare_type_symbol(&e.name);
                walk_decl(self, decl);
            }
            DeclKind::TypeAlias { name, .. } => {
                self.declare_type_symbol(name);
                walk_decl(self, decl);
            }
            DeclKind::Template(t) => {
                self.declare_type_symbol(&t.name);
                self.scopes.enter();
                walk_decl(self, decl);
                self.scopes.exit();
            }
            DeclKind::Trait(t) => {
                self.declare_type_symbol(&t.name);
                self.scopes.enter();
                walk_decl(self, decl);
                self.scopes.exit();
            }
            DeclKind::Namespace { .. } => {
                self.scopes.enter();
                walk_decl(self, decl);
                self.scopes.exit();
            }
            DeclKind::Field(_) | DeclKind::Impl(_) | DeclKind::Import { .. } => {
                walk_decl(self, decl);
            }
        }
    }

    fn declare_type_symbol(&mut self, name: &str) {
        self.scopes.declare(SymbolInfo {
            name: name.to_string(),
            kind: SymbolKind::Type,
            is_const: false,
            ty: None,
        });
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Visitor for SemanticAnalyzer {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Block(_) => {
                self.scopes.enter();
                walk_stmt(self, stmt);
                self.scopes.exit();
            }
            StmtKind::Unsafe(body) => {
                let outer = std::mem::replace(&mut self.in_unsafe, true);
                self.visit_stmt(body);
                self.in_unsafe = outer;
            }
            StmtKind::While { cond, body } => {
                self.visit_expr(cond);
                let outer = std::mem::replace(&mut self.in_loop, true);
                self.visit_stmt(body);
                self.in_loop = outer;
            }
            StmtKind::For { init, cond, update, body } => {
                // The for header introduces its own scope.
                self.scopes.enter();
                if let Some(init) = init {
                    self.visit_stmt(init);
                }
                if let Some(cond) = cond {
                    self.visit_expr(cond);
                }
                if let Some(update) = update {
                    self.visit_expr(update);
                }
                let outer = std::mem::replace(&mut self.in_loop, true);
                self.visit_stmt(body);
                self.in_loop = outer;
                self.scopes.exit();
            }
            StmtKind::Try { body, catch, finally } => {
                self.visit_stmt(body);
                if let Some(clause) = catch {
                    self.scopes.enter();
                    if let Some(binding) = &clause.binding {
                        self.declare_variable(binding, false, clause.binding_type.as_ref());
                    }
                    if let Some(ty) = &clause.binding_type {
                        self.visit_type(ty);
                    }
                    self.visit_stmt(&clause.body);
                    self.scopes.exit();
                }
                if let Some(finally) = finally {
                    self.visit_stmt(finally);
                }
            }
            _ => walk_stmt(self, stmt),
        }
    }

    fn visit_decl(&mut self, decl: &Decl) {
        self.analyze_decl(decl);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::PointerDeref(_) => {
                if !self.in_unsafe {
                    self.report(
                        "pointer dereference 'at' is only allowed inside an unsafe block",
                        &expr.loc,
                    );
                }
                walk_expr(self, expr);
            }
            ExprKind::AddrOf(_) => {
                if !self.in_unsafe {
                    self.report(
                        "taking an address with 'addr' is only allowed inside an unsafe block",
                        &expr.loc,
                    );
                }
                walk_expr(self, expr);
            }
            ExprKind::FromIntToLoc { .. } => {
                if !self.in_unsafe {
                    self.report(
                        "casting an integer to a location with 'from' is only allowed inside an unsafe block",
                        &expr.loc,
                    );
                }
                walk_expr(self, expr);
            }
            // loc(e) is always permitted; safety attaches to the
            // dereference, not to taking the location.
            ExprKind::LocationOf(_) => walk_expr(self, expr),
            ExprKind::ListComprehension { variable, .. } => {
                self.scopes.enter();
                self.declare_variable(variable, false, None);
                walk_expr(self, expr);
                self.scopes.exit();
            }
            ExprKind::Function { params, .. } => {
                self.scopes.enter();
                for param in params {
                    self.declare_variable(&param.name, !param.is_mutable, param.ty.as_ref());
                }
                let outer_unsafe = std::mem::replace(&mut self.in_unsafe, false);
                walk_expr(self, expr);
                self.in_unsafe = outer_unsafe;
                self.scopes.exit();
            }
            _ => walk_expr(self, expr),
        }
    }
}
