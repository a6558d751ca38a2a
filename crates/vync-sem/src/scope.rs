//! Lexical scope stack for name resolution.
//!
//! Scopes form a strict stack: blocks, function bodies and `for` headers
//! push on entry and pop on exit. Symbol tables use `IndexMap` so
//! iteration (and therefore any derived diagnostics) stays in insertion
//! order.

use indexmap::IndexMap;

use vync_par::TypeExpr;

/// What a name refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    /// A variable or parameter.
    Variable,
    /// A function.
    Function,
    /// A type (struct, class, enum, alias, template, trait).
    Type,
}

/// One entry in a scope's symbol table.
#[derive(Clone, Debug)]
pub struct SymbolInfo {
    /// The declared name.
    pub name: String,
    /// What kind of thing the name denotes.
    pub kind: SymbolKind,
    /// True for `const` declarations.
    pub is_const: bool,
    /// Declared type, when one was written. Cloned out of the AST because
    /// table entries can outlive the declaring node's borrow.
    pub ty: Option<TypeExpr>,
}

/// A stack of lexical scopes.
///
/// The bottom scope is the module scope; it exists for the lifetime of
/// the stack. Declaring a name never shadow-checks; lookup walks from
/// the innermost scope outward.
#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<IndexMap<String, SymbolInfo>>,
}

impl ScopeStack {
    /// Creates a stack holding only the module scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![IndexMap::new()],
        }
    }

    /// Pushes a fresh scope.
    pub fn enter(&mut self) {
        self.scopes.push(IndexMap::new());
    }

    /// Pops the innermost scope. The module scope is never popped.
    pub fn exit(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Declares a name in the innermost scope, replacing any previous
    /// entry with the same name there.
    pub fn declare(&mut self, symbol: SymbolInfo) {
        let top = self.scopes.last_mut().expect("stack always has a scope");
        top.insert(symbol.name.clone(), symbol);
    }

    /// Resolves a name, innermost scope first.
    pub fn lookup(&self, name: &str) -> Option<&SymbolInfo> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Resolves a name in the innermost scope only.
    pub fn lookup_local(&self, name: &str) -> Option<&SymbolInfo> {
        self.scopes.last().and_then(|scope| scope.get(name))
    }

    /// Current nesting depth (1 = module scope only).
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
