//! AST node definitions for the Vyn language.
//!
//! The tree is a closed set of tagged variants in four categories:
//! expressions, statements, declarations (which are also statements) and
//! type expressions. Every node carries its source location and
//! expressions carry an inferred-type slot that later phases fill.
//!
//! Each parent owns its children; cross-references between a use site and
//! a declaration happen by name resolution, never by shared ownership.
//! Dropping the [`Module`] drops the whole tree.
//!
//! Traversal goes through the [`Visitor`] trait: one `visit_*` method per
//! category, each defaulting to the matching `walk_*` function which does
//! the source-order structural recursion. A visitor overrides the methods
//! it cares about and calls `walk_*` to descend.

use std::fmt;

use vync_lex::Token;
use vync_util::SourceLocation;

// ============================================================================
// MODULE
// ============================================================================

/// The root of a parsed source file. Owns the entire tree.
#[derive(Clone, Debug)]
pub struct Module {
    /// Top-level statements in source order.
    pub body: Vec<Stmt>,
    /// Location of the first token of the file.
    pub loc: SourceLocation,
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

/// An expression node.
#[derive(Clone, Debug)]
pub struct Expr {
    /// Which expression this is.
    pub kind: ExprKind,
    /// Where it starts in the source.
    pub loc: SourceLocation,
    /// Filled by type inference in later phases; `None` out of the parser.
    pub ty: Option<TypeExpr>,
}

impl Expr {
    /// Creates an expression with an empty inferred-type slot.
    pub fn new(kind: ExprKind, loc: SourceLocation) -> Self {
        Self { kind, loc, ty: None }
    }
}

/// One property of an object literal: `key: value`, `key = value` or
/// shorthand `key`.
#[derive(Clone, Debug)]
pub struct ObjectProperty {
    /// Field name.
    pub key: String,
    /// Field value; `None` for the shorthand form.
    pub value: Option<Expr>,
    /// Location of the key.
    pub loc: SourceLocation,
}

/// Expression variants.
#[derive(Clone, Debug)]
pub enum ExprKind {
    /// A name: `total`.
    Identifier(String),
    /// Integer literal.
    Int(i64),
    /// Float literal.
    Float(f64),
    /// String literal (escapes already processed).
    Str(String),
    /// Boolean literal.
    Bool(bool),
    /// `nil` / `null`.
    Nil,
    /// Array literal `[a, b, c]`.
    Array(Vec<Expr>),
    /// Object literal, optionally typed: `Point{x: 1}` or `{x: 1}`.
    Object {
        /// The type path for `T{...}`; `None` for anonymous `{...}`.
        type_path: Option<TypeExpr>,
        /// Fields in source order.
        properties: Vec<ObjectProperty>,
    },
    /// Prefix operation `!x`, `-x`, `~x`.
    Unary {
        /// The operator token (a copy; tokens outlive nothing past parsing).
        op: Token,
        /// Operand.
        operand: Box<Expr>,
    },
    /// Arithmetic/comparison/bitwise/shift/range binary operation.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// The operator token.
        op: Token,
        /// Right operand.
        right: Box<Expr>,
    },
    /// Short-circuiting `&&` / `||`.
    Logical {
        /// Left operand.
        left: Box<Expr>,
        /// The operator token.
        op: Token,
        /// Right operand.
        right: Box<Expr>,
    },
    /// Ternary `cond ? a : b`.
    Conditional {
        /// Condition.
        cond: Box<Expr>,
        /// Value when true.
        then: Box<Expr>,
        /// Value when false.
        otherwise: Box<Expr>,
    },
    /// Comma sequence; the value is the last element.
    Sequence(Vec<Expr>),
    /// Function call `callee(args)`.
    Call {
        /// The callee expression.
        callee: Box<Expr>,
        /// Arguments in source order.
        args: Vec<Expr>,
    },
    /// Member access `object.property`.
    Member {
        /// The accessed object.
        object: Box<Expr>,
        /// Property name.
        property: String,
    },
    /// Array indexing `object[index]`.
    Index {
        /// The indexed object.
        object: Box<Expr>,
        /// Index expression.
        index: Box<Expr>,
    },
    /// Assignment, simple or compound; right-associative.
    Assign {
        /// The assignment target (an l-value).
        target: Box<Expr>,
        /// The operator token (`=`, `+=`, ... , `:=`).
        op: Token,
        /// The assigned value.
        value: Box<Expr>,
    },
    /// `borrow expr` / `view expr`.
    Borrow {
        /// The borrowed place.
        operand: Box<Expr>,
        /// True for `borrow` (mutable), false for `view`.
        mutable: bool,
    },
    /// Pointer dereference `at(p)`; produces an l-value.
    PointerDeref(Box<Expr>),
    /// Address of a location: `addr(l)`.
    AddrOf(Box<Expr>),
    /// Integer-to-location cast `from<T>(n)`.
    FromIntToLoc {
        /// The integer address expression.
        address: Box<Expr>,
        /// The pointed-to type.
        target: TypeExpr,
    },
    /// Location of an expression: `loc(e)`.
    LocationOf(Box<Expr>),
    /// List comprehension `[expr for v in iter if cond]`.
    ListComprehension {
        /// The element expression.
        element: Box<Expr>,
        /// The loop variable name.
        variable: String,
        /// The iterated expression.
        iterable: Box<Expr>,
        /// Optional filter.
        condition: Option<Box<Expr>>,
    },
    /// If-expression; `else` is mandatory.
    If {
        /// Condition.
        cond: Box<Expr>,
        /// Value of the then branch.
        then: Box<Expr>,
        /// Value of the else branch.
        otherwise: Box<Expr>,
    },
    /// Construction `T(args)`.
    Construction {
        /// The constructed type.
        ty: TypeExpr,
        /// Constructor arguments.
        args: Vec<Expr>,
    },
    /// Array initialization `[T; N]()`.
    ArrayInit {
        /// Element type.
        element: TypeExpr,
        /// Size expression.
        size: Box<Expr>,
    },
    /// Explicit generic instantiation of a value: `name<T, U>`.
    GenericInstantiation {
        /// The instantiated expression.
        base: Box<Expr>,
        /// Type arguments.
        args: Vec<TypeExpr>,
    },
    /// Function expression `fn (params) -> T { ... }`.
    Function {
        /// Parameters.
        params: Vec<Param>,
        /// Optional return type.
        return_type: Option<TypeExpr>,
        /// The body block.
        body: Box<Stmt>,
    },
    /// `this`
    This,
    /// `super`
    Super,
    /// `await expr`
    Await(Box<Expr>),
}

// ============================================================================
// STATEMENTS
// ============================================================================

/// A statement node.
#[derive(Clone, Debug)]
pub struct Stmt {
    /// Which statement this is.
    pub kind: StmtKind,
    /// Where it starts.
    pub loc: SourceLocation,
}

impl Stmt {
    /// Creates a statement.
    pub fn new(kind: StmtKind, loc: SourceLocation) -> Self {
        Self { kind, loc }
    }
}

/// The single catch clause of a `try` statement.
#[derive(Clone, Debug)]
pub struct CatchClause {
    /// Bound exception variable, if any.
    pub binding: Option<String>,
    /// Declared type of the binding, if any.
    pub binding_type: Option<TypeExpr>,
    /// The handler block.
    pub body: Box<Stmt>,
    /// Location of the `catch` keyword.
    pub loc: SourceLocation,
}

/// One arm of a `match` statement.
#[derive(Clone, Debug)]
pub struct MatchArm {
    /// The arm pattern (an expression for now; patterns are resolved in
    /// later phases).
    pub pattern: Expr,
    /// Optional `if` guard.
    pub guard: Option<Expr>,
    /// The arm body.
    pub body: Box<Stmt>,
    /// Location of the pattern.
    pub loc: SourceLocation,
}

/// Statement variants. Declarations are statements via [`StmtKind::Decl`].
#[derive(Clone, Debug)]
pub enum StmtKind {
    /// `{ ... }` or an indented block.
    Block(Vec<Stmt>),
    /// An expression in statement position.
    Expr(Expr),
    /// `if (cond) block [else ...]`.
    If {
        /// Condition.
        cond: Expr,
        /// Then branch (a block).
        then: Box<Stmt>,
        /// Else branch: a block or another `if`.
        otherwise: Option<Box<Stmt>>,
    },
    /// `while (cond) block`.
    While {
        /// Condition.
        cond: Expr,
        /// Loop body.
        body: Box<Stmt>,
    },
    /// C-style `for (init; cond; update) block`.
    For {
        /// Initializer; a declaration or expression statement.
        init: Option<Box<Stmt>>,
        /// Loop condition.
        cond: Option<Expr>,
        /// Update expression.
        update: Option<Expr>,
        /// Loop body.
        body: Box<Stmt>,
    },
    /// `return [expr]`.
    Return(Option<Expr>),
    /// `break`.
    Break,
    /// `continue`.
    Continue,
    /// `try block [catch ... block] [finally block]`.
    Try {
        /// The guarded block.
        body: Box<Stmt>,
        /// At most one catch clause survives parsing.
        catch: Option<CatchClause>,
        /// Optional cleanup block.
        finally: Option<Box<Stmt>>,
    },
    /// `throw expr`.
    Throw(Expr),
    /// `unsafe block`.
    Unsafe(Box<Stmt>),
    /// A statement with no effect (`;`, or a lowered `defer`).
    Empty,
    /// `match expr { pattern => body, ... }`.
    Match {
        /// The matched expression.
        scrutinee: Expr,
        /// Arms in source order.
        arms: Vec<MatchArm>,
    },
    /// `yield [expr]`.
    Yield(Option<Expr>),
    /// `assert cond [, message]`.
    Assert {
        /// The asserted condition.
        condition: Expr,
        /// Optional failure message.
        message: Option<Expr>,
    },
    /// `extern` item outside a function modifier position.
    Extern(Box<Decl>),
    /// A declaration in statement position.
    Decl(Decl),
}

// ============================================================================
// DECLARATIONS
// ============================================================================

/// A declaration node.
#[derive(Clone, Debug)]
pub struct Decl {
    /// Which declaration this is.
    pub kind: DeclKind,
    /// Where it starts.
    pub loc: SourceLocation,
}

impl Decl {
    /// Creates a declaration.
    pub fn new(kind: DeclKind, loc: SourceLocation) -> Self {
        Self { kind, loc }
    }

    /// The declared name, where one exists.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            DeclKind::Var(v) => Some(&v.name),
            DeclKind::Fun(f) => Some(&f.name),
            DeclKind::TypeAlias { name, .. } => Some(name),
            DeclKind::Struct(s) => Some(&s.name),
            DeclKind::Class(c) => Some(&c.name),
            DeclKind::Field(f) => Some(&f.name),
            DeclKind::Enum(e) => Some(&e.name),
            DeclKind::Template(t) => Some(&t.name),
            DeclKind::Trait(t) => Some(&t.name),
            DeclKind::Namespace { name, .. } => Some(name),
            DeclKind::Import { .. } | DeclKind::Impl(_) => None,
        }
    }
}

/// A variable declaration in any of the surface syntaxes.
#[derive(Clone, Debug)]
pub struct VarDecl {
    /// Variable name.
    pub name: String,
    /// True for `const` declarations.
    pub is_const: bool,
    /// Declared type; `None` for `auto` and untyped `let`.
    pub ty: Option<TypeExpr>,
    /// Initializer.
    pub init: Option<Expr>,
}

/// A function parameter.
#[derive(Clone, Debug)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Declared type; `None` for bare `self`-style parameters.
    pub ty: Option<TypeExpr>,
    /// False for `const` parameters.
    pub is_mutable: bool,
    /// Optional default value.
    pub default: Option<Expr>,
    /// Location of the parameter.
    pub loc: SourceLocation,
}

/// A function declaration.
#[derive(Clone, Debug)]
pub struct FunDecl {
    /// Function name (`operator+` style names included).
    pub name: String,
    /// Generic parameters.
    pub generics: Vec<GenericParam>,
    /// Parameters in source order.
    pub params: Vec<Param>,
    /// Declared return type; `None` means `Void`.
    pub return_type: Option<TypeExpr>,
    /// Declared thrown error type.
    pub throws: Option<TypeExpr>,
    /// Body block; `None` for forward/extern declarations.
    pub body: Option<Box<Stmt>>,
    /// True for `async fn`.
    pub is_async: bool,
    /// True for `extern fn`.
    pub is_extern: bool,
}

/// A generic parameter with optional bounds: `T: Eq + Ord`.
#[derive(Clone, Debug)]
pub struct GenericParam {
    /// Parameter name.
    pub name: String,
    /// Trait bounds.
    pub bounds: Vec<TypeExpr>,
    /// Location of the name.
    pub loc: SourceLocation,
}

/// A struct declaration.
#[derive(Clone, Debug)]
pub struct StructDecl {
    /// Struct name.
    pub name: String,
    /// Generic parameters.
    pub generics: Vec<GenericParam>,
    /// Field declarations.
    pub fields: Vec<FieldDecl>,
}

/// A field inside a struct or class.
#[derive(Clone, Debug)]
pub struct FieldDecl {
    /// Field name.
    pub name: String,
    /// Declared type.
    pub ty: Option<TypeExpr>,
    /// Optional initializer.
    pub init: Option<Expr>,
    /// Location of the name.
    pub loc: SourceLocation,
}

/// A class declaration: fields plus methods, either block style.
#[derive(Clone, Debug)]
pub struct ClassDecl {
    /// Class name.
    pub name: String,
    /// Generic parameters.
    pub generics: Vec<GenericParam>,
    /// Members in source order (field and function declarations).
    pub members: Vec<Decl>,
}

/// An impl block: `impl Type { ... }` or `impl Trait for Type { ... }`.
#[derive(Clone, Debug)]
pub struct ImplDecl {
    /// The implemented trait, if any.
    pub trait_ref: Option<TypeExpr>,
    /// The implementing type.
    pub self_ty: TypeExpr,
    /// Member functions.
    pub members: Vec<Decl>,
}

/// An enum declaration.
#[derive(Clone, Debug)]
pub struct EnumDecl {
    /// Enum name.
    pub name: String,
    /// Generic parameters.
    pub generics: Vec<GenericParam>,
    /// Variants in source order.
    pub variants: Vec<EnumVariant>,
}

/// One enum variant: unit (`Red`) or tuple (`Some(T)`).
#[derive(Clone, Debug)]
pub struct EnumVariant {
    /// Variant name.
    pub name: String,
    /// Payload types; empty for unit variants.
    pub fields: Vec<TypeExpr>,
    /// Location of the name.
    pub loc: SourceLocation,
}

/// A template declaration (parameterized block of members).
#[derive(Clone, Debug)]
pub struct TemplateDecl {
    /// Template name.
    pub name: String,
    /// Template parameters.
    pub params: Vec<GenericParam>,
    /// The template body block.
    pub body: Box<Stmt>,
}

/// A trait declaration.
#[derive(Clone, Debug)]
pub struct TraitDecl {
    /// Trait name.
    pub name: String,
    /// Generic parameters.
    pub generics: Vec<GenericParam>,
    /// Required members (usually bodiless functions).
    pub members: Vec<Decl>,
}

/// Declaration variants.
#[derive(Clone, Debug)]
pub enum DeclKind {
    /// Variable declaration.
    Var(VarDecl),
    /// Function declaration.
    Fun(FunDecl),
    /// `type Alias = T;`
    TypeAlias {
        /// Alias name.
        name: String,
        /// The aliased type.
        ty: TypeExpr,
    },
    /// `import a.b.c [as x];` or `smuggle a.b.c;`
    Import {
        /// Dotted path segments.
        path: Vec<String>,
        /// Optional alias.
        alias: Option<String>,
        /// True for `smuggle`.
        smuggled: bool,
    },
    /// Struct declaration.
    Struct(StructDecl),
    /// Class declaration.
    Class(ClassDecl),
    /// Field declaration (inside classes and structs).
    Field(FieldDecl),
    /// Impl block.
    Impl(ImplDecl),
    /// Enum declaration.
    Enum(EnumDecl),
    /// Template declaration.
    Template(TemplateDecl),
    /// Trait declaration.
    Trait(TraitDecl),
    /// `module name { ... }` namespace.
    Namespace {
        /// Namespace name.
        name: String,
        /// Contained statements.
        body: Vec<Stmt>,
    },
}

// ============================================================================
// TYPE EXPRESSIONS
// ============================================================================

/// A type expression.
///
/// Type expressions are distinct from value expressions even where the
/// surface syntax overlaps: an identifier in type position becomes a
/// `Named` node, never an `Identifier` expression. They are `Clone`
/// because symbol tables hold copies that can outlive the declaring node.
#[derive(Clone, Debug)]
pub struct TypeExpr {
    /// Which type form this is.
    pub kind: TypeExprKind,
    /// Where it starts.
    pub loc: SourceLocation,
}

impl TypeExpr {
    /// Creates a type expression.
    pub fn new(kind: TypeExprKind, loc: SourceLocation) -> Self {
        Self { kind, loc }
    }

    /// The head name of a named type, if this is one.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            TypeExprKind::Named { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Type expression variants.
#[derive(Clone, Debug)]
pub enum TypeExprKind {
    /// A (possibly qualified) name with optional generic arguments:
    /// `Int`, `std::io::File`, `Map<Str, Int>`, `loc<Int>`.
    Named {
        /// Qualified name, segments joined as written (`a::b` or `a.b`).
        name: String,
        /// Generic arguments.
        generics: Vec<TypeExpr>,
    },
    /// Pointer: `T*`.
    Pointer(Box<TypeExpr>),
    /// Array/slice: `T[]` or `[T; size]`.
    Array {
        /// Element type.
        element: Box<TypeExpr>,
        /// Constant size expression; `None` for slices.
        size: Option<Box<Expr>>,
    },
    /// Function type: `fn(A, B) -> R`.
    Function {
        /// Parameter types.
        params: Vec<TypeExpr>,
        /// Return type; `None` means `Void`.
        ret: Option<Box<TypeExpr>>,
    },
    /// Optional: `T?`.
    Optional(Box<TypeExpr>),
    /// Tuple / grouping: `(A, B)`.
    Tuple(Vec<TypeExpr>),
    /// Structural type: `{ field: T, ... }`.
    Struct(Vec<(String, TypeExpr)>),
}

// ============================================================================
// STRUCTURAL DISPLAY
// ============================================================================

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Identifier(name) => write!(f, "{name}"),
            ExprKind::Int(v) => write!(f, "{v}"),
            ExprKind::Float(v) => write!(f, "{v}"),
            ExprKind::Str(v) => write!(f, "{v:?}"),
            ExprKind::Bool(v) => write!(f, "{v}"),
            ExprKind::Nil => write!(f, "nil"),
            ExprKind::Array(items) => {
                write!(f, "[")?;
                write_list(f, items)?;
                write!(f, "]")
            }
            ExprKind::Object { type_path, properties } => {
                if let Some(ty) = type_path {
                    write!(f, "{ty}")?;
                }
                write!(f, "{{")?;
                for (i, p) in properties.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match &p.value {
                        Some(v) => write!(f, "{}: {v}", p.key)?,
                        None => write!(f, "{}", p.key)?,
                    }
                }
                write!(f, "}}")
            }
            ExprKind::Unary { op, operand } => write!(f, "({}{operand})", op.lexeme),
            ExprKind::Binary { left, op, right } | ExprKind::Logical { left, op, right } => {
                write!(f, "({left} {} {right})", op.lexeme)
            }
            ExprKind::Conditional { cond, then, otherwise } => {
                write!(f, "({cond} ? {then} : {otherwise})")
            }
            ExprKind::Sequence(items) => {
                write!(f, "(")?;
                write_list(f, items)?;
                write!(f, ")")
            }
            ExprKind::Call { callee, args } => {
                write!(f, "{callee}(")?;
                write_list(f, args)?;
                write!(f, ")")
            }
            ExprKind::Member { object, property } => write!(f, "{object}.{property}"),
            ExprKind::Index { object, index } => write!(f, "{object}[{index}]"),
            ExprKind::Assign { target, op, value } => {
                write!(f, "({target} {} {value})", op.lexeme)
            }
            ExprKind::Borrow { operand, mutable } => {
                write!(f, "({} {operand})", if *mutable { "borrow" } else { "view" })
            }
            ExprKind::PointerDeref(e) => write!(f, "at({e})"),
            ExprKind::AddrOf(e) => write!(f, "addr({e})"),
            ExprKind::FromIntToLoc { address, target } => write!(f, "from<{target}>({address})"),
            ExprKind::LocationOf(e) => write!(f, "loc({e})"),
            ExprKind::ListComprehension { element, variable, iterable, condition } => {
                write!(f, "[{element} for {variable} in {iterable}")?;
                if let Some(c) = condition {
                    write!(f, " if {c}")?;
                }
                write!(f, "]")
            }
            ExprKind::If { cond, then, otherwise } => {
                write!(f, "if ({cond}) {{ {then} }} else {{ {otherwise} }}")
            }
            ExprKind::Construction { ty, args } => {
                write!(f, "{ty}(")?;
                write_list(f, args)?;
                write!(f, ")")
            }
            ExprKind::ArrayInit { element, size } => write!(f, "[{element}; {size}]()"),
            ExprKind::GenericInstantiation { base, args } => {
                write!(f, "{base}<")?;
                write_list(f, args)?;
                write!(f, ">")
            }
            ExprKind::Function { params, .. } => write!(f, "fn({} params)", params.len()),
            ExprKind::This => write!(f, "this"),
            ExprKind::Super => write!(f, "super"),
            ExprKind::Await(e) => write!(f, "(await {e})"),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StmtKind::Block(stmts) => write!(f, "block({} stmts)", stmts.len()),
            StmtKind::Expr(e) => write!(f, "expr({e})"),
            StmtKind::If { cond, .. } => write!(f, "if({cond})"),
            StmtKind::While { cond, .. } => write!(f, "while({cond})"),
            StmtKind::For { .. } => write!(f, "for(..)"),
            StmtKind::Return(Some(e)) => write!(f, "return({e})"),
            StmtKind::Return(None) => write!(f, "return"),
            StmtKind::Break => write!(f, "break"),
            StmtKind::Continue => write!(f, "continue"),
            StmtKind::Try { .. } => write!(f, "try"),
            StmtKind::Throw(e) => write!(f, "throw({e})"),
            StmtKind::Unsafe(_) => write!(f, "unsafe"),
            StmtKind::Empty => write!(f, "empty"),
            StmtKind::Match { scrutinee, arms } => {
                write!(f, "match({scrutinee}; {} arms)", arms.len())
            }
            StmtKind::Yield(Some(e)) => write!(f, "yield({e})"),
            StmtKind::Yield(None) => write!(f, "yield"),
            StmtKind::Assert { condition, .. } => write!(f, "assert({condition})"),
            StmtKind::Extern(d) => write!(f, "extern({d})"),
            StmtKind::Decl(d) => write!(f, "{d}"),
        }
    }
}

impl fmt::Display for Decl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DeclKind::Var(v) => {
                let binder = if v.is_const { "const" } else { "var" };
                write!(f, "{binder} {}", v.name)
            }
            DeclKind::Fun(fun) => write!(f, "fn {}({} params)", fun.name, fun.params.len()),
            DeclKind::TypeAlias { name, ty } => write!(f, "type {name} = {ty}"),
            DeclKind::Import { path, smuggled, .. } => {
                let kw = if *smuggled { "smuggle" } else { "import" };
                write!(f, "{kw} {}", path.join("."))
            }
            DeclKind::Struct(s) => write!(f, "struct {}", s.name),
            DeclKind::Class(c) => write!(f, "class {}", c.name),
            DeclKind::Field(fd) => write!(f, "field {}", fd.name),
            DeclKind::Impl(i) => write!(f, "impl {}", i.self_ty),
            DeclKind::Enum(e) => write!(f, "enum {}", e.name),
            DeclKind::Template(t) => write!(f, "template {}", t.name),
            DeclKind::Trait(t) => write!(f, "trait {}", t.name),
            DeclKind::Namespace { name, .. } => write!(f, "module {name}"),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeExprKind::Named { name, generics } => {
                write!(f, "{name}")?;
                if !generics.is_empty() {
                    write!(f, "<")?;
                    write_list(f, generics)?;
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeExprKind::Pointer(inner) => write!(f, "{inner}*"),
            TypeExprKind::Array { element, size } => match size {
                Some(size) => write!(f, "[{element}; {size}]"),
                None => write!(f, "{element}[]"),
            },
            TypeExprKind::Function { params, ret } => {
                write!(f, "fn(")?;
                write_list(f, params)?;
                write!(f, ")")?;
                if let Some(ret) = ret {
                    write!(f, " -> {ret}")?;
                }
                Ok(())
            }
            TypeExprKind::Optional(inner) => write!(f, "{inner}?"),
            TypeExprKind::Tuple(items) => {
                write!(f, "(")?;
                write_list(f, items)?;
                write!(f, ")")
            }
            TypeExprKind::Struct(fields) => {
                write!(f, "{{")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {ty}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

// ============================================================================
// VISITOR
// ============================================================================

/// Source-order traversal over the AST.
///
/// Every method defaults to the structural `walk_*`; override the ones
/// that matter and call `walk_*` inside to keep descending. Visitors may
/// carry mutable state between visits.
pub trait Visitor {
    /// Visits the module root.
    fn visit_module(&mut self, module: &Module) {
        walk_module(self, module);
    }

    /// Visits one statement.
    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    /// Visits one declaration.
    fn visit_decl(&mut self, decl: &Decl) {
        walk_decl(self, decl);
    }

    /// Visits one expression.
    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    /// Visits one type expression.
    fn visit_type(&mut self, ty: &TypeExpr) {
        walk_type(self, ty);
    }
}

/// Walks a module's top-level statements in source order.
pub fn walk_module<V: Visitor + ?Sized>(v: &mut V, module: &Module) {
    for stmt in &module.body {
        v.visit_stmt(stmt);
    }
}

/// Walks a statement's children in source order.
pub fn walk_stmt<V: Visitor + ?Sized>(v: &mut V, stmt: &Stmt) {
    match &stmt.kind {
        StmtKind::Block(stmts) => {
            for s in stmts {
                v.visit_stmt(s);
            }
        }
        StmtKind::Expr(e) => v.visit_expr(e),
        StmtKind::If { cond, then, otherwise } => {
            v.visit_expr(cond);
            v.visit_stmt(then);
            if let Some(e) = otherwise {
                v.visit_stmt(e);
            }
        }
        StmtKind::While { cond, body } => {
            v.visit_expr(cond);
            v.visit_stmt(body);
        }
        StmtKind::For { init, cond, update, body } => {
            if let Some(init) = init {
                v.visit_stmt(init);
            }
            if let Some(cond) = cond {
                v.visit_expr(cond);
            }
            if let Some(update) = update {
                v.visit_expr(update);
            }
            v.visit_stmt(body);
        }
        StmtKind::Return(value) => {
            if let Some(value) = value {
                v.visit_expr(value);
            }
        }
        StmtKind::Break | StmtKind::Continue | StmtKind::Empty => {}
        StmtKind::Try { body, catch, finally } => {
            v.visit_stmt(body);
            if let Some(catch) = catch {
                if let Some(ty) = &catch.binding_type {
                    v.visit_type(ty);
                }
                v.visit_stmt(&catch.body);
            }
            if let Some(finally) = finally {
                v.visit_stmt(finally);
            }
        }
        StmtKind::Throw(e) => v.visit_expr(e),
        StmtKind::Unsafe(body) => v.visit_stmt(body),
        StmtKind::Match { scrutinee, arms } => {
            v.visit_expr(scrutinee);
            for arm in arms {
                v.visit_expr(&arm.pattern);
                if let Some(guard) = &arm.guard {
                    v.visit_expr(guard);
                }
                v.visit_stmt(&arm.body);
            }
        }
        StmtKind::Yield(value) => {
            if let Some(value) = value {
                v.visit_expr(value);
            }
        }
        StmtKind::Assert { condition, message } => {
            v.visit_expr(condition);
            if let Some(message) = message {
                v.visit_expr(message);
            }
        }
        StmtKind::Extern(decl) => v.visit_decl(decl),
        StmtKind::Decl(decl) => v.visit_decl(decl),
    }
}

/// Walks a declaration's children in source order.
pub fn walk_decl<V: Visitor + ?Sized>(v: &mut V, decl: &Decl) {
    match &decl.kind {
        DeclKind::Var(var) => {
            if let Some(ty) = &var.ty {
                v.visit_type(ty);
            }
            if let Some(init) = &var.init {
                v.visit_expr(init);
            }
        }
        DeclKind::Fun(fun) => {
            for param in &fun.params {
                if let Some(ty) = &param.ty {
                    v.visit_type(ty);
                }
                if let Some(default) = &param.default {
                    v.visit_expr(default);
                }
            }
            if let Some(ret) = &fun.return_type {
                v.visit_type(ret);
            }
            if let Some(throws) = &fun.throws {
                v.visit_type(throws);
            }
            if let Some(body) = &fun.body {
                v.visit_stmt(body);
            }
        }
        DeclKind::TypeAlias { ty, .. } => v.visit_type(ty),
        DeclKind::Import { .. } => {}
        DeclKind::Struct(s) => {
            for field in &s.fields {
                if let Some(ty) = &field.ty {
                    v.visit_type(ty);
                }
                if let Some(init) = &field.init {
                    v.visit_expr(init);
                }
            }
        }
        DeclKind::Class(c) => {
            for member in &c.members {
                v.visit_decl(member);
            }
        }
        DeclKind::Field(field) => {
            if let Some(ty) = &field.ty {
                v.visit_type(ty);
            }
            if let Some(init) = &field.init {
                v.visit_expr(init);
            }
        }
        DeclKind::Impl(imp) => {
            if let Some(trait_ref) = &imp.trait_ref {
                v.visit_type(trait_ref);
            }
            v.visit_type(&imp.self_ty);
            for member in &imp.members {
                v.visit_decl(member);
            }
        }
        DeclKind::Enum(e) => {
            for variant in &e.variants {
                for ty in &variant.fields {
                    v.visit_type(ty);
                }
            }
        }
        DeclKind::Template(t) => v.visit_stmt(&t.body),
        DeclKind::Trait(t) => {
            for member in &t.members {
                v.visit_decl(member);
            }
        }
        DeclKind::Namespace { body, .. } => {
            for stmt in body {
                v.visit_stmt(stmt);
            }
        }
    }
}

/// Walks an expression's children in source order.
pub fn walk_expr<V: Visitor + ?Sized>(v: &mut V, expr: &Expr) {
    match &expr.kind {
        ExprKind::Identifier(_)
        | ExprKind::Int(_)
        | ExprKind::Float(_)
        | ExprKind::Str(_)
        | ExprKind::Bool(_)
        | ExprKind::Nil
        | ExprKind::This
        | ExprKind::Super => {}
        ExprKind::Array(items) | ExprKind::Sequence(items) => {
            for item in items {
                v.visit_expr(item);
            }
        }
        ExprKind::Object { type_path, properties } => {
            if let Some(ty) = type_path {
                v.visit_type(ty);
            }
            for prop in properties {
                if let Some(value) = &prop.value {
                    v.visit_expr(value);
                }
            }
        }
        ExprKind::Unary { operand, .. } => v.visit_expr(operand),
        ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        ExprKind::Conditional { cond, then, otherwise }
        | ExprKind::If { cond, then, otherwise } => {
            v.visit_expr(cond);
            v.visit_expr(then);
            v.visit_expr(otherwise);
        }
        ExprKind::Call { callee, args } => {
            v.visit_expr(callee);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        ExprKind::Member { object, .. } => v.visit_expr(object),
        ExprKind::Index { object, index } => {
            v.visit_expr(object);
            v.visit_expr(index);
        }
        ExprKind::Assign { target, value, .. } => {
            v.visit_expr(target);
            v.visit_expr(value);
        }
        ExprKind::Borrow { operand, .. } => v.visit_expr(operand),
        ExprKind::PointerDeref(e) | ExprKind::AddrOf(e) | ExprKind::LocationOf(e) => {
            v.visit_expr(e)
        }
        ExprKind::FromIntToLoc { address, target } => {
            v.visit_type(target);
            v.visit_expr(address);
        }
        ExprKind::ListComprehension { element, iterable, condition, .. } => {
            v.visit_expr(element);
            v.visit_expr(iterable);
            if let Some(condition) = condition {
                v.visit_expr(condition);
            }
        }
        ExprKind::Construction { ty, args } => {
            v.visit_type(ty);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        ExprKind::ArrayInit { element, size } => {
            v.visit_type(element);
            v.visit_expr(size);
        }
        ExprKind::GenericInstantiation { base, args } => {
            v.visit_expr(base);
            for arg in args {
                v.visit_type(arg);
            }
        }
        ExprKind::Function { params, return_type, body } => {
            for param in params {
                if let Some(ty) = &param.ty {
                    v.visit_type(ty);
                }
            }
            if let Some(ret) = return_type {
                v.visit_type(ret);
            }
            v.visit_stmt(body);
        }
        ExprKind::Await(e) => v.visit_expr(e),
    }
}

/// Walks a type expression's children in source order.
pub fn walk_type<V: Visitor + ?Sized>(v: &mut V, ty: &TypeExpr) {
    match &ty.kind {
        TypeExprKind::Named { generics, .. } => {
            for arg in generics {
                v.visit_type(arg);
            }
        }
        TypeExprKind::Pointer(inner) | TypeExprKind::Optional(inner) => v.visit_type(inner),
        TypeExprKind::Array { element, size } => {
            v.visit_type(element);
            if let Some(size) = size {
                v.visit_expr(size);
            }
        }
        TypeExprKind::Function { params, ret } => {
            for param in params {
                v.visit_type(param);
            }
            if let Some(ret) = ret {
                v.visit_type(ret);
            }
        }
        TypeExprKind::Tuple(items) => {
            for item in items {
                v.visit_type(item);
            }
        }
        TypeExprKind::Struct(fields) => {
            for (_, field_ty) in fields {
                v.visit_type(field_ty);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::dummy()
    }

    fn ident(name: &str) -> Expr {
        Expr::new(ExprKind::Identifier(name.to_string()), loc())
    }

    /// Counts every node a traversal reaches.
    struct NodeCounter {
        exprs: usize,
        stmts: usize,
        types: usize,
    }

    impl Visitor for NodeCounter {
        fn visit_stmt(&mut self, stmt: &Stmt) {
            self.stmts += 1;
            walk_stmt(self, stmt);
        }
        fn visit_expr(&mut self, expr: &Expr) {
            self.exprs += 1;
            walk_expr(self, expr);
        }
        fn visit_type(&mut self, ty: &TypeExpr) {
            self.types += 1;
            walk_type(self, ty);
        }
    }

    #[test]
    fn test_visitor_counts_all_nodes() {
        let op = vync_lex::Token::new(vync_lex::TokenKind::Plus, "+", loc());
        let sum = Expr::new(
            ExprKind::Binary {
                left: Box::new(ident("a")),
                op,
                right: Box::new(ident("b")),
            },
            loc(),
        );
        let module = Module {
            body: vec![Stmt::new(StmtKind::Expr(sum), loc())],
            loc: loc(),
        };

        let mut counter = NodeCounter { exprs: 0, stmts: 0, types: 0 };
        counter.visit_module(&module);
        assert_eq!(counter.stmts, 1);
        assert_eq!(counter.exprs, 3);
        assert_eq!(counter.types, 0);
    }

    #[test]
    fn test_display_is_stable() {
        let op = vync_lex::Token::new(vync_lex::TokenKind::Star, "*", loc());
        let product = Expr::new(
            ExprKind::Binary {
                left: Box::new(ident("x")),
                op,
                right: Box::new(Expr::new(ExprKind::Int(3), loc())),
            },
            loc(),
        );
        let first = product.to_string();
        let second = product.to_string();
        assert_eq!(first, "(x * 3)");
        assert_eq!(first, second);
    }

    #[test]
    fn test_type_expr_clone_is_deep() {
        let inner = TypeExpr::new(
            TypeExprKind::Named { name: "Int".to_string(), generics: vec![] },
            loc(),
        );
        let ptr = TypeExpr::new(TypeExprKind::Pointer(Box::new(inner)), loc());
        let copy = ptr.clone();
        assert_eq!(copy.to_string(), "Int*");
        assert_eq!(ptr.to_string(), copy.to_string());
    }

    #[test]
    fn test_decl_names() {
        let var = Decl::new(
            DeclKind::Var(VarDecl {
                name: "x".to_string(),
                is_const: false,
                ty: None,
                init: None,
            }),
            loc(),
        );
        assert_eq!(var.name(), Some("x"));

        let import = Decl::new(
            DeclKind::Import { path: vec!["std".to_string()], alias: None, smuggled: false },
            loc(),
        );
        assert_eq!(import.name(), None);
    }

    #[test]
    fn test_intrinsic_display() {
        let target = TypeExpr::new(
            TypeExprKind::Named { name: "Int".to_string(), generics: vec![] },
            loc(),
        );
        let cast = Expr::new(
            ExprKind::FromIntToLoc {
                address: Box::new(Expr::new(ExprKind::Int(4096), loc())),
                target,
            },
            loc(),
        );
        assert_eq!(cast.to_string(), "from<Int>(4096)");
    }
}
