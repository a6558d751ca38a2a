//! Cross-cutting parser tests: block-style equivalence, traversal
//! totality, stringification stability and failure modes.

use crate::ast::{Decl, DeclKind, ExprKind, Module, Stmt, StmtKind, Visitor};
use crate::parse;
use vync_lex::lex;

fn module(source: &str) -> Module {
    parse(lex(source, "edge.vyn"), "edge.vyn").unwrap()
}

fn function_of(stmt: &Stmt) -> &crate::ast::FunDecl {
    match &stmt.kind {
        StmtKind::Decl(Decl { kind: DeclKind::Fun(f), .. }) => f,
        other => panic!("expected function declaration, got {other:?}"),
    }
}

#[test]
fn test_indentation_and_braces_parse_equivalently() {
    let indented = module("fn main()\n  let x = 1\n");
    let braced = module("fn main() {\n  let x = 1;\n}\n");

    assert_eq!(indented.body.len(), 1);
    assert_eq!(braced.body.len(), 1);

    let fi = function_of(&indented.body[0]);
    let fb = function_of(&braced.body[0]);
    assert_eq!(fi.name, fb.name);
    assert!(fi.params.is_empty() && fb.params.is_empty());

    let body_of = |f: &crate::ast::FunDecl| match &f.body.as_ref().unwrap().kind {
        StmtKind::Block(stmts) => stmts.clone(),
        other => panic!("expected block, got {other:?}"),
    };
    let (bi, bb) = (body_of(fi), body_of(fb));
    assert_eq!(bi.len(), 1);
    assert_eq!(bb.len(), 1);

    let var_of = |s: &Stmt| match &s.kind {
        StmtKind::Decl(Decl { kind: DeclKind::Var(v), .. }) => v.clone(),
        other => panic!("expected variable declaration, got {other:?}"),
    };
    let (vi, vb) = (var_of(&bi[0]), var_of(&bb[0]));
    assert_eq!(vi.name, vb.name);
    assert!(matches!(vi.init.as_ref().unwrap().kind, ExprKind::Int(1)));
    assert!(matches!(vb.init.as_ref().unwrap().kind, ExprKind::Int(1)));
}

#[test]
fn test_visitor_visits_every_node_and_terminates() {
    let source = "fn main() -> Int {\n  var x: Int = 55;\n  if (x > 0) { x = x - 1; } else { x = 0; }\n  return x;\n}\n";
    let m = module(source);

    struct Counter(usize);
    impl Visitor for Counter {
        fn visit_stmt(&mut self, stmt: &Stmt) {
            self.0 += 1;
            crate::ast::walk_stmt(self, stmt);
        }
        fn visit_expr(&mut self, expr: &crate::ast::Expr) {
            self.0 += 1;
            crate::ast::walk_expr(self, expr);
        }
        fn visit_decl(&mut self, decl: &Decl) {
            self.0 += 1;
            crate::ast::walk_decl(self, decl);
        }
        fn visit_type(&mut self, ty: &crate::ast::TypeExpr) {
            self.0 += 1;
            crate::ast::walk_type(self, ty);
        }
    }

    let mut counter = Counter(0);
    counter.visit_module(&m);
    assert!(counter.0 > 10, "expected a rich tree, visited {}", counter.0);
}

#[test]
fn test_stringification_is_stable() {
    let m = module("let y = a + b * c\n");
    let rendered: Vec<String> = (0..3).map(|_| m.body[0].to_string()).collect();
    assert_eq!(rendered[0], rendered[1]);
    assert_eq!(rendered[1], rendered[2]);
}

#[test]
fn test_unsafe_block_with_intrinsics_parses() {
    let m = module("fn poke() {\n  unsafe { p = from<loc<Int>>(addr); }\n}\n");
    assert_eq!(m.body.len(), 1);
}

#[test]
fn test_intrinsic_arity_is_fatal_in_context() {
    assert!(parse(lex("fn f() { at() }", "e.vyn"), "e.vyn").is_err());
    assert!(parse(lex("fn f() { at(a, b) }", "e.vyn"), "e.vyn").is_err());
    assert!(parse(lex("fn f() { from<Int>() }", "e.vyn"), "e.vyn").is_err());
    assert!(parse(lex("fn f() { from<Int>(a, b) }", "e.vyn"), "e.vyn").is_err());
}

#[test]
fn test_illegal_token_becomes_fatal_lexical_error() {
    let err = parse(lex("let s = \"unterminated\n", "e.vyn"), "e.vyn").unwrap_err();
    assert!(err.to_string().contains("lexical error"));
}

#[test]
fn test_tab_indentation_is_fatal() {
    let err = parse(lex("fn main()\n\tlet x = 1\n", "e.vyn"), "e.vyn").unwrap_err();
    let text = err.to_string();
    assert!(text.contains("tab"), "unexpected message: {text}");
    assert!(text.contains("e.vyn:2:1"), "unexpected location: {text}");
}

#[test]
fn test_deeply_nested_blocks() {
    let source = "fn f() {\n  if (a) { if (b) { if (c) { x = 1; } } }\n}\n";
    assert!(parse(lex(source, "e.vyn"), "e.vyn").is_ok());
}

#[test]
fn test_mixed_styles_across_functions() {
    let source = "fn a()\n  let x = 1\nfn b() {\n  let y = 2;\n}\n";
    let m = module(source);
    assert_eq!(m.body.len(), 2);
}

#[test]
fn test_nested_indented_control_flow() {
    let source = "fn count()\n  let total = 0\n  while (total < 10)\n    total = total + 1\n  return total\n";
    let m = module(source);
    let f = function_of(&m.body[0]);
    match &f.body.as_ref().unwrap().kind {
        StmtKind::Block(stmts) => assert_eq!(stmts.len(), 3),
        other => panic!("expected block, got {other:?}"),
    }
}

#[test]
fn test_trailing_commas_everywhere() {
    assert!(parse(lex("let a = [1, 2,]\n", "e.vyn"), "e.vyn").is_ok());
    assert!(parse(lex("let b = Point{x: 1,}\n", "e.vyn"), "e.vyn").is_ok());
    assert!(parse(lex("let c = f(1, 2,)\n", "e.vyn"), "e.vyn").is_ok());
}

#[test]
fn test_speculation_failure_leaves_no_trace() {
    // 'a < b' starts like a generic construction but is a comparison;
    // afterwards '>>' must still lex as a shift in the same module.
    let m = module("let p = a < b\nlet q = c >> 2\n");
    assert_eq!(m.body.len(), 2);
}

#[test]
fn test_comments_between_statements() {
    let source = "// file header\nfn main() {\n  // inner note\n  let x = 1; // trailing\n}\n";
    assert!(parse(lex(source, "e.vyn"), "e.vyn").is_ok());
}

#[test]
fn test_ownership_types_in_declarations() {
    let m = module("my<Buffer> buf = Buffer(16)\n");
    match &m.body[0].kind {
        StmtKind::Decl(Decl { kind: DeclKind::Var(v), .. }) => {
            assert_eq!(v.ty.as_ref().unwrap().to_string(), "my<Buffer>");
        }
        other => panic!("expected variable declaration, got {other:?}"),
    }
}

#[test]
fn test_construction_vs_identifier() {
    let m = module("let a = Point(1, 2)\nlet b = point\n");
    let inits: Vec<_> = m
        .body
        .iter()
        .map(|s| match &s.kind {
            StmtKind::Decl(Decl { kind: DeclKind::Var(v), .. }) => {
                v.init.as_ref().unwrap().clone()
            }
            other => panic!("expected variable declaration, got {other:?}"),
        })
        .collect();
    assert!(matches!(inits[0].kind, ExprKind::Construction { .. }));
    assert!(matches!(inits[1].kind, ExprKind::Identifier(_)));
}
