//! Edge-case tests for the semantic analyzer: nesting, shadowing and
//! diagnostic ordering in less common shapes.

use crate::analyze;
use vync_lex::lex;
use vync_par::parse;
use vync_util::Diagnostic;

fn diagnostics_for(source: &str) -> Vec<Diagnostic> {
    let module = parse(lex(source, "edge.vyn"), "edge.vyn").expect("source should parse");
    analyze(&module)
}

#[test]
fn test_nested_unsafe_blocks() {
    let diags = diagnostics_for("fn f() { unsafe { unsafe { a = at(p); } b = at(q); } }");
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
}

#[test]
fn test_unsafe_flag_restored_after_inner_block() {
    let diags = diagnostics_for(
        "fn f() {\n  unsafe { a = at(p); }\n  unsafe { b = at(q); }\n  c = at(r);\n}",
    );
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].location.line, 4);
}

#[test]
fn test_intrinsic_inside_loop_inside_unsafe() {
    let diags = diagnostics_for(
        "fn f() { unsafe { while (more()) { buf = at(cursor); } } }",
    );
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
}

#[test]
fn test_intrinsic_in_for_header_outside_unsafe() {
    let diags = diagnostics_for("fn f() { for (let i = at(p); i < n; i = i + 1) { } }");
    assert_eq!(diags.len(), 1);
}

#[test]
fn test_intrinsic_in_condition_positions() {
    let diags = diagnostics_for("fn f() { if (at(p) > 0) { } else { } }");
    assert_eq!(diags.len(), 1);
}

#[test]
fn test_loc_argument_may_contain_unsafe_violation() {
    // loc itself is fine; the nested at() is not.
    let diags = diagnostics_for("fn f() { l = loc(at(p)); }");
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("at"));
}

#[test]
fn test_indentation_style_unsafe_block() {
    let diags = diagnostics_for("fn f()\n  unsafe\n    p = at(q)\n");
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
}

#[test]
fn test_try_catch_scopes_binding() {
    let diags = diagnostics_for("fn f() { try { risky(); } catch (e: Error) { log(e); } }");
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
}

#[test]
fn test_all_four_reserved_names_flagged() {
    let diags = diagnostics_for("fn f() { let loc = 1; let addr = 2; let at = 3; let from = 4; }");
    assert_eq!(diags.len(), 4);
    for diag in &diags {
        assert!(diag.message.contains("reserved intrinsic"));
    }
}

#[test]
fn test_non_reserved_names_pass() {
    let diags = diagnostics_for("fn f() { let location = 1; let atlas = 2; let fromage = 3; }");
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
}

#[test]
fn test_class_with_unsafe_method() {
    let source = "class Buffer\n  var base: Int\n  fn read(offset: Int) -> Int\n    unsafe\n      return at(from<loc<Int>>(base + offset))\n";
    let diags = diagnostics_for(source);
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
}

#[test]
fn test_throw_operand_is_analyzed() {
    let diags = diagnostics_for("fn f() { throw wrap(at(p)); }");
    assert_eq!(diags.len(), 1);
}

#[test]
fn test_match_arms_are_analyzed() {
    let diags = diagnostics_for("fn f() { match x { 1 => at(p), other => loc(other) } }");
    assert_eq!(diags.len(), 1);
}

#[test]
fn test_list_comprehension_scopes_variable() {
    let diags = diagnostics_for("fn f() { ys = [at(x) for x in xs]; }");
    assert_eq!(diags.len(), 1);
}

#[test]
fn test_variable_without_type_or_initializer() {
    let diags = diagnostics_for("fn f() { var x; }");
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("type annotation or an initializer"));
}

#[test]
fn test_empty_module_is_clean() {
    let diags = diagnostics_for("");
    assert!(diags.is_empty());
}
