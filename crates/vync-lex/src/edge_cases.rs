//! Edge-case tests for the lexer.
//!
//! Scenarios that fall between the unit tests in `lexer.rs`: mode
//! switching mid-file, comments interleaved with the indentation
//! protocol, and pathological operator runs.

use crate::{lex, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source, "edge.vyn").into_iter().map(|t| t.kind).collect()
}

#[test]
fn test_mixed_block_styles_in_one_file() {
    // An indentation-based function followed by a brace-based one.
    let source = "fn a()\n  let x = 1\nfn b() {\n  let y = 2;\n}\n";
    let ks = kinds(source);
    assert_eq!(ks.iter().filter(|k| **k == TokenKind::Indent).count(), 1);
    assert_eq!(ks.iter().filter(|k| **k == TokenKind::Dedent).count(), 1);
    assert_eq!(ks.iter().filter(|k| **k == TokenKind::LBrace).count(), 1);
}

#[test]
fn test_indentation_resumes_after_brace_block() {
    // The brace block temporarily suspends the indent protocol; the line
    // after it is measured against the same stack as before.
    let source = "a\n  b { c\n d }\n  e\n";
    let ks = kinds(source);
    assert_eq!(ks.iter().filter(|k| **k == TokenKind::Indent).count(), 1);
    assert_eq!(ks.iter().filter(|k| **k == TokenKind::Dedent).count(), 1);
}

#[test]
fn test_comment_only_lines_keep_stack() {
    let source = "a\n  b\n// note at margin\n  c\n";
    let ks = kinds(source);
    // A margin comment closes and reopens the block; markers must still
    // balance and the sequence must still end in Eof.
    let mut depth = 0i32;
    for k in &ks {
        match k {
            TokenKind::Indent => depth += 1,
            TokenKind::Dedent => depth -= 1,
            _ => {}
        }
        assert!(depth >= 0);
    }
    assert_eq!(depth, 0);
    assert_eq!(*ks.last().unwrap(), TokenKind::Eof);
}

#[test]
fn test_deep_nesting_unwinds_fully() {
    let source = "a\n b\n  c\n   d\n    e";
    let ks = kinds(source);
    assert_eq!(ks.iter().filter(|k| **k == TokenKind::Indent).count(), 4);
    assert_eq!(ks.iter().filter(|k| **k == TokenKind::Dedent).count(), 4);
}

#[test]
fn test_multi_level_dedent_in_one_step() {
    let source = "a\n  b\n    c\nd";
    let tokens = lex(source, "edge.vyn");
    // Both levels close at 'd', producing two consecutive dedents.
    let dedent_positions: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.kind == TokenKind::Dedent)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(dedent_positions.len(), 2);
    assert_eq!(dedent_positions[0] + 1, dedent_positions[1]);
}

#[test]
fn test_operator_run_without_spaces() {
    assert_eq!(
        kinds("a<=b>>=c"),
        vec![
            TokenKind::Identifier,
            TokenKind::LtEq,
            TokenKind::Identifier,
            TokenKind::ShrEq,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_colon_cluster() {
    assert_eq!(
        kinds("a::b:c:=d"),
        vec![
            TokenKind::Identifier,
            TokenKind::ColonColon,
            TokenKind::Identifier,
            TokenKind::Colon,
            TokenKind::Identifier,
            TokenKind::ColonEq,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_string_with_escaped_quote_terminates() {
    let tokens = lex(r#""say \"hi\"" x"#, "edge.vyn");
    assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[0].lexeme, r#""say \"hi\"""#);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
}

#[test]
fn test_illegal_token_does_not_stop_lexing() {
    let tokens = lex("a $ b # c", "edge.vyn");
    let idents = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Identifier)
        .count();
    let illegals = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Illegal)
        .count();
    assert_eq!(idents, 3);
    assert_eq!(illegals, 2);
}

#[test]
fn test_crlf_line_endings() {
    let source = "a\r\n  b\r\n";
    let ks = kinds(source);
    assert_eq!(ks.iter().filter(|k| **k == TokenKind::Indent).count(), 1);
    assert_eq!(ks.iter().filter(|k| **k == TokenKind::Dedent).count(), 1);
}

#[test]
fn test_leading_spaces_on_first_line_ignored() {
    // Indentation is only measured after a newline; a file beginning with
    // spaces stays at level 0.
    let ks = kinds("   a\nb\n");
    assert!(!ks.contains(&TokenKind::Indent));
    assert!(!ks.contains(&TokenKind::Dedent));
}
