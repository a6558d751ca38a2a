//! vync-lex - Lexical analyzer for the Vyn language.
//!
//! The lexer turns source text into a token sequence. Three properties
//! hold for every input:
//!
//! - Lexing is total: the lexer never panics and always terminates, and
//!   the last token is always `Eof`.
//! - In indentation mode the synthetic `Indent`/`Dedent` tokens balance:
//!   every `Indent` is eventually closed, at the latest by the dedent
//!   flush at end of input.
//! - For every non-synthetic token, the lexeme is exactly the source
//!   substring at the token's location.
//!
//! Errors (unterminated strings, stray characters, tabs in indentation,
//! inconsistent dedents, unmatched braces) surface as `Illegal` tokens
//! whose lexeme carries the diagnostic text.
//!
//! # Example
//!
//! ```
//! use vync_lex::{lex, TokenKind};
//!
//! let tokens = lex("fn main()\n  let x = 1\n", "demo.vyn");
//! assert!(tokens.iter().any(|t| t.kind == TokenKind::Indent));
//! assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
//! ```

pub mod cursor;
pub mod lexer;
pub mod token;

#[cfg(test)]
mod edge_cases;

pub use lexer::Lexer;
pub use token::{keyword_from_ident, Token, TokenKind};

/// Lexes `source`, tagging every token with `file_path`.
pub fn lex(source: &str, file_path: &str) -> Vec<Token> {
    Lexer::new(source, file_path).tokenize()
}

/// Processes the escape sequences of a string-literal lexeme.
///
/// The lexer keeps string lexemes raw (quotes included) so they match the
/// source text; consumers call this to obtain the value. Supported
/// escapes: `\n`, `\r`, `\t`, `\\`, `\"`, `\'`, `\0`. Unknown escapes
/// keep the escaped character.
pub fn unescape(lexeme: &str) -> String {
    let inner = lexeme
        .strip_prefix(['"', '\''])
        .and_then(|s| s.strip_suffix(['"', '\'']))
        .unwrap_or(lexeme);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
