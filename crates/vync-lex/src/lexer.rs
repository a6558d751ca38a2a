//! Main lexer for the Vyn language.
//!
//! The lexer transforms source text into a finite token sequence ending in
//! `Eof`. It handles both of Vyn's block styles in the same file:
//!
//! - Brace mode: while at least one `{` is open, whitespace (newlines
//!   included) is insignificant and no synthetic markers are emitted.
//! - Indentation mode: while the brace counter is zero, a stack of
//!   indentation widths (initialized to `[0]`) drives synthetic `Indent`
//!   and `Dedent` tokens, and every physical newline emits a `Newline`
//!   marker. Blank lines never touch the stack.
//!
//! Lexing is total: errors surface as `Illegal` tokens carrying the
//! diagnostic text in the lexeme, and the lexer always terminates.

use std::sync::Arc;

use vync_util::SourceLocation;

use crate::cursor::Cursor;
use crate::token::{keyword_from_ident, Token, TokenKind};

/// The lexer state machine.
///
/// # Example
///
/// ```
/// use vync_lex::{Lexer, TokenKind};
///
/// let tokens = Lexer::new("let x = 42;", "main.vyn").tokenize();
/// assert_eq!(tokens[0].kind, TokenKind::KwLet);
/// assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
/// ```
pub struct Lexer<'a> {
    /// Character cursor over the source.
    cursor: Cursor<'a>,

    /// File path attached to every emitted location.
    file: Arc<str>,

    /// Accumulated output tokens.
    tokens: Vec<Token>,

    /// Number of currently unmatched `{`. Non-zero selects brace mode.
    brace_depth: u32,

    /// Stack of indentation widths; the bottom entry is always 0.
    indent_stack: Vec<u32>,

    /// True until the first non-whitespace character of the current line.
    in_leading_whitespace: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `source`, tagging tokens with `file`.
    pub fn new(source: &'a str, file: impl Into<Arc<str>>) -> Self {
        Self {
            cursor: Cursor::new(source),
            file: file.into(),
            tokens: Vec::new(),
            brace_depth: 0,
            indent_stack: vec![0],
            in_leading_whitespace: true,
        }
    }

    /// Runs the lexer to completion and returns the token sequence.
    ///
    /// The result always ends in exactly one `Eof` token, preceded by one
    /// `Dedent` per indentation level still open.
    pub fn tokenize(mut self) -> Vec<Token> {
        while !self.cursor.is_at_end() {
            let c = self.cursor.current_char();
            if c.is_whitespace() {
                self.handle_whitespace();
            } else {
                self.in_leading_whitespace = false;
                self.lex_token();
            }
        }

        if self.brace_depth > 0 {
            let loc = self.location();
            self.push_illegal("unmatched '{' at end of file", loc);
        }

        // Close every indentation level still open.
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            let loc = self.location();
            self.tokens.push(Token::synthetic(TokenKind::Dedent, loc));
        }

        let loc = self.location();
        self.tokens.push(Token::synthetic(TokenKind::Eof, loc));
        tracing::debug!(tokens = self.tokens.len(), "lexing finished");
        self.tokens
    }

    /// Current location as a [`SourceLocation`].
    fn location(&self) -> SourceLocation {
        SourceLocation {
            file: Arc::clone(&self.file),
            line: self.cursor.line(),
            column: self.cursor.column(),
        }
    }

    fn push(&mut self, kind: TokenKind, lexeme: impl Into<String>, location: SourceLocation) {
        self.tokens.push(Token::new(kind, lexeme, location));
    }

    fn push_illegal(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.tokens.push(Token::new(TokenKind::Illegal, message, location));
    }

    // =========================================================================
    // WHITESPACE AND THE BLOCK-STYLE PROTOCOL
    // =========================================================================

    /// Consumes one whitespace character, driving the block protocol.
    fn handle_whitespace(&mut self) {
        let c = self.cursor.current_char();

        // Inside braces all whitespace is insignificant.
        if self.brace_depth > 0 {
            self.cursor.advance();
            return;
        }

        match c {
            '\n' => {
                let loc = self.location();
                self.tokens.push(Token::synthetic(TokenKind::Newline, loc));
                self.cursor.advance();
                self.in_leading_whitespace = true;
                self.scan_indentation();
            }
            '\t' => {
                if self.in_leading_whitespace {
                    let loc = self.location();
                    self.push_illegal("tabs are not allowed in indentation", loc);
                }
                self.cursor.advance();
            }
            _ => {
                self.cursor.advance();
            }
        }
    }

    /// Looks at the upcoming line's leading spaces and updates the
    /// indentation stack. Runs once per consumed newline; consumes nothing
    /// itself, so blank lines re-enter through their own newline.
    fn scan_indentation(&mut self) {
        let mut spaces: u32 = 0;
        loop {
            match self.cursor.char_at_byte_offset(spaces as usize) {
                ' ' => spaces += 1,
                // Blank line (or end of input): the stack is untouched.
                '\n' | '\r' | '\0' => return,
                // A leading tab is reported when it is consumed.
                '\t' => return,
                _ => break,
            }
        }

        let current = *self.indent_stack.last().expect("indent stack is never empty");
        let line_start = self.location();
        if spaces > current {
            self.indent_stack.push(spaces);
            self.tokens.push(Token::synthetic(TokenKind::Indent, line_start));
        } else if spaces < current {
            while self.indent_stack.len() > 1
                && *self.indent_stack.last().expect("stack has a top") > spaces
            {
                self.indent_stack.pop();
                self.tokens
                    .push(Token::synthetic(TokenKind::Dedent, line_start.clone()));
            }
            if *self.indent_stack.last().expect("stack has a top") != spaces {
                self.push_illegal("inconsistent indentation", line_start);
            }
        }
    }

    // =========================================================================
    // TOKEN DISPATCH
    // =========================================================================

    /// Lexes one token starting at a non-whitespace character.
    fn lex_token(&mut self) {
        let c = self.cursor.current_char();
        let loc = self.location();

        match c {
            '(' => self.single(TokenKind::LParen, "(", loc),
            ')' => self.single(TokenKind::RParen, ")", loc),
            '{' => {
                self.brace_depth += 1;
                self.single(TokenKind::LBrace, "{", loc);
            }
            '}' => {
                if self.brace_depth == 0 {
                    self.cursor.advance();
                    self.push_illegal("unmatched closing brace '}'", loc);
                } else {
                    self.brace_depth -= 1;
                    self.single(TokenKind::RBrace, "}", loc);
                }
            }
            '[' => self.single(TokenKind::LBracket, "[", loc),
            ']' => self.single(TokenKind::RBracket, "]", loc),
            ',' => self.single(TokenKind::Comma, ",", loc),
            ';' => self.single(TokenKind::Semicolon, ";", loc),
            '~' => self.single(TokenKind::Tilde, "~", loc),
            '?' => self.single(TokenKind::Question, "?", loc),
            '@' => self.single(TokenKind::At, "@", loc),
            '"' => self.lex_string(loc),
            '\'' => self.lex_char(loc),
            '/' => self.lex_slash(loc),
            c if c.is_ascii_alphabetic() || c == '_' => self.lex_identifier(loc),
            c if c.is_ascii_digit() => self.lex_number(loc),
            '+' | '-' | '*' | '%' | '=' | '!' | '<' | '>' | '&' | '|' | '^' | ':' | '.' => {
                self.lex_operator(c, loc)
            }
            c => {
                self.cursor.advance();
                self.push_illegal(format!("unexpected character '{c}'"), loc);
            }
        }
    }

    /// Pushes a single-character token and advances.
    fn single(&mut self, kind: TokenKind, lexeme: &str, loc: SourceLocation) {
        self.cursor.advance();
        self.push(kind, lexeme, loc);
    }

    /// Lexes an identifier or keyword.
    fn lex_identifier(&mut self, loc: SourceLocation) {
        let start = self.cursor.position();
        loop {
            let c = self.cursor.current_char();
            if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            self.cursor.advance();
        }
        let lexeme = self.cursor.slice_from(start);
        let kind = keyword_from_ident(lexeme);
        self.push(kind, lexeme, loc);
    }

    /// Lexes an integer or float literal.
    ///
    /// Integers may be decimal or `0x`/`0b`/`0o` prefixed. A float has
    /// exactly one `.` with optional fractional digits; `1..10` stays an
    /// integer followed by the range operator.
    fn lex_number(&mut self, loc: SourceLocation) {
        let start = self.cursor.position();

        if self.cursor.current_char() == '0' {
            let radix = match self.cursor.char_at_byte_offset(1) {
                'x' | 'X' => Some(16),
                'b' | 'B' => Some(2),
                'o' | 'O' => Some(8),
                _ => None,
            };
            if let Some(radix) = radix {
                self.cursor.advance(); // 0
                self.cursor.advance(); // x / b / o
                let digits_start = self.cursor.position();
                while self.cursor.current_char().is_digit(radix) || self.cursor.current_char() == '_'
                {
                    self.cursor.advance();
                }
                if self.cursor.position() == digits_start {
                    let lexeme = self.cursor.slice_from(start);
                    self.push_illegal(format!("invalid numeric literal '{lexeme}'"), loc);
                } else {
                    self.push(TokenKind::IntLiteral, self.cursor.slice_from(start), loc);
                }
                return;
            }
        }

        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        // One '.' makes it a float, unless it begins the '..' operator.
        let mut is_float = false;
        if self.cursor.current_char() == '.' && self.cursor.char_at_byte_offset(1) != '.' {
            is_float = true;
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        let kind = if is_float {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntLiteral
        };
        self.push(kind, self.cursor.slice_from(start), loc);
    }

    /// Lexes a double-quoted string literal.
    ///
    /// The lexeme keeps the raw source text, quotes included, so that it
    /// equals the substring at the token's location; escape processing is
    /// the consumer's job (see [`crate::unescape`]).
    fn lex_string(&mut self, loc: SourceLocation) {
        let start = self.cursor.position();
        self.cursor.advance(); // opening quote

        loop {
            match self.cursor.current_char() {
                '"' => {
                    self.cursor.advance();
                    self.push(TokenKind::StringLiteral, self.cursor.slice_from(start), loc);
                    return;
                }
                '\\' => {
                    self.cursor.advance();
                    if !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                        self.cursor.advance();
                    }
                }
                '\n' | '\0' => {
                    let partial = self.cursor.slice_from(start).to_string();
                    self.push_illegal(format!("unterminated string literal {partial}"), loc);
                    return;
                }
                _ => self.cursor.advance(),
            }
        }
    }

    /// Lexes a single-quoted character literal.
    fn lex_char(&mut self, loc: SourceLocation) {
        let start = self.cursor.position();
        self.cursor.advance(); // opening quote

        match self.cursor.current_char() {
            '\'' => {
                self.cursor.advance();
                self.push_illegal("empty character literal", loc);
                return;
            }
            '\\' => {
                self.cursor.advance();
                if !self.cursor.is_at_end() {
                    self.cursor.advance();
                }
            }
            '\n' | '\0' => {
                self.push_illegal("unterminated character literal", loc);
                return;
            }
            _ => self.cursor.advance(),
        }

        if self.cursor.match_char('\'') {
            self.push(TokenKind::CharLiteral, self.cursor.slice_from(start), loc);
        } else {
            let partial = self.cursor.slice_from(start).to_string();
            self.push_illegal(
                format!("unterminated or overlong character literal {partial}"),
                loc,
            );
        }
    }

    /// Lexes `/`, `/=` or a `//` line comment.
    fn lex_slash(&mut self, loc: SourceLocation) {
        self.cursor.advance();
        if self.cursor.match_char('/') {
            let start = self.cursor.position();
            while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                self.cursor.advance();
            }
            let text = self.cursor.slice_from(start).to_string();
            self.push(TokenKind::Comment, text, loc);
        } else if self.cursor.match_char('=') {
            self.push(TokenKind::SlashEq, "/=", loc);
        } else {
            self.push(TokenKind::Slash, "/", loc);
        }
    }

    /// Lexes multi-character operators with greedy matching.
    fn lex_operator(&mut self, first: char, loc: SourceLocation) {
        self.cursor.advance();
        let (kind, lexeme): (TokenKind, &str) = match first {
            '+' => {
                if self.cursor.match_char('=') {
                    (TokenKind::PlusEq, "+=")
                } else {
                    (TokenKind::Plus, "+")
                }
            }
            '-' => {
                if self.cursor.match_char('>') {
                    (TokenKind::Arrow, "->")
                } else if self.cursor.match_char('=') {
                    (TokenKind::MinusEq, "-=")
                } else {
                    (TokenKind::Minus, "-")
                }
            }
            '*' => {
                if self.cursor.match_char('=') {
                    (TokenKind::StarEq, "*=")
                } else {
                    (TokenKind::Star, "*")
                }
            }
            '%' => {
                if self.cursor.match_char('=') {
                    (TokenKind::PercentEq, "%=")
                } else {
                    (TokenKind::Percent, "%")
                }
            }
            '=' => {
                if self.cursor.match_char('=') {
                    (TokenKind::EqEq, "==")
                } else if self.cursor.match_char('>') {
                    (TokenKind::FatArrow, "=>")
                } else {
                    (TokenKind::Eq, "=")
                }
            }
            '!' => {
                if self.cursor.match_char('=') {
                    (TokenKind::NotEq, "!=")
                } else {
                    (TokenKind::Bang, "!")
                }
            }
            '<' => {
                if self.cursor.match_char('<') {
                    if self.cursor.match_char('=') {
                        (TokenKind::ShlEq, "<<=")
                    } else {
                        (TokenKind::Shl, "<<")
                    }
                } else if self.cursor.match_char('=') {
                    (TokenKind::LtEq, "<=")
                } else {
                    (TokenKind::Lt, "<")
                }
            }
            '>' => {
                if self.cursor.match_char('>') {
                    if self.cursor.match_char('=') {
                        (TokenKind::ShrEq, ">>=")
                    } else {
                        (TokenKind::Shr, ">>")
                    }
                } else if self.cursor.match_char('=') {
                    (TokenKind::GtEq, ">=")
                } else {
                    (TokenKind::Gt, ">")
                }
            }
            '&' => {
                if self.cursor.match_char('&') {
                    (TokenKind::AndAnd, "&&")
                } else if self.cursor.match_char('=') {
                    (TokenKind::AmpEq, "&=")
                } else {
                    (TokenKind::Amp, "&")
                }
            }
            '|' => {
                if self.cursor.match_char('|') {
                    (TokenKind::OrOr, "||")
                } else if self.cursor.match_char('=') {
                    (TokenKind::PipeEq, "|=")
                } else {
                    (TokenKind::Pipe, "|")
                }
            }
            '^' => {
                if self.cursor.match_char('=') {
                    (TokenKind::CaretEq, "^=")
                } else {
                    (TokenKind::Caret, "^")
                }
            }
            ':' => {
                if self.cursor.match_char(':') {
                    (TokenKind::ColonColon, "::")
                } else if self.cursor.match_char('=') {
                    (TokenKind::ColonEq, ":=")
                } else {
                    (TokenKind::Colon, ":")
                }
            }
            '.' => {
                if self.cursor.match_char('.') {
                    (TokenKind::DotDot, "..")
                } else {
                    (TokenKind::Dot, ".")
                }
            }
            _ => unreachable!("lex_operator called with non-operator start"),
        };
        self.push(kind, lexeme, loc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source, "test.vyn")
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn significant(source: &str) -> Vec<TokenKind> {
        kinds(source)
            .into_iter()
            .filter(|k| !matches!(k, TokenKind::Newline | TokenKind::Comment))
            .collect()
    }

    #[test]
    fn test_empty_input_yields_only_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("let x = 42;"),
            vec![
                TokenKind::KwLet,
                TokenKind::Identifier,
                TokenKind::Eq,
                TokenKind::IntLiteral,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lexeme_matches_source_text() {
        let tokens = Lexer::new("foo != \"bar\"", "test.vyn").tokenize();
        assert_eq!(tokens[0].lexeme, "foo");
        assert_eq!(tokens[1].lexeme, "!=");
        assert_eq!(tokens[2].lexeme, "\"bar\"");
    }

    #[test]
    fn test_multi_char_operators_greedy() {
        assert_eq!(
            kinds("<<= >>= << >> <= >= :: := .. -> => && || == !="),
            vec![
                TokenKind::ShlEq,
                TokenKind::ShrEq,
                TokenKind::Shl,
                TokenKind::Shr,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::ColonColon,
                TokenKind::ColonEq,
                TokenKind::DotDot,
                TokenKind::Arrow,
                TokenKind::FatArrow,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_float_vs_range() {
        assert_eq!(
            kinds("3.14 1..10 5."),
            vec![
                TokenKind::FloatLiteral,
                TokenKind::IntLiteral,
                TokenKind::DotDot,
                TokenKind::IntLiteral,
                TokenKind::FloatLiteral,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_prefixed_integers() {
        let tokens = Lexer::new("0xFF 0b1010 0o77", "test.vyn").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::IntLiteral);
        assert_eq!(tokens[0].lexeme, "0xFF");
        assert_eq!(tokens[1].kind, TokenKind::IntLiteral);
        assert_eq!(tokens[2].kind, TokenKind::IntLiteral);
    }

    #[test]
    fn test_bad_hex_literal_is_illegal() {
        let tokens = Lexer::new("0x", "test.vyn").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Illegal);
    }

    #[test]
    fn test_unterminated_string_is_illegal() {
        let tokens = Lexer::new("\"hello", "test.vyn").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Illegal);
        assert!(tokens[0].lexeme.contains("unterminated string"));
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn test_char_literals() {
        let tokens = Lexer::new(r"'a' '\n'", "test.vyn").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::CharLiteral);
        assert_eq!(tokens[0].lexeme, "'a'");
        assert_eq!(tokens[1].kind, TokenKind::CharLiteral);
        assert_eq!(tokens[1].lexeme, r"'\n'");
    }

    #[test]
    fn test_comment_token() {
        let tokens = Lexer::new("x // trailing note\n", "test.vyn").tokenize();
        assert_eq!(tokens[1].kind, TokenKind::Comment);
        assert_eq!(tokens[1].lexeme, " trailing note");
    }

    #[test]
    fn test_indentation_emits_indent_dedent() {
        let source = "fn main()\n  let x = 1\n";
        assert_eq!(
            significant(source),
            vec![
                TokenKind::KwFn,
                TokenKind::Identifier,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Indent,
                TokenKind::KwLet,
                TokenKind::Identifier,
                TokenKind::Eq,
                TokenKind::IntLiteral,
                TokenKind::Dedent,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_nested_indentation() {
        let source = "a\n  b\n    c\nd\n";
        let ks = significant(source);
        let indents = ks.iter().filter(|k| **k == TokenKind::Indent).count();
        let dedents = ks.iter().filter(|k| **k == TokenKind::Dedent).count();
        assert_eq!(indents, 2);
        assert_eq!(dedents, 2);
    }

    #[test]
    fn test_blank_lines_do_not_affect_stack() {
        let source = "a\n  b\n\n\n  c\n";
        let ks = significant(source);
        assert_eq!(
            ks.iter().filter(|k| **k == TokenKind::Indent).count(),
            1,
            "blank lines must not open or close blocks"
        );
    }

    #[test]
    fn test_braces_suppress_markers() {
        let source = "fn main() {\n  let x = 1;\n}\n";
        let ks = kinds(source);
        assert!(!ks.contains(&TokenKind::Indent));
        assert!(!ks.contains(&TokenKind::Dedent));
        // Newlines inside the braces are insignificant too.
        assert_eq!(
            ks.iter()
                .filter(|k| **k == TokenKind::Newline)
                .count(),
            1,
            "only the newline after the closing brace is in indentation mode"
        );
    }

    #[test]
    fn test_tab_in_indentation_is_illegal() {
        let tokens = Lexer::new("fn main()\n\tlet x = 1\n", "test.vyn").tokenize();
        let illegal = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Illegal)
            .expect("tab should produce an illegal token");
        assert_eq!(illegal.location.line, 2);
        assert_eq!(illegal.location.column, 1);
        assert!(illegal.lexeme.contains("tab"));
    }

    #[test]
    fn test_inconsistent_dedent_is_illegal() {
        // Dedent to width 1 when the stack holds [0, 4].
        let source = "a\n    b\n c\n";
        let tokens = Lexer::new(source, "test.vyn").tokenize();
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::Illegal && t.lexeme.contains("indentation")));
    }

    #[test]
    fn test_unmatched_closing_brace() {
        let tokens = Lexer::new("}", "test.vyn").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Illegal);
        assert!(tokens[0].lexeme.contains("unmatched"));
    }

    #[test]
    fn test_unclosed_brace_at_eof() {
        let tokens = Lexer::new("fn main() {\n  let x = 1;\n", "test.vyn").tokenize();
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::Illegal && t.lexeme.contains("unmatched '{'")));
    }

    #[test]
    fn test_dedents_flushed_at_eof() {
        let source = "a\n  b\n    c";
        let ks = kinds(source);
        let dedents = ks.iter().filter(|k| **k == TokenKind::Dedent).count();
        assert_eq!(dedents, 2);
        assert_eq!(*ks.last().unwrap(), TokenKind::Eof);
    }

    #[test]
    fn test_unexpected_character() {
        let tokens = Lexer::new("let # = 1", "test.vyn").tokenize();
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::Illegal && t.lexeme.contains('#')));
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn test_locations_are_one_based() {
        let tokens = Lexer::new("a b", "test.vyn").tokenize();
        assert_eq!(tokens[0].location.line, 1);
        assert_eq!(tokens[0].location.column, 1);
        assert_eq!(tokens[1].location.column, 3);
    }
}
