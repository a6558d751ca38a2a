//! Token definitions for the Vyn language.
//!
//! [`TokenKind`] is a closed set of 111 tags. Downstream tools pattern
//! match on kinds, so the set only grows by appending variants. The six
//! synthetic kinds `Newline`, `Indent`, `Dedent`, `Comment`, `Eof` and
//! `Illegal` carry structure the grammar needs but the source text does
//! not spell out (except `Comment`, whose lexeme is the comment text, and
//! `Illegal`, whose lexeme is the lexer's error description).

use std::fmt;

use rustc_hash::FxHashMap;
use std::sync::OnceLock;

use vync_util::SourceLocation;

/// The kind of a lexical token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================================================
    // LITERALS AND IDENTIFIERS
    // =========================================================================
    /// Identifier: `[A-Za-z_][A-Za-z0-9_]*` not in the keyword table.
    Identifier,
    /// Integer literal: decimal, `0x`, `0b` or `0o`.
    IntLiteral,
    /// Float literal: digits, one `.`, optional fractional digits.
    FloatLiteral,
    /// Double-quoted string literal (escapes processed in the lexeme).
    StringLiteral,
    /// Single-quoted character literal.
    CharLiteral,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    /// "let"
    KwLet,
    /// "var"
    KwVar,
    /// "const"
    KwConst,
    /// "auto"
    KwAuto,
    /// "if"
    KwIf,
    /// "else"
    KwElse,
    /// "while"
    KwWhile,
    /// "for"
    KwFor,
    /// "return"
    KwReturn,
    /// "break"
    KwBreak,
    /// "continue"
    KwContinue,
    /// "null"
    KwNull,
    /// "nil"
    KwNil,
    /// "true"
    KwTrue,
    /// "false"
    KwFalse,
    /// "fn"
    KwFn,
    /// "struct"
    KwStruct,
    /// "enum"
    KwEnum,
    /// "trait"
    KwTrait,
    /// "impl"
    KwImpl,
    /// "type"
    KwType,
    /// "module"
    KwModule,
    /// "use"
    KwUse,
    /// "pub"
    KwPub,
    /// "mut"
    KwMut,
    /// "try"
    KwTry,
    /// "catch"
    KwCatch,
    /// "finally"
    KwFinally,
    /// "defer"
    KwDefer,
    /// "match"
    KwMatch,
    /// "scoped"
    KwScoped,
    /// "ref"
    KwRef,
    /// "extern"
    KwExtern,
    /// "as"
    KwAs,
    /// "in"
    KwIn,
    /// "class"
    KwClass,
    /// "template"
    KwTemplate,
    /// "import"
    KwImport,
    /// "smuggle"
    KwSmuggle,
    /// "await"
    KwAwait,
    /// "async"
    KwAsync,
    /// "operator"
    KwOperator,
    /// "my" (ownership family; also valid as a named type)
    KwMy,
    /// "our"
    KwOur,
    /// "their"
    KwTheir,
    /// "ptr"
    KwPtr,
    /// "borrow"
    KwBorrow,
    /// "view"
    KwView,
    /// "unsafe"
    KwUnsafe,
    /// "yield"
    KwYield,
    /// "assert"
    KwAssert,

    // =========================================================================
    // OPERATORS
    // =========================================================================
    /// "+"
    Plus,
    /// "-"
    Minus,
    /// "*"
    Star,
    /// "/"
    Slash,
    /// "%"
    Percent,
    /// "="
    Eq,
    /// "=="
    EqEq,
    /// "!="
    NotEq,
    /// "<"
    Lt,
    /// ">"
    Gt,
    /// "<="
    LtEq,
    /// ">="
    GtEq,
    /// "&&"
    AndAnd,
    /// "||"
    OrOr,
    /// "!"
    Bang,
    /// "&"
    Amp,
    /// "|"
    Pipe,
    /// "^"
    Caret,
    /// "~"
    Tilde,
    /// "<<"
    Shl,
    /// ">>"
    Shr,
    /// ".."
    DotDot,
    /// "+="
    PlusEq,
    /// "-="
    MinusEq,
    /// "*="
    StarEq,
    /// "/="
    SlashEq,
    /// "%="
    PercentEq,
    /// "<<="
    ShlEq,
    /// ">>="
    ShrEq,
    /// "&="
    AmpEq,
    /// "|="
    PipeEq,
    /// "^="
    CaretEq,
    /// ":="
    ColonEq,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    /// "("
    LParen,
    /// ")"
    RParen,
    /// "{"
    LBrace,
    /// "}"
    RBrace,
    /// "["
    LBracket,
    /// "]"
    RBracket,
    /// ","
    Comma,
    /// "."
    Dot,
    /// ":"
    Colon,
    /// ";"
    Semicolon,
    /// "->"
    Arrow,
    /// "=>"
    FatArrow,
    /// "::"
    ColonColon,
    /// "@"
    At,
    /// "_" standing alone
    Underscore,
    /// "?"
    Question,

    // =========================================================================
    // SYNTHETIC MARKERS
    // =========================================================================
    /// End of a logical line (indentation mode only).
    Newline,
    /// Opening of an indentation-based block.
    Indent,
    /// Closing of an indentation-based block.
    Dedent,
    /// A `//` line comment; the lexeme is the comment text.
    Comment,
    /// End of input; always the final token.
    Eof,
    /// A lexical error; the lexeme is the error description.
    Illegal,
}

impl TokenKind {
    /// Returns true for the marker kinds the parser skips between items.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Comment)
    }

    /// Returns true for keyword kinds.
    pub fn is_keyword(self) -> bool {
        keyword_table().values().any(|&k| k == self)
    }

    /// Returns true for the literal kinds (including the keyword literals
    /// `true`, `false`, `null` and `nil`).
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::IntLiteral
                | TokenKind::FloatLiteral
                | TokenKind::StringLiteral
                | TokenKind::CharLiteral
                | TokenKind::KwTrue
                | TokenKind::KwFalse
                | TokenKind::KwNull
                | TokenKind::KwNil
        )
    }

    /// Returns true for tokens usable as binary or unary operator symbols
    /// (used by `operator+` style function names).
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::EqEq
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::LtEq
                | TokenKind::GtEq
                | TokenKind::AndAnd
                | TokenKind::OrOr
                | TokenKind::Bang
                | TokenKind::Amp
                | TokenKind::Pipe
                | TokenKind::Caret
                | TokenKind::Tilde
                | TokenKind::Shl
                | TokenKind::Shr
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::IntLiteral => "integer literal",
            TokenKind::FloatLiteral => "float literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::CharLiteral => "character literal",
            TokenKind::KwLet => "'let'",
            TokenKind::KwVar => "'var'",
            TokenKind::KwConst => "'const'",
            TokenKind::KwAuto => "'auto'",
            TokenKind::KwIf => "'if'",
            TokenKind::KwElse => "'else'",
            TokenKind::KwWhile => "'while'",
            TokenKind::KwFor => "'for'",
            TokenKind::KwReturn => "'return'",
            TokenKind::KwBreak => "'break'",
            TokenKind::KwContinue => "'continue'",
            TokenKind::KwNull => "'null'",
            TokenKind::KwNil => "'nil'",
            TokenKind::KwTrue => "'true'",
            TokenKind::KwFalse => "'false'",
            TokenKind::KwFn => "'fn'",
            TokenKind::KwStruct => "'struct'",
            TokenKind::KwEnum => "'enum'",
            TokenKind::KwTrait => "'trait'",
            TokenKind::KwImpl => "'impl'",
            TokenKind::KwType => "'type'",
            TokenKind::KwModule => "'module'",
            TokenKind::KwUse => "'use'",
            TokenKind::KwPub => "'pub'",
            TokenKind::KwMut => "'mut'",
            TokenKind::KwTry => "'try'",
            TokenKind::KwCatch => "'catch'",
            TokenKind::KwFinally => "'finally'",
            TokenKind::KwDefer => "'defer'",
            TokenKind::KwMatch => "'match'",
            TokenKind::KwScoped => "'scoped'",
            TokenKind::KwRef => "'ref'",
            TokenKind::KwExtern => "'extern'",
            TokenKind::KwAs => "'as'",
            TokenKind::KwIn => "'in'",
            TokenKind::KwClass => "'class'",
            TokenKind::KwTemplate => "'template'",
            TokenKind::KwImport => "'import'",
            TokenKind::KwSmuggle => "'smuggle'",
            TokenKind::KwAwait => "'await'",
            TokenKind::KwAsync => "'async'",
            TokenKind::KwOperator => "'operator'",
            TokenKind::KwMy => "'my'",
            TokenKind::KwOur => "'our'",
            TokenKind::KwTheir => "'their'",
            TokenKind::KwPtr => "'ptr'",
            TokenKind::KwBorrow => "'borrow'",
            TokenKind::KwView => "'view'",
            TokenKind::KwUnsafe => "'unsafe'",
            TokenKind::KwYield => "'yield'",
            TokenKind::KwAssert => "'assert'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Eq => "'='",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::LtEq => "'<='",
            TokenKind::GtEq => "'>='",
            TokenKind::AndAnd => "'&&'",
            TokenKind::OrOr => "'||'",
            TokenKind::Bang => "'!'",
            TokenKind::Amp => "'&'",
            TokenKind::Pipe => "'|'",
            TokenKind::Caret => "'^'",
            TokenKind::Tilde => "'~'",
            TokenKind::Shl => "'<<'",
            TokenKind::Shr => "'>>'",
            TokenKind::DotDot => "'..'",
            TokenKind::PlusEq => "'+='",
            TokenKind::MinusEq => "'-='",
            TokenKind::StarEq => "'*='",
            TokenKind::SlashEq => "'/='",
            TokenKind::PercentEq => "'%='",
            TokenKind::ShlEq => "'<<='",
            TokenKind::ShrEq => "'>>='",
            TokenKind::AmpEq => "'&='",
            TokenKind::PipeEq => "'|='",
            TokenKind::CaretEq => "'^='",
            TokenKind::ColonEq => "':='",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Colon => "':'",
            TokenKind::Semicolon => "';'",
            TokenKind::Arrow => "'->'",
            TokenKind::FatArrow => "'=>'",
            TokenKind::ColonColon => "'::'",
            TokenKind::At => "'@'",
            TokenKind::Underscore => "'_'",
            TokenKind::Question => "'?'",
            TokenKind::Newline => "newline",
            TokenKind::Indent => "INDENT",
            TokenKind::Dedent => "DEDENT",
            TokenKind::Comment => "comment",
            TokenKind::Eof => "end of file",
            TokenKind::Illegal => "illegal token",
        };
        f.write_str(text)
    }
}

/// A lexical token: kind, exact source text and position.
///
/// For synthetic markers the lexeme is empty, except `Comment` (comment
/// text) and `Illegal` (error description).
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// What category of token this is.
    pub kind: TokenKind,
    /// The exact source text, where applicable.
    pub lexeme: String,
    /// Where the token starts.
    pub location: SourceLocation,
}

impl Token {
    /// Creates a token.
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            location,
        }
    }

    /// Creates a synthetic token with an empty lexeme.
    pub fn synthetic(kind: TokenKind, location: SourceLocation) -> Self {
        Self::new(kind, "", location)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lexeme.is_empty() {
            write!(f, "{} at {}", self.kind, self.location)
        } else {
            write!(f, "{} '{}' at {}", self.kind, self.lexeme, self.location)
        }
    }
}

fn keyword_table() -> &'static FxHashMap<&'static str, TokenKind> {
    static TABLE: OnceLock<FxHashMap<&'static str, TokenKind>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut m = FxHashMap::default();
        m.insert("let", TokenKind::KwLet);
        m.insert("var", TokenKind::KwVar);
        m.insert("const", TokenKind::KwConst);
        m.insert("auto", TokenKind::KwAuto);
        m.insert("if", TokenKind::KwIf);
        m.insert("else", TokenKind::KwElse);
        m.insert("while", TokenKind::KwWhile);
        m.insert("for", TokenKind::KwFor);
        m.insert("return", TokenKind::KwReturn);
        m.insert("break", TokenKind::KwBreak);
        m.insert("continue", TokenKind::KwContinue);
        m.insert("null", TokenKind::KwNull);
        m.insert("nil", TokenKind::KwNil);
        m.insert("true", TokenKind::KwTrue);
        m.insert("false", TokenKind::KwFalse);
        m.insert("fn", TokenKind::KwFn);
        m.insert("struct", TokenKind::KwStruct);
        m.insert("enum", TokenKind::KwEnum);
        m.insert("trait", TokenKind::KwTrait);
        m.insert("impl", TokenKind::KwImpl);
        m.insert("type", TokenKind::KwType);
        m.insert("module", TokenKind::KwModule);
        m.insert("use", TokenKind::KwUse);
        m.insert("pub", TokenKind::KwPub);
        m.insert("mut", TokenKind::KwMut);
        m.insert("try", TokenKind::KwTry);
        m.insert("catch", TokenKind::KwCatch);
        m.insert("finally", TokenKind::KwFinally);
        m.insert("defer", TokenKind::KwDefer);
        m.insert("match", TokenKind::KwMatch);
        m.insert("scoped", TokenKind::KwScoped);
        m.insert("ref", TokenKind::KwRef);
        m.insert("extern", TokenKind::KwExtern);
        m.insert("as", TokenKind::KwAs);
        m.insert("in", TokenKind::KwIn);
        m.insert("class", TokenKind::KwClass);
        m.insert("template", TokenKind::KwTemplate);
        m.insert("import", TokenKind::KwImport);
        m.insert("smuggle", TokenKind::KwSmuggle);
        m.insert("await", TokenKind::KwAwait);
        m.insert("async", TokenKind::KwAsync);
        m.insert("operator", TokenKind::KwOperator);
        m.insert("my", TokenKind::KwMy);
        m.insert("our", TokenKind::KwOur);
        m.insert("their", TokenKind::KwTheir);
        m.insert("ptr", TokenKind::KwPtr);
        m.insert("borrow", TokenKind::KwBorrow);
        m.insert("view", TokenKind::KwView);
        m.insert("unsafe", TokenKind::KwUnsafe);
        m.insert("yield", TokenKind::KwYield);
        m.insert("assert", TokenKind::KwAssert);
        m
    })
}

/// Classifies an identifier lexeme: keyword kind, or `Identifier`.
///
/// The memory intrinsics `loc`, `addr`, `at` and `from` are deliberately
/// absent from the keyword table; they are ordinary identifiers that the
/// parser recognizes only in call position.
pub fn keyword_from_ident(lexeme: &str) -> TokenKind {
    if lexeme == "_" {
        return TokenKind::Underscore;
    }
    keyword_table()
        .get(lexeme)
        .copied()
        .unwrap_or(TokenKind::Identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(keyword_from_ident("fn"), TokenKind::KwFn);
        assert_eq!(keyword_from_ident("unsafe"), TokenKind::KwUnsafe);
        assert_eq!(keyword_from_ident("smuggle"), TokenKind::KwSmuggle);
        assert_eq!(keyword_from_ident("main"), TokenKind::Identifier);
    }

    #[test]
    fn test_intrinsics_are_not_keywords() {
        for name in ["loc", "addr", "at", "from"] {
            assert_eq!(keyword_from_ident(name), TokenKind::Identifier);
        }
    }

    #[test]
    fn test_lone_underscore() {
        assert_eq!(keyword_from_ident("_"), TokenKind::Underscore);
        assert_eq!(keyword_from_ident("_x"), TokenKind::Identifier);
    }

    #[test]
    fn test_trivia_kinds() {
        assert!(TokenKind::Newline.is_trivia());
        assert!(TokenKind::Comment.is_trivia());
        assert!(!TokenKind::Indent.is_trivia());
        assert!(!TokenKind::Eof.is_trivia());
    }

    #[test]
    fn test_literal_kinds() {
        assert!(TokenKind::IntLiteral.is_literal());
        assert!(TokenKind::KwTrue.is_literal());
        assert!(TokenKind::KwNil.is_literal());
        assert!(!TokenKind::Identifier.is_literal());
    }

    #[test]
    fn test_token_display() {
        let tok = Token::new(
            TokenKind::Identifier,
            "main",
            SourceLocation::new("a.vyn", 1, 4),
        );
        assert_eq!(tok.to_string(), "identifier 'main' at a.vyn:1:4");
    }
}
