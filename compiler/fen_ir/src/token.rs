//! Token types for the Fen scanner and layout engine.

use std::fmt;

use crate::{Name, SourceRange};

/// A token with its range in the source.
///
/// Tokens are produced once by the scanner. The layout engine may
/// *reclassify* the stream by inserting synthetic `{` `;` `}` (and `in`)
/// tokens; a synthetic token carries the range of the token whose position
/// triggered its insertion.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub range: SourceRange,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, range: SourceRange) -> Self {
        Token { kind, range }
    }

    /// Create a dummy token for testing/generated code.
    pub fn dummy(kind: TokenKind) -> Self {
        Token {
            kind,
            range: SourceRange::DUMMY,
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.range)
    }
}

/// Token kinds for Fen.
///
/// Closed enum. Double literals store bits as u64 for `Eq`/`Hash`;
/// identifiers, operators, and string literals use interned [`Name`].
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    /// Integer literal: 42, 1000
    Int(i64),
    /// Double literal: 3.14 (stored as bits for Eq/Hash)
    Double(u64),
    /// Char literal: 'a', '\n'
    Char(char),
    /// String literal (interned): "hello"
    String(Name),
    /// Boolean literal: True, False
    Bool(bool),

    /// Identifier (interned): names, member accesses, and bracket-pair
    /// identifiers such as `()`, `[]`, `(,)`, `(,,)`
    Ident(Name),
    /// Operator identifier (interned): `+`, `:`, `>>=`, backtick-quoted words
    Operator(Name),

    // Keywords
    Module,
    Import,
    Where,
    Let,
    In,
    Do,
    On,
    Match,
    Data,
    Class,
    If,
    Then,
    Else,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LSquare,
    RSquare,
    Comma,
    Semicolon,
    Equals,
    Pipe,
    Lambda,
    Arrow,
    DoubleArrow,
    DoubleColon,
    Dot,

    Eof,
}

impl TokenKind {
    /// Keywords that open an implicit layout block.
    #[inline]
    pub fn opens_layout(&self) -> bool {
        matches!(
            self,
            TokenKind::Where | TokenKind::Do | TokenKind::On | TokenKind::Let
        )
    }

    /// Check whether this kind is an opening delimiter (for the layout
    /// engine's disabled-state depth tracking).
    #[inline]
    pub fn opens_delimiter(&self) -> bool {
        matches!(
            self,
            TokenKind::LBrace | TokenKind::LParen | TokenKind::LSquare
        )
    }

    /// Check whether this kind is a closing delimiter.
    #[inline]
    pub fn closes_delimiter(&self) -> bool {
        matches!(
            self,
            TokenKind::RBrace | TokenKind::RParen | TokenKind::RSquare
        )
    }

    /// Keyword lookup for the scanner.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        Some(match text {
            "module" => TokenKind::Module,
            "import" => TokenKind::Import,
            "where" => TokenKind::Where,
            "let" => TokenKind::Let,
            "in" => TokenKind::In,
            "do" => TokenKind::Do,
            "on" => TokenKind::On,
            "match" => TokenKind::Match,
            "data" => TokenKind::Data,
            "class" => TokenKind::Class,
            "if" => TokenKind::If,
            "then" => TokenKind::Then,
            "else" => TokenKind::Else,
            _ => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(v) => write!(f, "{v}"),
            TokenKind::Double(bits) => write!(f, "{}", f64::from_bits(*bits)),
            TokenKind::Char(c) => write!(f, "{c:?}"),
            TokenKind::String(_) => write!(f, "string literal"),
            TokenKind::Bool(true) => write!(f, "True"),
            TokenKind::Bool(false) => write!(f, "False"),
            TokenKind::Ident(_) => write!(f, "identifier"),
            TokenKind::Operator(_) => write!(f, "operator"),
            TokenKind::Module => write!(f, "module"),
            TokenKind::Import => write!(f, "import"),
            TokenKind::Where => write!(f, "where"),
            TokenKind::Let => write!(f, "let"),
            TokenKind::In => write!(f, "in"),
            TokenKind::Do => write!(f, "do"),
            TokenKind::On => write!(f, "on"),
            TokenKind::Match => write!(f, "match"),
            TokenKind::Data => write!(f, "data"),
            TokenKind::Class => write!(f, "class"),
            TokenKind::If => write!(f, "if"),
            TokenKind::Then => write!(f, "then"),
            TokenKind::Else => write!(f, "else"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::LSquare => write!(f, "["),
            TokenKind::RSquare => write!(f, "]"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Equals => write!(f, "="),
            TokenKind::Pipe => write!(f, "|"),
            TokenKind::Lambda => write!(f, "\\"),
            TokenKind::Arrow => write!(f, "->"),
            TokenKind::DoubleArrow => write!(f, "=>"),
            TokenKind::DoubleColon => write!(f, "::"),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}
