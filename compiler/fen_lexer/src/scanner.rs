//! Hand-written scanner.
//!
//! `next_token` dispatches on the current character to a focused method per
//! token family. Faults are reported as diagnostics with exact ranges, never
//! as panics; after a fault the cursor has consumed the offending text, so
//! scanning can continue.
//!
//! The fiddly parts, all layout-independent:
//! - dot as member access (`xs.head`) vs dot as operator (`(.)`, `f . g`)
//! - bracket-pair identifiers: `()`, `[]`, and tuple constructors
//!   `(,)`, `(,,)`, ...
//! - nested `/* */` block comments (depth-counted, not first-close)
//! - backtick-quoted operators: `` `div` `` is an infix use of `div`;
//!   reserved words inside backticks are a fault

use fen_diagnostic::{Diagnostic, ErrorCode};
use fen_ir::{Point, SharedInterner, SourceRange, Token, TokenKind};

use crate::cursor::Cursor;

/// Characters that may form an operator run.
fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '!' | '#' | '$' | '%' | '&' | '*' | '+' | '-' | '.' | '/' | ':' | '<' | '='
            | '>' | '?' | '@' | '^' | '|' | '~'
    )
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '\''
}

/// What the previous token was, as far as dot disambiguation cares: only a
/// value-shaped token glued directly to a `.` makes the dot a member access.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum PrevToken {
    None,
    /// Identifier, `)`, or `]` ending at the recorded offset.
    AccessTarget(u32),
    Other,
}

/// The scanner: raw source text in, one token at a time out.
pub struct Scanner<'src> {
    cursor: Cursor<'src>,
    interner: SharedInterner,
    prev: PrevToken,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str, interner: SharedInterner) -> Self {
        Scanner {
            cursor: Cursor::new(source),
            interner,
            prev: PrevToken::None,
        }
    }

    /// Produce the next token.
    ///
    /// Returns `TokenKind::Eof` (repeatedly, if called again) once the
    /// source is exhausted.
    pub fn next_token(&mut self) -> Result<Token, Diagnostic> {
        self.skip_trivia()?;
        let start = self.cursor.point();
        let Some(c) = self.cursor.current() else {
            return Ok(Token::new(TokenKind::Eof, SourceRange::point(start)));
        };

        let kind = match c {
            c if is_identifier_start(c) => self.identifier(start),
            c if c.is_ascii_digit() => self.number(start)?,
            '"' => self.string(start)?,
            '\'' => self.char_literal(start)?,
            '`' => self.quoted_operator(start)?,
            '(' => self.open_paren(),
            '[' => self.open_square(),
            ')' => self.single(TokenKind::RParen),
            ']' => self.single(TokenKind::RSquare),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            ',' => self.single(TokenKind::Comma),
            ';' => self.single(TokenKind::Semicolon),
            '\\' => self.single(TokenKind::Lambda),
            c if is_operator_char(c) => self.operator(start),
            _ => {
                self.cursor.bump();
                let range = SourceRange::new(start, self.cursor.point());
                return Err(Diagnostic::error(
                    ErrorCode::E0008,
                    format!("unexpected character {c:?}"),
                    range,
                ));
            }
        };

        self.prev = match kind {
            TokenKind::Ident(_) | TokenKind::RParen | TokenKind::RSquare => {
                PrevToken::AccessTarget(self.cursor.point().offset)
            }
            _ => PrevToken::Other,
        };
        let range = SourceRange::new(start, self.cursor.point());
        Ok(Token::new(kind, range))
    }

    /// Skip whitespace and comments. Block comments nest.
    fn skip_trivia(&mut self) -> Result<(), Diagnostic> {
        loop {
            match self.cursor.current() {
                Some(c) if c.is_whitespace() => {
                    self.cursor.bump();
                }
                Some('/') if self.cursor.peek() == Some('/') => {
                    self.cursor.bump_while(|c| c != '\n');
                }
                Some('/') if self.cursor.peek() == Some('*') => {
                    self.block_comment()?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn block_comment(&mut self) -> Result<(), Diagnostic> {
        let start = self.cursor.point();
        self.cursor.bump_n(2); // consume `/*`
        let mut depth = 1u32;
        while depth > 0 {
            match (self.cursor.current(), self.cursor.peek()) {
                (Some('/'), Some('*')) => {
                    self.cursor.bump_n(2);
                    depth += 1;
                }
                (Some('*'), Some('/')) => {
                    self.cursor.bump_n(2);
                    depth -= 1;
                }
                (Some(_), _) => {
                    self.cursor.bump();
                }
                (None, _) => {
                    return Err(Diagnostic::error(
                        ErrorCode::E0006,
                        "unterminated block comment",
                        SourceRange::new(start, self.cursor.point()),
                    ));
                }
            }
        }
        Ok(())
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.cursor.bump();
        kind
    }

    fn identifier(&mut self, start: Point) -> TokenKind {
        self.cursor.bump_while(is_identifier_continue);
        let text = self.cursor.slice_from(start);
        if let Some(keyword) = TokenKind::keyword(text) {
            return keyword;
        }
        match text {
            "True" => TokenKind::Bool(true),
            "False" => TokenKind::Bool(false),
            _ => TokenKind::Ident(self.interner.intern(text)),
        }
    }

    fn number(&mut self, start: Point) -> Result<TokenKind, Diagnostic> {
        self.cursor.bump_while(|c| c.is_ascii_digit());
        let mut is_double = false;
        if self.cursor.current() == Some('.') {
            match self.cursor.peek() {
                Some(c) if c.is_ascii_digit() => {
                    is_double = true;
                    self.cursor.bump(); // `.`
                    self.cursor.bump_while(|c| c.is_ascii_digit());
                }
                _ => {
                    // `1.` with no fraction digits
                    self.cursor.bump();
                    return Err(self.malformed_number(start));
                }
            }
        }
        // A literal running straight into identifier characters (`12abc`)
        // is one malformed token, not two tokens.
        if self.cursor.current().is_some_and(is_identifier_start) {
            self.cursor.bump_while(is_identifier_continue);
            return Err(self.malformed_number(start));
        }
        let text = self.cursor.slice_from(start);
        if is_double {
            match text.parse::<f64>() {
                Ok(value) => Ok(TokenKind::Double(value.to_bits())),
                Err(_) => Err(self.malformed_number(start)),
            }
        } else {
            match text.parse::<i64>() {
                Ok(value) => Ok(TokenKind::Int(value)),
                Err(_) => Err(self.malformed_number(start)),
            }
        }
    }

    fn malformed_number(&self, start: Point) -> Diagnostic {
        let range = SourceRange::new(start, self.cursor.point());
        Diagnostic::error(
            ErrorCode::E0001,
            format!("malformed numeric literal `{}`", self.cursor.slice_from(start)),
            range,
        )
    }

    fn string(&mut self, start: Point) -> Result<TokenKind, Diagnostic> {
        self.cursor.bump(); // opening quote
        let mut content = String::new();
        loop {
            match self.cursor.current() {
                Some('"') => {
                    self.cursor.bump();
                    return Ok(TokenKind::String(self.interner.intern(&content)));
                }
                Some('\\') => content.push(self.escape()?),
                Some('\n') | None => {
                    return Err(Diagnostic::error(
                        ErrorCode::E0002,
                        "unterminated string literal",
                        SourceRange::new(start, self.cursor.point()),
                    ));
                }
                Some(c) => {
                    self.cursor.bump();
                    content.push(c);
                }
            }
        }
    }

    fn char_literal(&mut self, start: Point) -> Result<TokenKind, Diagnostic> {
        self.cursor.bump(); // opening quote
        let c = match self.cursor.current() {
            Some('\'') => {
                self.cursor.bump();
                return Err(Diagnostic::error(
                    ErrorCode::E0005,
                    "empty character literal",
                    SourceRange::new(start, self.cursor.point()),
                ));
            }
            Some('\\') => self.escape()?,
            Some('\n') | None => {
                return Err(Diagnostic::error(
                    ErrorCode::E0003,
                    "unterminated character literal",
                    SourceRange::new(start, self.cursor.point()),
                ));
            }
            Some(c) => {
                self.cursor.bump();
                c
            }
        };
        match self.cursor.current() {
            Some('\'') => {
                self.cursor.bump();
                Ok(TokenKind::Char(c))
            }
            Some('\n') | None => Err(Diagnostic::error(
                ErrorCode::E0003,
                "unterminated character literal",
                SourceRange::new(start, self.cursor.point()),
            )),
            Some(_) => {
                // Consume through the closing quote (or line end) so the
                // next token starts clean.
                self.cursor.bump_while(|c| c != '\'' && c != '\n');
                self.cursor.bump();
                Err(Diagnostic::error(
                    ErrorCode::E0005,
                    "character literal holds more than one character",
                    SourceRange::new(start, self.cursor.point()),
                ))
            }
        }
    }

    /// Cook one escape sequence; the cursor sits on the backslash.
    fn escape(&mut self) -> Result<char, Diagnostic> {
        let start = self.cursor.point();
        self.cursor.bump(); // backslash
        let Some(c) = self.cursor.current() else {
            return Err(self.invalid_escape(start));
        };
        self.cursor.bump();
        match c {
            'n' => Ok('\n'),
            't' => Ok('\t'),
            'r' => Ok('\r'),
            '0' => Ok('\0'),
            '\\' => Ok('\\'),
            '\'' => Ok('\''),
            '"' => Ok('"'),
            'x' => self.numeric_escape(start, 16, 2),
            'o' => self.numeric_escape(start, 8, 3),
            _ => Err(self.invalid_escape(start)),
        }
    }

    /// Cook `\xHH` or `\oOOO`: exactly `digits` digits in `radix`.
    fn numeric_escape(&mut self, start: Point, radix: u32, digits: u32) -> Result<char, Diagnostic> {
        let mut value = 0u32;
        for _ in 0..digits {
            let Some(digit) = self.cursor.current().and_then(|c| c.to_digit(radix)) else {
                return Err(self.invalid_escape(start));
            };
            self.cursor.bump();
            value = value * radix + digit;
        }
        char::from_u32(value).ok_or_else(|| self.invalid_escape(start))
    }

    fn invalid_escape(&self, start: Point) -> Diagnostic {
        Diagnostic::error(
            ErrorCode::E0004,
            format!("invalid escape sequence `{}`", self.cursor.slice_from(start)),
            SourceRange::new(start, self.cursor.point()),
        )
    }

    /// `` `word` ``: an ordinary identifier used in operator position.
    fn quoted_operator(&mut self, start: Point) -> Result<TokenKind, Diagnostic> {
        self.cursor.bump(); // opening backtick
        let word_start = self.cursor.point();
        self.cursor.bump_while(is_identifier_continue);
        let word = self.cursor.slice_from(word_start).to_string();
        if self.cursor.current() != Some('`') || word.is_empty() {
            return Err(Diagnostic::error(
                ErrorCode::E0008,
                "malformed backtick-quoted operator",
                SourceRange::new(start, self.cursor.point()),
            ));
        }
        self.cursor.bump(); // closing backtick
        if TokenKind::keyword(&word).is_some() {
            return Err(Diagnostic::error(
                ErrorCode::E0007,
                format!("reserved word `{word}` cannot be quoted as an operator"),
                SourceRange::new(start, self.cursor.point()),
            ));
        }
        Ok(TokenKind::Operator(self.interner.intern(&word)))
    }

    /// `(` or a bracket-pair identifier: `()` unit, `(,)` `(,,)` ... tuple
    /// constructors. Decided by lookahead, never by backtracking.
    fn open_paren(&mut self) -> TokenKind {
        let rest = self.cursor.rest();
        let mut chars = rest.chars().skip(1);
        let mut commas = 0usize;
        loop {
            match chars.next() {
                Some(',') => commas += 1,
                Some(')') => {
                    // consume `(`, commas, `)`
                    self.cursor.bump_n(commas + 2);
                    let name = if commas == 0 {
                        "()".to_string()
                    } else {
                        format!("({})", ",".repeat(commas))
                    };
                    return TokenKind::Ident(self.interner.intern(&name));
                }
                _ => break,
            }
        }
        self.single(TokenKind::LParen)
    }

    /// `[` or the empty-list identifier `[]`.
    fn open_square(&mut self) -> TokenKind {
        if self.cursor.peek() == Some(']') {
            self.cursor.bump_n(2);
            return TokenKind::Ident(self.interner.intern("[]"));
        }
        self.single(TokenKind::LSquare)
    }

    /// An operator run, with the dot special case carved out first.
    fn operator(&mut self, start: Point) -> TokenKind {
        // `xs.head`: a dot glued between a value-shaped token and an
        // identifier is member access. `f . g`, `(.)`, and `..` are the
        // operator `.`.
        if self.cursor.current() == Some('.')
            && self.prev == PrevToken::AccessTarget(start.offset)
            && self.cursor.peek().is_some_and(is_identifier_start)
        {
            self.cursor.bump();
            return TokenKind::Dot;
        }
        self.cursor.bump_while(is_operator_char);
        match self.cursor.slice_from(start) {
            "=" => TokenKind::Equals,
            "|" => TokenKind::Pipe,
            "->" => TokenKind::Arrow,
            "=>" => TokenKind::DoubleArrow,
            "::" => TokenKind::DoubleColon,
            text => TokenKind::Operator(self.interner.intern(text)),
        }
    }
}

#[cfg(test)]
mod tests;
