//! Layout engine.
//!
//! Wraps the scanner and rewrites the indentation-delimited token stream into
//! an explicit-brace stream: every implicit `where`/`do`/`on`/`let` block
//! gains synthetic `{` `;` `}` tokens, as if the user had written the
//! delimiters by hand. Downstream stages never see indentation.
//!
//! The engine is a pushdown automaton over a one-token lookahead buffer,
//! pulled lazily from the scanner. States, kept on an explicit stack:
//!
//! - `Default`: the empty stack; no open layout block.
//! - `Accept`: transient; a synthesized (or rerouted) token sits in the
//!   output queue and is handed out immediately. Represented here by the
//!   `pending` queue rather than a stack entry.
//! - `ScanLayout`: inside an implicit `where`/`do`/`on` block; tokens at
//!   the block's indent column start a new statement (`;`), tokens left of
//!   it close the block (`;` `}` `;`).
//! - `ScanLet`: inside an implicit `let` block; closes like `ScanLayout`
//!   on the explicit `in` keyword, or synthesizes a virtual `in` when the
//!   stream dedents past the `let` itself.
//! - `ScanDisabled`: the user wrote an explicit `{`; layout insertion is
//!   suspended, but delimiter depth is still tracked so inner braces do not
//!   end the disabled region early.
//!
//! Synthetic tokens carry the source range of the token whose position
//! triggered their insertion. The transformation is deterministic with
//! finite lookahead; there is no backtracking.

use std::collections::VecDeque;

use fen_diagnostic::Diagnostic;
use fen_ir::{SourceRange, Token, TokenKind};
use smallvec::SmallVec;

use crate::scanner::Scanner;

/// The engine only ever inspects the next unconsumed token, so a single
/// buffered slot is enough.
const LOOKAHEAD: usize = 1;

/// One open layout region.
#[derive(Clone, Copy, Debug)]
enum LayoutContext {
    /// Implicit `where`/`do`/`on` block with its body's indent column.
    Layout { indent: u32 },
    /// Implicit `let` block: the body's indent column plus the column of
    /// the `let` keyword itself, which governs virtual-`in` closing.
    Let { indent: u32, let_column: u32 },
    /// Explicit braces; layout suspended while delimiter depth is tracked.
    Disabled { depth: u32 },
}

/// The layout engine: scanner in, explicit-brace token stream out.
pub struct LayoutEngine<'src> {
    scanner: Scanner<'src>,
    buffer: SmallVec<[Token; LOOKAHEAD]>,
    pending: VecDeque<Token>,
    stack: Vec<LayoutContext>,
    /// Line of the most recently consumed source token; a buffered token on
    /// a later line is the first token of a new line and triggers the
    /// offside checks.
    last_line: u32,
    /// Kind of the most recently emitted token, for the final `;` rule.
    last_kind: Option<TokenKind>,
    scanner_done: bool,
    finished: bool,
}

impl<'src> LayoutEngine<'src> {
    pub fn new(scanner: Scanner<'src>) -> Self {
        LayoutEngine {
            scanner,
            buffer: SmallVec::new(),
            pending: VecDeque::new(),
            stack: Vec::new(),
            last_line: 0,
            last_kind: None,
            scanner_done: false,
            finished: false,
        }
    }

    /// Produce the next token of the explicit-brace stream.
    ///
    /// After the `Eof` token has been emitted, further calls keep
    /// returning `Eof`.
    pub fn next_token(&mut self) -> Result<Token, Diagnostic> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(self.emit(token));
            }
            if self.finished {
                self.fill()?;
                return Ok(self.buffer[0].clone());
            }
            self.fill()?;
            let token = self.buffer[0].clone();

            if token.kind == TokenKind::Eof {
                self.close_at_eof(&token);
                continue;
            }

            // Explicit `in` ends the innermost `let` block wherever it
            // sits; the `in` itself is kept, never re-synthesized.
            if token.kind == TokenKind::In
                && matches!(self.stack.last(), Some(LayoutContext::Let { .. }))
            {
                self.consume();
                self.stack.pop();
                let at = SourceRange::point(token.range.start);
                self.push_separator(at);
                self.pending.push_back(Token::new(TokenKind::RBrace, at));
                self.pending.push_back(token);
                continue;
            }

            // Explicit braces: no insertion, just depth bookkeeping.
            if let Some(LayoutContext::Disabled { depth }) = self.stack.last_mut() {
                if token.kind.opens_delimiter() {
                    *depth += 1;
                } else if token.kind.closes_delimiter() {
                    if *depth <= 1 {
                        self.stack.pop();
                    } else {
                        *depth -= 1;
                    }
                }
                self.consume();
                self.pending.push_back(token);
                continue;
            }

            // Offside checks for the first token of a new line.
            if token.range.start.line > self.last_line {
                let column = token.range.start.column;
                let at = SourceRange::point(token.range.start);
                match self.stack.last() {
                    Some(LayoutContext::Layout { indent }) => {
                        if column == *indent {
                            self.last_line = token.range.start.line;
                            self.push_separator(at);
                            continue;
                        }
                        if column < *indent {
                            self.stack.pop();
                            self.push_separator(at);
                            self.pending.push_back(Token::new(TokenKind::RBrace, at));
                            self.push_separator(at);
                            continue; // token re-examined under the outer context
                        }
                    }
                    Some(LayoutContext::Let { indent, let_column }) => {
                        if column == *indent {
                            self.last_line = token.range.start.line;
                            self.push_separator(at);
                            continue;
                        }
                        // Dedent past the `let` keyword itself without an
                        // explicit `in`: close the block and synthesize the
                        // `in`. Columns between the `let` and its bindings
                        // are continuation lines.
                        if column <= *let_column {
                            self.stack.pop();
                            self.push_separator(at);
                            self.pending.push_back(Token::new(TokenKind::RBrace, at));
                            self.pending.push_back(Token::new(TokenKind::In, at));
                            continue;
                        }
                    }
                    _ => {}
                }
            }

            self.consume();

            if token.kind.opens_layout() {
                self.open_layout_after(&token)?;
            }
            return Ok(self.emit(token));
        }
    }

    /// A layout keyword was just consumed; decide how its block opens by
    /// looking at the next buffered token (seeing past the line break, if
    /// any: the buffer holds finished tokens only).
    fn open_layout_after(&mut self, keyword: &Token) -> Result<(), Diagnostic> {
        self.fill()?;
        let next = &self.buffer[0];
        match next.kind {
            // Explicit braces: the user opted out of layout for this block.
            TokenKind::LBrace => {
                self.stack.push(LayoutContext::Disabled { depth: 0 });
            }
            // Degenerate: keyword at end of input; nothing to open.
            TokenKind::Eof => {}
            _ => {
                let indent = next.range.start.column;
                let context = if keyword.kind == TokenKind::Let {
                    LayoutContext::Let {
                        indent,
                        let_column: keyword.range.start.column,
                    }
                } else {
                    LayoutContext::Layout { indent }
                };
                self.stack.push(context);
                // The block's first token sets the indent; it must not also
                // trip the new-statement check.
                self.last_line = next.range.start.line;
                self.pending
                    .push_back(Token::new(TokenKind::LBrace, SourceRange::point(next.range.start)));
            }
        }
        Ok(())
    }

    /// End of file: force-close every open layout block exactly as if the
    /// stream had dedented past it, then guarantee a terminating `;`.
    fn close_at_eof(&mut self, eof: &Token) {
        let at = SourceRange::point(eof.range.start);
        while let Some(context) = self.stack.pop() {
            match context {
                LayoutContext::Layout { .. } => {
                    self.push_separator(at);
                    self.pending.push_back(Token::new(TokenKind::RBrace, at));
                    self.push_separator(at);
                }
                LayoutContext::Let { .. } => {
                    self.push_separator(at);
                    self.pending.push_back(Token::new(TokenKind::RBrace, at));
                    self.pending.push_back(Token::new(TokenKind::In, at));
                }
                LayoutContext::Disabled { .. } => {}
            }
        }
        let ends_in_semicolon = match self.pending.back() {
            Some(token) => token.kind == TokenKind::Semicolon,
            None => self.last_kind == Some(TokenKind::Semicolon) || self.last_kind.is_none(),
        };
        if !ends_in_semicolon {
            self.pending.push_back(Token::new(TokenKind::Semicolon, at));
        }
        self.pending.push_back(eof.clone());
        self.finished = true;
    }

    /// Queue a synthetic `;`, coalescing with one already at the tail of
    /// the output so block closes and statement starts never stack two
    /// separators in a row.
    fn push_separator(&mut self, at: SourceRange) {
        let previous = match self.pending.back() {
            Some(token) => Some(token.kind),
            None => self.last_kind,
        };
        if previous != Some(TokenKind::Semicolon) {
            self.pending.push_back(Token::new(TokenKind::Semicolon, at));
        }
    }

    fn consume(&mut self) {
        let token = self.buffer.remove(0);
        self.last_line = token.range.start.line;
    }

    fn emit(&mut self, token: Token) -> Token {
        self.last_kind = Some(token.kind);
        token
    }

    fn fill(&mut self) -> Result<(), Diagnostic> {
        while self.buffer.len() < LOOKAHEAD && !self.scanner_done {
            let token = self.scanner.next_token()?;
            if token.kind == TokenKind::Eof {
                self.scanner_done = true;
            }
            self.buffer.push(token);
        }
        Ok(())
    }
}
