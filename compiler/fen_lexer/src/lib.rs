//! Lexical analysis for Fen: a hand-written scanner plus the layout
//! engine that rewrites indentation into explicit delimiters.
//!
//! The scanner turns source text into [`Token`]s one at a time, interning
//! identifiers and operators as it goes. The [`LayoutEngine`] wraps a
//! scanner and inserts synthetic `{` `;` `}` (and `in`) tokens so that
//! downstream stages parse a fully delimited stream.
//!
//! Scan faults are reported as [`Diagnostic`]s; the scanner recovers past
//! the offending text, so a single pass can report every fault in a file.

mod cursor;
mod layout;
mod scanner;

use fen_diagnostic::Diagnostic;
use fen_ir::{SharedInterner, Token, TokenKind};

pub use crate::layout::LayoutEngine;
pub use crate::scanner::Scanner;

/// Scan and layout an entire source text, collecting every token and
/// every fault.
///
/// The returned token vector always ends with `Eof` and is usable even
/// when faults were reported; faulty stretches are simply absent from it.
pub fn tokenize(source: &str, interner: SharedInterner) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut engine = LayoutEngine::new(Scanner::new(source, interner));
    let mut tokens = Vec::new();
    let mut faults = Vec::new();
    loop {
        match engine.next_token() {
            Ok(token) => {
                let done = token.kind == TokenKind::Eof;
                tokens.push(token);
                if done {
                    return (tokens, faults);
                }
            }
            Err(diagnostic) => faults.push(diagnostic),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use fen_ir::{Interner, TokenKind};
    use pretty_assertions::assert_eq;

    use super::tokenize;

    #[test]
    fn tokenize_collects_tokens_and_faults_together() {
        let interner = Interner::shared();
        let (tokens, faults) = tokenize("x = \"unterminated\ny = one\n", interner);
        assert_eq!(faults.len(), 1);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert!(kinds.contains(&TokenKind::Equals));
    }

    #[test]
    fn tokenize_clean_input_reports_no_faults() {
        let interner = Interner::shared();
        let (tokens, faults) = tokenize("main = one\n", interner);
        assert!(faults.is_empty());
        assert_eq!(tokens.len(), 5);
    }
}
