#![allow(clippy::unwrap_used)]

use fen_ir::{Interner, TokenKind};
use pretty_assertions::assert_eq;

use crate::scanner::Scanner;

fn kinds(source: &str) -> Vec<TokenKind> {
    let interner = Interner::shared();
    let mut scanner = Scanner::new(source, interner);
    let mut kinds = Vec::new();
    loop {
        match scanner.next_token() {
            Ok(token) => {
                let done = token.kind == TokenKind::Eof;
                kinds.push(token.kind);
                if done {
                    return kinds;
                }
            }
            Err(diagnostic) => panic!("unexpected scan fault: {diagnostic}"),
        }
    }
}

fn first_fault(source: &str) -> fen_diagnostic::Diagnostic {
    let interner = Interner::shared();
    let mut scanner = Scanner::new(source, interner);
    loop {
        match scanner.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => {
                panic!("expected a scan fault in {source:?}")
            }
            Ok(_) => {}
            Err(diagnostic) => return diagnostic,
        }
    }
}

// === Identifiers and keywords ===

#[test]
fn keywords_and_identifiers() {
    let interner = Interner::shared();
    let mut scanner = Scanner::new("let fold' = x", interner.clone());
    let first = scanner.next_token().unwrap();
    assert_eq!(first.kind, TokenKind::Let);
    let second = scanner.next_token().unwrap();
    assert_eq!(second.kind, TokenKind::Ident(interner.intern("fold'")));
    let third = scanner.next_token().unwrap();
    assert_eq!(third.kind, TokenKind::Equals);
}

#[test]
fn boolean_literals() {
    assert_eq!(
        kinds("True False"),
        vec![
            TokenKind::Bool(true),
            TokenKind::Bool(false),
            TokenKind::Eof
        ]
    );
}

#[test]
fn tokens_carry_exact_coordinates() {
    let interner = Interner::shared();
    let mut scanner = Scanner::new("ab\n  cd", interner);
    let first = scanner.next_token().unwrap();
    assert_eq!(first.range.start.line, 1);
    assert_eq!(first.range.start.column, 1);
    assert_eq!(first.range.end.column, 3);
    let second = scanner.next_token().unwrap();
    assert_eq!(second.range.start.offset, 5);
    assert_eq!(second.range.start.line, 2);
    assert_eq!(second.range.start.column, 3);
}

// === Numbers ===

#[test]
fn integer_and_double_literals() {
    assert_eq!(
        kinds("42 3.25"),
        vec![
            TokenKind::Int(42),
            TokenKind::Double(3.25f64.to_bits()),
            TokenKind::Eof
        ]
    );
}

#[test]
fn dangling_fraction_dot_is_malformed() {
    let fault = first_fault("1. ");
    assert_eq!(fault.code, fen_diagnostic::ErrorCode::E0001);
}

#[test]
fn number_glued_to_identifier_is_malformed() {
    let fault = first_fault("12abc");
    assert_eq!(fault.code, fen_diagnostic::ErrorCode::E0001);
}

// === Strings and chars ===

#[test]
fn string_with_escapes() {
    let interner = Interner::shared();
    let mut scanner = Scanner::new(r#""a\n\x41\o101""#, interner.clone());
    let token = scanner.next_token().unwrap();
    assert_eq!(token.kind, TokenKind::String(interner.intern("a\nAA")));
}

#[test]
fn unterminated_string_faults() {
    let fault = first_fault("\"abc\n");
    assert_eq!(fault.code, fen_diagnostic::ErrorCode::E0002);
}

#[test]
fn bad_hex_escape_faults() {
    let fault = first_fault(r#""\xZZ""#);
    assert_eq!(fault.code, fen_diagnostic::ErrorCode::E0004);
}

#[test]
fn bad_octal_escape_faults() {
    let fault = first_fault(r"'\o9'");
    assert_eq!(fault.code, fen_diagnostic::ErrorCode::E0004);
}

#[test]
fn char_literals() {
    assert_eq!(
        kinds(r"'a' '\t'"),
        vec![TokenKind::Char('a'), TokenKind::Char('\t'), TokenKind::Eof]
    );
}

#[test]
fn empty_char_literal_faults() {
    let fault = first_fault("''");
    assert_eq!(fault.code, fen_diagnostic::ErrorCode::E0005);
}

#[test]
fn overlong_char_literal_faults() {
    let fault = first_fault("'ab'");
    assert_eq!(fault.code, fen_diagnostic::ErrorCode::E0005);
}

#[test]
fn unterminated_char_literal_faults() {
    let fault = first_fault("'a");
    assert_eq!(fault.code, fen_diagnostic::ErrorCode::E0003);
}

// === Comments ===

#[test]
fn line_comments_are_trivia() {
    assert_eq!(kinds("x // trailing\ny"), kinds("x\ny"));
}

#[test]
fn block_comments_nest() {
    // The inner `/* */` must not close the outer comment.
    assert_eq!(
        kinds("a /* outer /* inner */ still outer */ b"),
        kinds("a b")
    );
}

#[test]
fn unterminated_block_comment_faults() {
    let fault = first_fault("x /* /* */ never closed");
    assert_eq!(fault.code, fen_diagnostic::ErrorCode::E0006);
}

// === Dots ===

#[test]
fn dot_between_glued_identifiers_is_member_access() {
    assert_eq!(
        kinds("xs.head")[1],
        TokenKind::Dot,
        "glued dot should scan as member access"
    );
}

#[test]
fn spaced_dot_is_the_compose_operator() {
    let interner = Interner::shared();
    let mut scanner = Scanner::new("f . g", interner.clone());
    scanner.next_token().unwrap();
    let dot = scanner.next_token().unwrap();
    assert_eq!(dot.kind, TokenKind::Operator(interner.intern(".")));
}

#[test]
fn parenthesized_dot_is_an_operator() {
    let interner = Interner::shared();
    let mut scanner = Scanner::new("(.)", interner.clone());
    assert_eq!(scanner.next_token().unwrap().kind, TokenKind::LParen);
    assert_eq!(
        scanner.next_token().unwrap().kind,
        TokenKind::Operator(interner.intern("."))
    );
    assert_eq!(scanner.next_token().unwrap().kind, TokenKind::RParen);
}

// === Bracket-pair identifiers ===

#[test]
fn unit_and_nil_identifiers() {
    let interner = Interner::shared();
    let mut scanner = Scanner::new("() []", interner.clone());
    assert_eq!(
        scanner.next_token().unwrap().kind,
        TokenKind::Ident(interner.intern("()"))
    );
    assert_eq!(
        scanner.next_token().unwrap().kind,
        TokenKind::Ident(interner.intern("[]"))
    );
}

#[test]
fn tuple_constructor_identifiers() {
    let interner = Interner::shared();
    let mut scanner = Scanner::new("(,) (,,)", interner.clone());
    assert_eq!(
        scanner.next_token().unwrap().kind,
        TokenKind::Ident(interner.intern("(,)"))
    );
    assert_eq!(
        scanner.next_token().unwrap().kind,
        TokenKind::Ident(interner.intern("(,,)"))
    );
}

#[test]
fn ordinary_parens_stay_parens() {
    let interner = Interner::shared();
    let mut scanner = Scanner::new("(x, y)", interner);
    assert_eq!(scanner.next_token().unwrap().kind, TokenKind::LParen);
}

// === Operators ===

#[test]
fn operator_runs_and_special_forms() {
    let interner = Interner::shared();
    let mut scanner = Scanner::new(">>= -> = ::", interner.clone());
    assert_eq!(
        scanner.next_token().unwrap().kind,
        TokenKind::Operator(interner.intern(">>="))
    );
    assert_eq!(scanner.next_token().unwrap().kind, TokenKind::Arrow);
    assert_eq!(scanner.next_token().unwrap().kind, TokenKind::Equals);
    assert_eq!(scanner.next_token().unwrap().kind, TokenKind::DoubleColon);
}

#[test]
fn backtick_quoted_operator() {
    let interner = Interner::shared();
    let mut scanner = Scanner::new("x `div` y", interner.clone());
    scanner.next_token().unwrap();
    assert_eq!(
        scanner.next_token().unwrap().kind,
        TokenKind::Operator(interner.intern("div"))
    );
}

#[test]
fn reserved_word_in_backticks_faults() {
    let fault = first_fault("x `where` y");
    assert_eq!(fault.code, fen_diagnostic::ErrorCode::E0007);
}
