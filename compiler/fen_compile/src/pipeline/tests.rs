#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use fen_diagnostic::ErrorCode;
use fen_ir::{
    builtin, Definition, Interner, Literal, SourceRange, Symbol, TokenKind, Type, Value, ValueKind,
};
use fen_scope::EmptyResolver;

use crate::pipeline::Compiler;

fn compiler() -> Compiler {
    Compiler::new("memory://unit.fen", Box::new(EmptyResolver))
}

fn value(kind: ValueKind) -> Value {
    Value::new(kind, Type::Var(0), SourceRange::default())
}

fn value_def(interner: &Interner, name: &str, body: Value) -> Definition {
    Definition::Value {
        symbol: Symbol::unqualified(interner.intern(name)),
        body,
        range: SourceRange::default(),
    }
}

fn module(interner: &Interner, name: &str, definitions: Vec<Definition>) -> Definition {
    Definition::Module {
        name: interner.intern(name),
        imports: Vec::new(),
        definitions,
        range: SourceRange::default(),
    }
}

// === Scan stage ===

#[test]
fn scanning_produces_tokens_and_keeps_faults() {
    let mut compiler = compiler();
    let tokens = compiler.scan_and_layout("main = one\n");
    assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    assert!(compiler.diagnostics().is_empty());
}

#[test]
fn scan_faults_accumulate_without_stopping_the_stream() {
    let mut compiler = compiler();
    let tokens = compiler.scan_and_layout("main = \u{1}one\n");
    assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    assert!(!compiler.diagnostics().is_empty());
}

// === Full units ===

#[test]
fn a_clean_unit_elaborates_with_resolved_types() {
    let compiler = compiler();
    let interner = compiler.interner().clone();
    let unit = vec![module(
        &interner,
        "app",
        vec![
            value_def(
                &interner,
                "one",
                value(ValueKind::Literal(Literal::Int(1))),
            ),
            value_def(
                &interner,
                "main",
                value(ValueKind::Identifier(Symbol::unqualified(
                    interner.intern("one"),
                ))),
            ),
        ],
    )];
    let elaborated = compiler.compile(unit).unwrap();

    let home = interner.intern("app");
    let main = Symbol::qualified(home, interner.intern("main"));
    let body = elaborated.definition(&main).unwrap();
    assert_eq!(body.ty, builtin::int(&interner));
    assert!(elaborated.module_scope(home).is_some());
    assert_eq!(elaborated.definitions().count(), 2);
}

#[test]
fn a_faulty_unit_returns_its_diagnostics() {
    let compiler = compiler();
    let interner = compiler.interner().clone();
    let unit = vec![module(
        &interner,
        "app",
        vec![value_def(
            &interner,
            "main",
            value(ValueKind::Identifier(Symbol::unqualified(
                interner.intern("ghost"),
            ))),
        )],
    )];
    let Err(faults) = compiler.compile(unit) else {
        panic!("a unit with an unknown identifier elaborated cleanly");
    };
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].code, ErrorCode::E2001);
}

#[test]
fn one_bad_definition_does_not_hide_another() {
    let compiler = compiler();
    let interner = compiler.interner().clone();
    let unit = vec![module(
        &interner,
        "app",
        vec![
            value_def(
                &interner,
                "first",
                value(ValueKind::Identifier(Symbol::unqualified(
                    interner.intern("ghost"),
                ))),
            ),
            value_def(
                &interner,
                "second",
                value(ValueKind::Identifier(Symbol::unqualified(
                    interner.intern("phantom"),
                ))),
            ),
        ],
    )];
    let Err(faults) = compiler.compile(unit) else {
        panic!("a unit with two unknown identifiers elaborated cleanly");
    };
    assert_eq!(faults.len(), 2);
}
