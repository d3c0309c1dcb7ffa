#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use fen_diagnostic::ErrorCode;
use fen_ir::{
    DataConstructorDescriptor, DataFieldDescriptor, DataTypeDescriptor, Interner, Literal, Name,
    Operator, PatternMatch, PatternMatchKind, SourceRange, Symbol, Type, Value, ValueKind,
};
use fen_scope::{EmptyResolver, ScopeArena};

use crate::shuffle::{shuffle, ExpressionShuffler, PatternShuffler};

fn arena(interner: &Interner) -> ScopeArena {
    ScopeArena::new(Box::new(EmptyResolver), interner)
}

/// Module scope with `+` and `*` (left), `:` (right), `-` (prefix).
fn arithmetic_scope(interner: &Interner) -> ScopeArena {
    let mut arena = arena(interner);
    arena.enter_module_scope(interner.intern("app"), Vec::new());
    let table = [
        ("+", Operator::left_infix(6)),
        ("*", Operator::left_infix(7)),
        (":", Operator::right_infix(5)),
        ("-", Operator::prefix(9)),
    ];
    for (name, operator) in table {
        let symbol = Symbol::unqualified(interner.intern(name));
        arena.define_operator(&symbol, operator).unwrap();
    }
    arena
}

/// Register `List a = Nil | Cons head tail` and make `:` its cons.
fn list_scope(interner: &Interner) -> ScopeArena {
    let mut arena = arithmetic_scope(interner);
    let module = interner.intern("app");
    let cons = Symbol::qualified(module, interner.intern(":"));
    let nil = Symbol::qualified(module, interner.intern("Nil"));
    let descriptor = DataTypeDescriptor::new(
        Symbol::qualified(module, interner.intern("List")),
        vec![0],
        vec![
            DataConstructorDescriptor::new(0, nil, vec![]),
            DataConstructorDescriptor::new(
                1,
                cons,
                vec![
                    DataFieldDescriptor::new(0, interner.intern("head"), Type::Var(0)),
                    DataFieldDescriptor::new(
                        1,
                        interner.intern("tail"),
                        Type::sum_with(
                            Symbol::qualified(module, interner.intern("List")),
                            vec![Type::Var(0)],
                        ),
                    ),
                ],
            ),
        ],
    );
    arena.register_data_type(descriptor);
    let maybe = DataTypeDescriptor::new(
        Symbol::qualified(module, interner.intern("Maybe")),
        vec![1],
        vec![
            DataConstructorDescriptor::new(
                0,
                Symbol::qualified(module, interner.intern("Nothing")),
                vec![],
            ),
            DataConstructorDescriptor::new(
                1,
                Symbol::qualified(module, interner.intern("Just")),
                vec![DataFieldDescriptor::new(
                    0,
                    interner.intern("value"),
                    Type::Var(1),
                )],
            ),
        ],
    );
    arena.register_data_type(maybe);
    let just = Symbol::unqualified(interner.intern("Just"));
    arena.define_value(&just, Type::Var(1)).unwrap();
    arena
}

fn identifier(arena: &mut ScopeArena, interner: &Interner, name: &str) -> Value {
    let ty = arena.reserve_type();
    Value::new(
        ValueKind::Identifier(Symbol::unqualified(interner.intern(name))),
        ty,
        SourceRange::default(),
    )
}

fn int(arena: &mut ScopeArena, n: i64) -> Value {
    let ty = arena.reserve_type();
    Value::new(
        ValueKind::Literal(Literal::Int(n)),
        ty,
        SourceRange::default(),
    )
}

fn capture(arena: &mut ScopeArena, interner: &Interner, name: &str) -> PatternMatch {
    let ty = arena.reserve_type();
    PatternMatch::new(
        PatternMatchKind::Capture(Symbol::unqualified(interner.intern(name))),
        ty,
        SourceRange::default(),
    )
}

/// Renders an applied spine as `(f a b)` for shape assertions.
fn render(value: &Value, interner: &Interner) -> String {
    match &value.kind {
        ValueKind::Identifier(symbol) => symbol.display(interner),
        ValueKind::Literal(Literal::Int(n)) => n.to_string(),
        ValueKind::Apply { function, argument } => format!(
            "({} {})",
            render(function, interner),
            render(argument, interner)
        ),
        other => panic!("unexpected shuffled form: {other:?}"),
    }
}

fn shuffle_expression(arena: &mut ScopeArena, items: Vec<Value>) -> Result<Value, ErrorCode> {
    shuffle(
        &mut ExpressionShuffler { arena },
        items,
        SourceRange::default(),
    )
    .map_err(|fault| fault.code)
}

// === Expressions ===

#[test]
fn left_associative_operators_nest_leftward() {
    let interner = Interner::new();
    let mut arena = arithmetic_scope(&interner);
    // a + b + c
    let items = vec![
        identifier(&mut arena, &interner, "a"),
        identifier(&mut arena, &interner, "+"),
        identifier(&mut arena, &interner, "b"),
        identifier(&mut arena, &interner, "+"),
        identifier(&mut arena, &interner, "c"),
    ];
    let result = shuffle_expression(&mut arena, items).unwrap();
    assert_eq!(render(&result, &interner), "((+ ((+ a) b)) c)");
}

#[test]
fn right_associative_operators_nest_rightward() {
    let interner = Interner::new();
    let mut arena = arithmetic_scope(&interner);
    // x : y : z
    let items = vec![
        identifier(&mut arena, &interner, "x"),
        identifier(&mut arena, &interner, ":"),
        identifier(&mut arena, &interner, "y"),
        identifier(&mut arena, &interner, ":"),
        identifier(&mut arena, &interner, "z"),
    ];
    let result = shuffle_expression(&mut arena, items).unwrap();
    assert_eq!(render(&result, &interner), "((: x) ((: y) z))");
}

#[test]
fn higher_precedence_binds_tighter() {
    let interner = Interner::new();
    let mut arena = arithmetic_scope(&interner);
    // a + b * c
    let items = vec![
        identifier(&mut arena, &interner, "a"),
        identifier(&mut arena, &interner, "+"),
        identifier(&mut arena, &interner, "b"),
        identifier(&mut arena, &interner, "*"),
        identifier(&mut arena, &interner, "c"),
    ];
    let result = shuffle_expression(&mut arena, items).unwrap();
    assert_eq!(render(&result, &interner), "((+ a) ((* b) c))");
}

#[test]
fn juxtaposition_binds_before_any_operator() {
    let interner = Interner::new();
    let mut arena = arithmetic_scope(&interner);
    // f x + g y
    let items = vec![
        identifier(&mut arena, &interner, "f"),
        identifier(&mut arena, &interner, "x"),
        identifier(&mut arena, &interner, "+"),
        identifier(&mut arena, &interner, "g"),
        identifier(&mut arena, &interner, "y"),
    ];
    let result = shuffle_expression(&mut arena, items).unwrap();
    assert_eq!(render(&result, &interner), "((+ (f x)) (g y))");
}

#[test]
fn adjacent_operands_fold_left() {
    let interner = Interner::new();
    let mut arena = arithmetic_scope(&interner);
    // f x y
    let items = vec![
        identifier(&mut arena, &interner, "f"),
        identifier(&mut arena, &interner, "x"),
        identifier(&mut arena, &interner, "y"),
    ];
    let result = shuffle_expression(&mut arena, items).unwrap();
    assert_eq!(render(&result, &interner), "((f x) y)");
}

#[test]
fn a_prefix_operator_takes_one_operand() {
    let interner = Interner::new();
    let mut arena = arithmetic_scope(&interner);
    // - x + y: prefix minus binds tighter than +
    let items = vec![
        identifier(&mut arena, &interner, "-"),
        identifier(&mut arena, &interner, "x"),
        identifier(&mut arena, &interner, "+"),
        identifier(&mut arena, &interner, "y"),
    ];
    let result = shuffle_expression(&mut arena, items).unwrap();
    assert_eq!(render(&result, &interner), "((+ (- x)) y)");
}

#[test]
fn a_binary_operator_cannot_open_an_expression() {
    let interner = Interner::new();
    let mut arena = arithmetic_scope(&interner);
    // + x
    let items = vec![
        identifier(&mut arena, &interner, "+"),
        identifier(&mut arena, &interner, "x"),
    ];
    let fault = shuffle_expression(&mut arena, items).unwrap_err();
    assert_eq!(fault, ErrorCode::E1001);
}

#[test]
fn a_binary_operator_after_another_operator_is_rejected() {
    let interner = Interner::new();
    let mut arena = arithmetic_scope(&interner);
    // x + * y
    let items = vec![
        identifier(&mut arena, &interner, "x"),
        identifier(&mut arena, &interner, "+"),
        identifier(&mut arena, &interner, "*"),
        identifier(&mut arena, &interner, "y"),
    ];
    let fault = shuffle_expression(&mut arena, items).unwrap_err();
    assert_eq!(fault, ErrorCode::E1001);
}

#[test]
fn an_empty_sequence_is_a_fault() {
    let interner = Interner::new();
    let mut arena = arithmetic_scope(&interner);
    let fault = shuffle_expression(&mut arena, Vec::new()).unwrap_err();
    assert_eq!(fault, ErrorCode::E1006);
}

#[test]
fn a_trailing_operator_does_not_reduce() {
    let interner = Interner::new();
    let mut arena = arithmetic_scope(&interner);
    // x +
    let items = vec![
        identifier(&mut arena, &interner, "x"),
        identifier(&mut arena, &interner, "+"),
    ];
    let fault = shuffle_expression(&mut arena, items).unwrap_err();
    assert_eq!(fault, ErrorCode::E1002);
}

#[test]
fn literals_shuffle_like_identifiers() {
    let interner = Interner::new();
    let mut arena = arithmetic_scope(&interner);
    // 1 + 2 * 3
    let items = vec![
        int(&mut arena, 1),
        identifier(&mut arena, &interner, "+"),
        int(&mut arena, 2),
        identifier(&mut arena, &interner, "*"),
        int(&mut arena, 3),
    ];
    let result = shuffle_expression(&mut arena, items).unwrap();
    assert_eq!(render(&result, &interner), "((+ 1) ((* 2) 3))");
}

// === Patterns ===

fn shuffle_pattern(
    arena: &mut ScopeArena,
    interner: &Interner,
    items: Vec<PatternMatch>,
) -> Result<PatternMatch, ErrorCode> {
    shuffle(
        &mut PatternShuffler { arena, interner },
        items,
        SourceRange::default(),
    )
    .map_err(|fault| fault.code)
}

#[test]
fn a_cons_pattern_becomes_a_struct_match() {
    let interner = Interner::new();
    let mut arena = list_scope(&interner);
    let module = interner.intern("app");
    // x : xs
    let items = vec![
        capture(&mut arena, &interner, "x"),
        capture(&mut arena, &interner, ":"),
        capture(&mut arena, &interner, "xs"),
    ];
    let result = shuffle_pattern(&mut arena, &interner, items).unwrap();
    match result.kind {
        PatternMatchKind::Struct {
            constructor,
            fields,
        } => {
            assert_eq!(
                constructor,
                Symbol::qualified(module, interner.intern(":"))
            );
            let names: Vec<Name> = fields.iter().map(|field| field.field).collect();
            assert_eq!(names, vec![interner.intern("head"), interner.intern("tail")]);
        }
        other => panic!("expected a struct match, got {other:?}"),
    }
}

#[test]
fn constructor_adjacency_fills_fields_in_declared_order() {
    let interner = Interner::new();
    let mut arena = list_scope(&interner);
    let module = interner.intern("app");
    // Just x written by juxtaposition.
    let items = vec![
        capture(&mut arena, &interner, "Just"),
        capture(&mut arena, &interner, "x"),
    ];
    let result = shuffle_pattern(&mut arena, &interner, items).unwrap();
    match result.kind {
        PatternMatchKind::Struct {
            constructor,
            fields,
        } => {
            assert_eq!(
                constructor,
                Symbol::qualified(module, interner.intern("Just"))
            );
            assert_eq!(fields.len(), 1);
            assert_eq!(fields[0].field, interner.intern("value"));
        }
        other => panic!("expected a struct match, got {other:?}"),
    }
}

#[test]
fn a_niladic_constructor_matches_without_fields() {
    let interner = Interner::new();
    let mut arena = list_scope(&interner);
    let items = vec![capture(&mut arena, &interner, "Nil")];
    let result = shuffle_pattern(&mut arena, &interner, items).unwrap();
    // A lone capture is not resolved here; qualification decides whether it
    // is a constructor. The shuffler passes it through untouched.
    assert_eq!(
        result.kind,
        PatternMatchKind::Capture(Symbol::unqualified(interner.intern("Nil")))
    );
}

#[test]
fn an_overfilled_constructor_is_an_arity_fault() {
    let interner = Interner::new();
    let mut arena = list_scope(&interner);
    // (x : xs) y: the struct already has both fields, y overflows.
    let head = capture(&mut arena, &interner, "x");
    let tail = capture(&mut arena, &interner, "xs");
    let cons = capture(&mut arena, &interner, ":");
    let built = shuffle_pattern(&mut arena, &interner, vec![head, cons, tail]).unwrap();
    let extra = capture(&mut arena, &interner, "y");
    let fault = shuffle_pattern(&mut arena, &interner, vec![built, extra]).unwrap_err();
    assert_eq!(fault, ErrorCode::E1003);
}

#[test]
fn a_plain_capture_cannot_head_sub_patterns() {
    let interner = Interner::new();
    let mut arena = list_scope(&interner);
    // x y: neither is a constructor.
    let items = vec![
        capture(&mut arena, &interner, "x"),
        capture(&mut arena, &interner, "y"),
    ];
    let fault = shuffle_pattern(&mut arena, &interner, items).unwrap_err();
    assert_eq!(fault, ErrorCode::E1005);
}

// === Arity checking ===

#[test]
fn an_underfilled_struct_fails_the_arity_check() {
    let interner = Interner::new();
    let arena = list_scope(&interner);
    let module = interner.intern("app");
    let cons = Symbol::qualified(module, interner.intern(":"));
    let pattern = PatternMatch::new(
        PatternMatchKind::Struct {
            constructor: cons,
            fields: Vec::new(),
        },
        Type::Var(100),
        SourceRange::default(),
    );
    let fault =
        crate::shuffle::check_pattern_arity(&arena, &interner, &pattern).unwrap_err();
    assert_eq!(fault.code, ErrorCode::E1003);
}

#[test]
fn an_exactly_filled_struct_passes_the_arity_check() {
    let interner = Interner::new();
    let mut arena = list_scope(&interner);
    let items = vec![
        capture(&mut arena, &interner, "x"),
        capture(&mut arena, &interner, ":"),
        capture(&mut arena, &interner, "xs"),
    ];
    let pattern = shuffle_pattern(&mut arena, &interner, items).unwrap();
    assert!(crate::shuffle::check_pattern_arity(&arena, &interner, &pattern).is_ok());
}
