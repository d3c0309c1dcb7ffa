#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use fen_ir::{Interner, Symbol, Type};

use crate::counters::Counters;
use crate::error::TypeError;
use crate::resolver::{EmptyResolver, SymbolResolver};
use crate::unify::TypeTable;

/// Accepts every type-class constraint.
struct Permissive;

impl SymbolResolver for Permissive {
    fn resolve_value(&self, _symbol: &Symbol) -> Option<Type> {
        None
    }
    fn resolve_operator(&self, _symbol: &Symbol) -> Option<fen_ir::Operator> {
        None
    }
    fn is_instance(&self, _class: &Symbol, _ty: &Type) -> bool {
        true
    }
    fn resolve_constructor(&self, _constructor: &Symbol) -> Option<fen_ir::DataTypeDescriptor> {
        None
    }
}

fn int(interner: &Interner) -> Type {
    fen_ir::builtin::int(interner)
}

// === Binding and resolution ===

#[test]
fn bind_resolves_through_variable_chains() {
    let interner = Interner::new();
    let mut table = TypeTable::new();
    table.bind(0, &Type::Var(1), &EmptyResolver).unwrap();
    table.bind(1, &int(&interner), &EmptyResolver).unwrap();
    assert_eq!(table.resolve(&Type::Var(0)), int(&interner));
}

#[test]
fn binding_a_variable_to_itself_is_a_no_op() {
    let mut table = TypeTable::new();
    table.bind(0, &Type::Var(0), &EmptyResolver).unwrap();
    assert_eq!(table.resolve(&Type::Var(0)), Type::Var(0));
}

#[test]
fn occurs_check_rejects_infinite_types() {
    let mut table = TypeTable::new();
    let recursive = Type::function(Type::Var(0), Type::Var(1));
    let fault = table.bind(0, &recursive, &EmptyResolver).unwrap_err();
    assert!(matches!(fault, TypeError::Infinite { variable: 0, .. }));
}

// === Unification ===

#[test]
fn unify_matches_function_types_structurally() {
    let interner = Interner::new();
    let mut table = TypeTable::new();
    let left = Type::function(Type::Var(0), int(&interner));
    let right = Type::function(int(&interner), Type::Var(1));
    table.unify(&left, &right, &EmptyResolver).unwrap();
    assert_eq!(table.resolve(&Type::Var(0)), int(&interner));
    assert_eq!(table.resolve(&Type::Var(1)), int(&interner));
}

#[test]
fn unify_reports_mismatched_constructors() {
    let interner = Interner::new();
    let mut table = TypeTable::new();
    let fault = table
        .unify(
            &int(&interner),
            &fen_ir::builtin::bool(&interner),
            &EmptyResolver,
        )
        .unwrap_err();
    assert!(matches!(fault, TypeError::Mismatch { .. }));
}

#[test]
fn unify_reports_mismatched_function_shapes() {
    let interner = Interner::new();
    let mut table = TypeTable::new();
    let function = Type::function(int(&interner), int(&interner));
    let fault = table
        .unify(&function, &int(&interner), &EmptyResolver)
        .unwrap_err();
    assert!(matches!(fault, TypeError::Mismatch { .. }));
}

// === Generalization and instantiation ===

#[test]
fn generate_renames_shared_variables_consistently() {
    let mut table = TypeTable::new();
    let mut counters = Counters::new();
    counters.reserve_type(); // id 0 is the bound variable below
    let identity = Type::function(Type::Var(0), Type::Var(0));

    let first = table.generate(&identity, &mut counters);
    let second = table.generate(&identity, &mut counters);

    // Each instantiation is internally consistent.
    let var_of = |ty: &Type| match ty {
        Type::Function { argument, result } => {
            assert_eq!(argument, result);
            match argument.as_ref() {
                Type::Var(v) => *v,
                other => panic!("expected a variable, got {other:?}"),
            }
        }
        other => panic!("expected a function type, got {other:?}"),
    };
    let first_var = var_of(&first);
    let second_var = var_of(&second);

    // And the two instantiations are independent of each other and of
    // the original.
    assert_ne!(first_var, 0);
    assert_ne!(second_var, 0);
    assert_ne!(first_var, second_var);
}

#[test]
fn specialized_variables_survive_instantiation_unrenamed() {
    let mut table = TypeTable::new();
    let mut counters = Counters::new();
    counters.reserve_type();
    counters.reserve_type();
    let ty = Type::function(Type::Var(0), Type::Var(1));
    table.specialize(&Type::Var(0));

    let instance = table.generate(&ty, &mut counters);
    match instance {
        Type::Function { argument, result } => {
            assert_eq!(*argument, Type::Var(0));
            assert_ne!(*result, Type::Var(1));
        }
        other => panic!("expected a function type, got {other:?}"),
    }
}

#[test]
fn generalize_releases_previously_specialized_variables() {
    let mut table = TypeTable::new();
    let mut counters = Counters::new();
    counters.reserve_type();
    table.specialize(&Type::Var(0));
    assert!(table.is_specialized(0));
    table.generalize(&Type::Var(0));
    assert!(!table.is_specialized(0));

    let instance = table.generate(&Type::Var(0), &mut counters);
    assert_ne!(instance, Type::Var(0));
}

// === Type-class contexts ===

#[test]
fn constraints_follow_a_variable_onto_another_variable() {
    let interner = Interner::new();
    let eq_class = Symbol::unqualified(interner.intern("Eq"));
    let mut table = TypeTable::new();
    table.extend_context(0, eq_class);
    table.bind(0, &Type::Var(1), &EmptyResolver).unwrap();
    assert!(table.context(1).is_some_and(|set| set.contains(&eq_class)));
}

#[test]
fn binding_a_constrained_variable_checks_for_an_instance() {
    let interner = Interner::new();
    let eq_class = Symbol::unqualified(interner.intern("Eq"));
    let mut table = TypeTable::new();
    table.extend_context(0, eq_class);

    let fault = table.bind(0, &int(&interner), &EmptyResolver).unwrap_err();
    assert!(matches!(fault, TypeError::NoInstance { .. }));

    // With an instance available the bind goes through.
    table.bind(0, &int(&interner), &Permissive).unwrap();
    assert_eq!(table.resolve(&Type::Var(0)), int(&interner));
}
