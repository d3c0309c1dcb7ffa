//! Types for the Hindley-Milner substrate.

use rustc_hash::FxHashSet;

use crate::{Interner, Symbol};

/// A Fen type.
///
/// - `Var` is a unification variable, identified by a per-compilation-unit
///   unique id handed out by the scope arena's counter.
/// - `Sum` is a named (possibly parameterized) algebraic data type.
/// - `Function` is a single-argument function; multi-argument functions are
///   curried chains.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Type {
    Var(u32),
    Sum {
        symbol: Symbol,
        arguments: Vec<Type>,
    },
    Function {
        argument: Box<Type>,
        result: Box<Type>,
    },
}

impl Type {
    /// A niladic sum type.
    pub fn sum(symbol: Symbol) -> Type {
        Type::Sum {
            symbol,
            arguments: Vec::new(),
        }
    }

    /// A parameterized sum type.
    pub fn sum_with(symbol: Symbol, arguments: Vec<Type>) -> Type {
        Type::Sum { symbol, arguments }
    }

    /// A function type `argument -> result`.
    pub fn function(argument: Type, result: Type) -> Type {
        Type::Function {
            argument: Box::new(argument),
            result: Box::new(result),
        }
    }

    /// Collect the ids of all variables occurring in this type.
    pub fn free_variables(&self) -> FxHashSet<u32> {
        let mut variables = FxHashSet::default();
        self.collect_variables(&mut variables);
        variables
    }

    fn collect_variables(&self, variables: &mut FxHashSet<u32>) {
        match self {
            Type::Var(id) => {
                variables.insert(*id);
            }
            Type::Sum { arguments, .. } => {
                for argument in arguments {
                    argument.collect_variables(variables);
                }
            }
            Type::Function { argument, result } => {
                argument.collect_variables(variables);
                result.collect_variables(variables);
            }
        }
    }

    /// Check whether variable `id` occurs anywhere in this type.
    pub fn contains_variable(&self, id: u32) -> bool {
        match self {
            Type::Var(other) => *other == id,
            Type::Sum { arguments, .. } => {
                arguments.iter().any(|argument| argument.contains_variable(id))
            }
            Type::Function { argument, result } => {
                argument.contains_variable(id) || result.contains_variable(id)
            }
        }
    }

    /// Render for diagnostics, e.g. `fen.lang.List t0 -> fen.lang.Int`.
    pub fn display(&self, interner: &Interner) -> String {
        match self {
            Type::Var(id) => format!("t{id}"),
            Type::Sum { symbol, arguments } => {
                let mut text = symbol.display(interner);
                for argument in arguments {
                    text.push(' ');
                    let needs_parens = match argument {
                        Type::Function { .. } => true,
                        Type::Sum { arguments, .. } => !arguments.is_empty(),
                        Type::Var(_) => false,
                    };
                    if needs_parens {
                        text.push('(');
                        text.push_str(&argument.display(interner));
                        text.push(')');
                    } else {
                        text.push_str(&argument.display(interner));
                    }
                }
                text
            }
            Type::Function { argument, result } => {
                let argument_text = if matches!(**argument, Type::Function { .. }) {
                    format!("({})", argument.display(interner))
                } else {
                    argument.display(interner)
                };
                format!("{} -> {}", argument_text, result.display(interner))
            }
        }
    }
}

/// Built-in `fen.lang` types used by literals and reduced pattern tests.
pub mod builtin {
    use super::Type;
    use crate::{Interner, Symbol};

    /// The implicit prelude module every module imports.
    pub const PRELUDE_MODULE: &str = "fen.lang";

    fn prelude_type(interner: &Interner, member: &str) -> Type {
        Type::sum(Symbol::qualified(
            interner.intern(PRELUDE_MODULE),
            interner.intern(member),
        ))
    }

    pub fn int(interner: &Interner) -> Type {
        prelude_type(interner, "Int")
    }

    pub fn double(interner: &Interner) -> Type {
        prelude_type(interner, "Double")
    }

    pub fn char(interner: &Interner) -> Type {
        prelude_type(interner, "Char")
    }

    pub fn string(interner: &Interner) -> Type {
        prelude_type(interner, "String")
    }

    pub fn bool(interner: &Interner) -> Type {
        prelude_type(interner, "Bool")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_free_variables() {
        let ty = Type::function(Type::Var(0), Type::function(Type::Var(1), Type::Var(0)));
        let vars = ty.free_variables();
        assert_eq!(vars.len(), 2);
        assert!(vars.contains(&0));
        assert!(vars.contains(&1));
    }

    #[test]
    fn test_contains_variable() {
        let interner = Interner::new();
        let list = interner.intern("List");
        let ty = Type::sum_with(Symbol::unqualified(list), vec![Type::Var(3)]);
        assert!(ty.contains_variable(3));
        assert!(!ty.contains_variable(4));
    }

    #[test]
    fn test_display_function_nesting() {
        let interner = Interner::new();
        let ty = Type::function(
            Type::function(Type::Var(0), Type::Var(1)),
            Type::Var(2),
        );
        assert_eq!(ty.display(&interner), "(t0 -> t1) -> t2");
    }

    #[test]
    fn test_display_builtin() {
        let interner = Interner::new();
        assert_eq!(builtin::int(&interner).display(&interner), "fen.lang.Int");
    }
}
