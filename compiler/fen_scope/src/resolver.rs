//! External symbol resolution.
//!
//! The root scope delegates to a [`SymbolResolver`] for anything defined
//! outside the current compilation unit: previously compiled modules and
//! the standard library. The core never performs I/O; the resolver is a
//! capability handed in at construction.

use fen_ir::{DataTypeDescriptor, Operator, Symbol, Type};

/// Lookups for symbols defined outside the compilation unit.
pub trait SymbolResolver {
    /// The value type of an external symbol, if it exists.
    fn resolve_value(&self, symbol: &Symbol) -> Option<Type>;

    /// The declared fixity of an external operator symbol.
    fn resolve_operator(&self, symbol: &Symbol) -> Option<Operator>;

    /// Whether `ty` has an instance of the type class named by `class`.
    fn is_instance(&self, class: &Symbol, ty: &Type) -> bool;

    /// The data-type descriptor owning an external constructor symbol.
    fn resolve_constructor(&self, constructor: &Symbol) -> Option<DataTypeDescriptor>;
}

/// A resolver that knows nothing; every compilation unit is self-contained.
#[derive(Default)]
pub struct EmptyResolver;

impl SymbolResolver for EmptyResolver {
    fn resolve_value(&self, _symbol: &Symbol) -> Option<Type> {
        None
    }

    fn resolve_operator(&self, _symbol: &Symbol) -> Option<Operator> {
        None
    }

    fn is_instance(&self, _class: &Symbol, _ty: &Type) -> bool {
        false
    }

    fn resolve_constructor(&self, _constructor: &Symbol) -> Option<DataTypeDescriptor> {
        None
    }
}
