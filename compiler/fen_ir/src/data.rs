//! Algebraic-data-type descriptors.
//!
//! Static metadata registered during qualification and consumed by the
//! pattern reducer (field layout for destructuring) and by downstream
//! codegen (tag-based dispatch). Constructor ordinals are the dispatch tags:
//! their ordering must stay stable, so constructors are kept sorted by
//! ordinal at construction time.

use crate::{Name, Symbol, Type};

/// One named field of a data constructor.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct DataFieldDescriptor {
    /// Position within the constructor (destructuring order).
    pub ordinal: u32,
    pub name: Name,
    pub ty: Type,
}

impl DataFieldDescriptor {
    pub fn new(ordinal: u32, name: Name, ty: Type) -> Self {
        DataFieldDescriptor { ordinal, name, ty }
    }
}

/// One constructor of a data type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct DataConstructorDescriptor {
    /// Tag used for runtime dispatch.
    pub ordinal: u32,
    /// Qualified constructor symbol.
    pub symbol: Symbol,
    /// Fields in declared order.
    pub fields: Vec<DataFieldDescriptor>,
}

impl DataConstructorDescriptor {
    pub fn new(ordinal: u32, symbol: Symbol, fields: Vec<DataFieldDescriptor>) -> Self {
        DataConstructorDescriptor {
            ordinal,
            symbol,
            fields,
        }
    }

    /// Constructors with no fields compile to shared singletons rather than
    /// per-call allocations.
    #[inline]
    pub fn is_niladic(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields the constructor declares.
    #[inline]
    pub fn arity(&self) -> usize {
        self.fields.len()
    }
}

/// A complete data type: qualified symbol, type parameters, constructors.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct DataTypeDescriptor {
    /// Qualified type symbol.
    pub symbol: Symbol,
    /// Type parameter variable ids, in declared order.
    pub parameters: Vec<u32>,
    /// Constructors, sorted by ordinal.
    pub constructors: Vec<DataConstructorDescriptor>,
}

impl DataTypeDescriptor {
    /// Create a descriptor; constructors are sorted by ordinal so the
    /// ordering survives regardless of declaration processing order.
    pub fn new(
        symbol: Symbol,
        parameters: Vec<u32>,
        mut constructors: Vec<DataConstructorDescriptor>,
    ) -> Self {
        constructors.sort_by_key(|constructor| constructor.ordinal);
        DataTypeDescriptor {
            symbol,
            parameters,
            constructors,
        }
    }

    /// Look up a constructor by symbol.
    pub fn constructor(&self, symbol: &Symbol) -> Option<&DataConstructorDescriptor> {
        self.constructors
            .iter()
            .find(|constructor| constructor.symbol == *symbol)
    }
}
