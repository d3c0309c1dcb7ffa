//! Top-level definitions.

use crate::ast::Value;
use crate::{DataTypeDescriptor, Name, Operator, SourceRange, Symbol, Type};

/// A top-level definition.
///
/// The external parser produces these (with flat `Sequence` bodies); the
/// pipeline rebuilds them stage by stage until every value body is shuffled,
/// qualified, reduced, and typed.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Definition {
    /// `name = body` or the clauses of `name p1 p2 = body`.
    Value {
        symbol: Symbol,
        body: Value,
        range: SourceRange,
    },
    /// `name :: type` signature declaration.
    Signature {
        symbol: Symbol,
        ty: Type,
        range: SourceRange,
    },
    /// Operator fixity/precedence declaration.
    Operator {
        symbol: Symbol,
        operator: Operator,
        range: SourceRange,
    },
    /// `data` declaration.
    Data {
        descriptor: DataTypeDescriptor,
        range: SourceRange,
    },
    /// Type-class declaration: class symbol, parameter variables, member
    /// signatures.
    Class {
        symbol: Symbol,
        arguments: Vec<u32>,
        members: Vec<Definition>,
        range: SourceRange,
    },
    /// A module: name, imports, member definitions.
    Module {
        name: Name,
        imports: Vec<Name>,
        definitions: Vec<Definition>,
        range: SourceRange,
    },
}

impl Definition {
    /// The source range of any definition form.
    pub fn range(&self) -> SourceRange {
        match self {
            Definition::Value { range, .. }
            | Definition::Signature { range, .. }
            | Definition::Operator { range, .. }
            | Definition::Data { range, .. }
            | Definition::Class { range, .. }
            | Definition::Module { range, .. } => *range,
        }
    }
}
