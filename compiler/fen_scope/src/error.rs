//! Scope and type faults as data.
//!
//! Arena and unification operations do not know source positions; callers
//! attach the range when converting a fault into a [`Diagnostic`].

use fen_diagnostic::{Diagnostic, ErrorCode};
use fen_ir::{Interner, Name, SourceRange, Symbol, Type};

/// A fault raised by scope construction or symbol resolution.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum ScopeError {
    /// No definition or import provides the symbol.
    NotFound { symbol: Symbol },
    /// The symbol already carries this attribute in the same scope.
    Conflict {
        symbol: Symbol,
        attribute: &'static str,
    },
    /// A qualified reference names a module that is not imported.
    NotImported { symbol: Symbol, module: Name },
    /// `leave_scope` at the root. Compiler bug, not user error.
    LeaveRoot,
}

impl ScopeError {
    pub fn to_diagnostic(&self, range: SourceRange, interner: &Interner) -> Diagnostic {
        match self {
            ScopeError::NotFound { symbol } => Diagnostic::error(
                ErrorCode::E2001,
                format!("symbol not found: {}", symbol.display(interner)),
                range,
            ),
            ScopeError::Conflict { symbol, attribute } => Diagnostic::error(
                ErrorCode::E2002,
                format!(
                    "redefinition of {} for {}",
                    attribute,
                    symbol.display(interner)
                ),
                range,
            ),
            ScopeError::NotImported { symbol, module } => Diagnostic::error(
                ErrorCode::E2003,
                format!(
                    "cannot resolve {}: module {} is not imported",
                    symbol.display(interner),
                    interner.resolve(*module)
                ),
                range,
            ),
            ScopeError::LeaveRoot => {
                Diagnostic::internal("attempted to leave the root scope", range)
            }
        }
    }
}

/// A fault raised by unification.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum TypeError {
    /// Two types cannot be made equal.
    Mismatch { expected: Type, found: Type },
    /// Occurs check failure; the variable appears inside its own binding.
    Infinite { variable: u32, ty: Type },
    /// A type-class constraint has no instance for the bound type.
    NoInstance { class: Symbol, ty: Type },
}

impl TypeError {
    pub fn to_diagnostic(&self, range: SourceRange, interner: &Interner) -> Diagnostic {
        match self {
            TypeError::Mismatch { expected, found } => Diagnostic::error(
                ErrorCode::E3001,
                format!(
                    "type mismatch: expected {}, found {}",
                    expected.display(interner),
                    found.display(interner)
                ),
                range,
            ),
            TypeError::Infinite { variable, ty } => Diagnostic::error(
                ErrorCode::E3002,
                format!(
                    "infinite type: t{} occurs in {}",
                    variable,
                    ty.display(interner)
                ),
                range,
            ),
            TypeError::NoInstance { class, ty } => Diagnostic::error(
                ErrorCode::E3003,
                format!(
                    "no instance of {} for {}",
                    class.display(interner),
                    ty.display(interner)
                ),
                range,
            ),
        }
    }
}
