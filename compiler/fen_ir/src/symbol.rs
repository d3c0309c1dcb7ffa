//! Symbols: qualified and unqualified names.

use std::fmt;

use crate::{Interner, Name};

/// A name as it appears in source (`Unqualified`) or resolved to its home
/// module (`Qualified`).
///
/// Identity is structural. An unqualified symbol has no stored identity of
/// its own; it must be resolved against a scope to become qualified. Once a
/// qualified symbol is registered in a scope's table its identity never
/// changes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Qualified { module: Name, member: Name },
    Unqualified { member: Name },
}

impl Symbol {
    /// Create a qualified symbol.
    #[inline]
    pub const fn qualified(module: Name, member: Name) -> Self {
        Symbol::Qualified { module, member }
    }

    /// Create an unqualified symbol.
    #[inline]
    pub const fn unqualified(member: Name) -> Self {
        Symbol::Unqualified { member }
    }

    /// The member name, with or without qualification.
    #[inline]
    pub const fn member(&self) -> Name {
        match self {
            Symbol::Qualified { member, .. } | Symbol::Unqualified { member } => *member,
        }
    }

    /// The module name, if qualified.
    #[inline]
    pub const fn module(&self) -> Option<Name> {
        match self {
            Symbol::Qualified { module, .. } => Some(*module),
            Symbol::Unqualified { .. } => None,
        }
    }

    #[inline]
    pub const fn is_qualified(&self) -> bool {
        matches!(self, Symbol::Qualified { .. })
    }

    /// Render for diagnostics, e.g. `fen.lang.(:)` or `x`.
    pub fn display(&self, interner: &Interner) -> String {
        let member = interner.resolve(self.member());
        match self.module() {
            Some(module) => format!("{}.{}", interner.resolve(module), member),
            None => member.to_string(),
        }
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Qualified { module, member } => {
                write!(f, "{}#{}", module.raw(), member.raw())
            }
            Symbol::Unqualified { member } => write!(f, "#{}", member.raw()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_structural_equality() {
        let interner = Interner::new();
        let m = interner.intern("fen.lang");
        let x = interner.intern("x");
        assert_eq!(Symbol::qualified(m, x), Symbol::qualified(m, x));
        assert_ne!(Symbol::qualified(m, x), Symbol::unqualified(x));
    }

    #[test]
    fn test_display() {
        let interner = Interner::new();
        let m = interner.intern("main");
        let x = interner.intern("go");
        assert_eq!(Symbol::qualified(m, x).display(&interner), "main.go");
        assert_eq!(Symbol::unqualified(x).display(&interner), "go");
    }
}
