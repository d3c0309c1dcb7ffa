//! Scopes, symbols, and the unification substrate for Fen.
//!
//! The arena-backed scope tree is the backbone artifact of a compilation
//! unit: every later stage resolves names, reserves type variables, and
//! records inferred types through it. See [`ScopeArena`] for the scope
//! model and [`TypeTable`] for the Algorithm-W bookkeeping it embeds.

mod arena;
mod counters;
mod error;
mod resolver;
mod unify;

pub use crate::arena::{ScopeArena, ScopeId, ScopeKind, SymbolEntry};
pub use crate::counters::Counters;
pub use crate::error::{ScopeError, TypeError};
pub use crate::resolver::{EmptyResolver, SymbolResolver};
pub use crate::unify::TypeTable;
