//! Fen IR - shared data model for the Fen compiler.
//!
//! This crate contains the core data structures every pipeline stage
//! consumes and produces:
//! - Source points and ranges for error reporting
//! - Interned `Name` identifiers
//! - Tokens produced by the scanner and layout engine
//! - Symbols (qualified and unqualified) and operator fixities
//! - Types for the Hindley-Milner substrate
//! - The Value / `PatternMatch` / Definition syntax trees
//! - Algebraic-data-type descriptors for constructor dispatch
//!
//! # Design Philosophy
//!
//! - **Intern strings**: identifiers, module names, and field names are
//!   `Name(u32)` values resolved through a shared [`Interner`].
//! - **Structural identity**: symbols and types compare by value, never by
//!   reference.
//! - **Trees are rebuilt, not mutated**: each pipeline stage returns a new
//!   tree sharing nothing mutable with its input.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod data;
mod interner;
mod name;
mod operator;
mod range;
mod symbol;
mod token;
mod types;

pub use ast::{
    Binding, Definition, FieldMatch, Literal, Parameter, PatternCase, PatternMatch,
    PatternMatchKind, PatternMatcher, Value, ValueKind,
};
pub use data::{DataConstructorDescriptor, DataFieldDescriptor, DataTypeDescriptor};
pub use interner::{Interner, SharedInterner};
pub use name::Name;
pub use operator::{Fixity, Operator};
pub use range::{Point, SourceRange};
pub use symbol::Symbol;
pub use token::{Token, TokenKind};
pub use types::{builtin, Type};
