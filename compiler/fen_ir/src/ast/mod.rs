//! Syntax trees.
//!
//! Three closed categories, each a tagged union walked exhaustively by the
//! pipeline stages:
//!
//! - [`Value`]: expressions, from the flat pre-shuffle `Sequence` form
//!   through to the reduced conditional/accessor forms codegen consumes.
//! - [`PatternMatch`]: pattern clauses, from flat `Sequence` through
//!   shuffled/qualified `Struct` form; the reducer eliminates them entirely.
//! - [`Definition`]: top-level definitions grouped under modules.

mod definition;
mod pattern;
mod value;

pub use definition::Definition;
pub use pattern::{FieldMatch, PatternCase, PatternMatch, PatternMatchKind, PatternMatcher};
pub use value::{Binding, Literal, Parameter, Value, ValueKind};
