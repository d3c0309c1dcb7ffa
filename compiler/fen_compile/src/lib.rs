//! The compilation passes: operator shuffling, scope qualification, pattern
//! reduction, type checking, and the driver that runs them in order over one
//! source unit.

mod pipeline;
mod qualify;
mod reduce;
mod shuffle;
mod typecheck;

pub use pipeline::{Compiler, Elaborated};
pub use qualify::Qualifier;
pub use reduce::Reducer;
pub use typecheck::TypeChecker;
