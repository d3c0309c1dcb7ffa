//! Diagnostic system for the Fen compiler.
//!
//! Faults are data, never control flow that unwinds across stage
//! boundaries:
//! - Error codes group faults by pipeline stage (scan, parse/shuffle,
//!   symbol, type) for searchability
//! - Every diagnostic carries an exact, human-locatable source range
//! - The [`DiagnosticQueue`] collects faults across independent definitions
//!   instead of stopping at the first one

mod diagnostic;
mod error_code;
mod queue;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use queue::DiagnosticQueue;
