use std::fmt;

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where the first digit indicates the fault family:
/// - E0xxx: Scan faults
/// - E1xxx: Parse/shuffle faults
/// - E2xxx: Symbol faults
/// - E3xxx: Type faults
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Scan faults (E0xxx)
    /// Malformed numeric literal
    E0001,
    /// Unterminated string literal
    E0002,
    /// Unterminated character literal
    E0003,
    /// Invalid escape sequence
    E0004,
    /// Empty or overlong character literal
    E0005,
    /// Unterminated block comment
    E0006,
    /// Reserved word inside backtick quotes
    E0007,
    /// Unexpected character in source
    E0008,

    // Parse/shuffle faults (E1xxx)
    /// Binary operator in a position expecting a prefix operator
    E1001,
    /// Shuffled sequence did not reduce to a single result
    E1002,
    /// Constructor arity mismatch in a pattern
    E1003,
    /// Pattern clauses of one matcher disagree on argument count
    E1004,
    /// Illegal pattern head (non-constructor applied to sub-patterns)
    E1005,
    /// Empty sequence where an expression or pattern was required
    E1006,

    // Symbol faults (E2xxx)
    /// Symbol not found
    E2001,
    /// Redefinition conflict
    E2002,
    /// Qualified symbol does not match any import
    E2003,

    // Type faults (E3xxx)
    /// Unification mismatch
    E3001,
    /// Infinite (circular) type
    E3002,
    /// No type-class instance for the constrained type
    E3003,

    // Internal errors (E9xxx)
    /// Compiler invariant violation
    E9001,
}

impl ErrorCode {
    /// The code as it appears in rendered output, e.g. `"E2001"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            ErrorCode::E0007 => "E0007",
            ErrorCode::E0008 => "E0008",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// True for scan faults.
    pub fn is_scan(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    /// True for internal compiler errors.
    pub fn is_internal(&self) -> bool {
        matches!(self, ErrorCode::E9001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
