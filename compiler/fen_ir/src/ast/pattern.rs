//! Pattern matches, cases, and matchers.

use crate::ast::Value;
use crate::{Name, SourceRange, Symbol, Type};

/// A pattern together with its reserved type and source range.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct PatternMatch {
    pub kind: PatternMatchKind,
    pub ty: Type,
    pub range: SourceRange,
}

impl PatternMatch {
    pub fn new(kind: PatternMatchKind, ty: Type, range: SourceRange) -> Self {
        PatternMatch { kind, ty, range }
    }
}

/// One named field sub-match of a [`PatternMatchKind::Struct`].
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct FieldMatch {
    pub field: Name,
    pub pattern: PatternMatch,
}

impl FieldMatch {
    pub fn new(field: Name, pattern: PatternMatch) -> Self {
        FieldMatch { field, pattern }
    }
}

/// Pattern forms.
///
/// `Sequence` exists only pre-shuffle: a flat run of sub-patterns and
/// operator-named captures as written. The pattern shuffler turns
/// constructor operators into `Struct` matches; qualification lowers
/// `Tuple` onto the built-in tuple constructors.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum PatternMatchKind {
    /// Bind a name to the matched value.
    Capture(Symbol),
    /// `_`: match anything, bind nothing.
    Ignore,
    /// Equality test against a literal.
    Literal(crate::ast::Literal),
    /// Flat pre-shuffle run of sub-patterns.
    Sequence(Vec<PatternMatch>),
    /// Constructor test with named field sub-matches, in declared field
    /// order.
    Struct {
        constructor: Symbol,
        fields: Vec<FieldMatch>,
    },
    /// Tuple destructuring, lowered to `Struct` during qualification.
    Tuple(Vec<PatternMatch>),
}

/// One clause of a multi-clause function definition.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct PatternCase {
    /// One pattern per argument position.
    pub patterns: Vec<PatternMatch>,
    pub body: Value,
    pub range: SourceRange,
}

impl PatternCase {
    pub fn new(patterns: Vec<PatternMatch>, body: Value, range: SourceRange) -> Self {
        PatternCase {
            patterns,
            body,
            range,
        }
    }

    /// Number of argument patterns this clause declares.
    #[inline]
    pub fn arity(&self) -> usize {
        self.patterns.len()
    }
}

/// The full set of clauses for one function symbol.
///
/// Cases are tried in declaration order; first-match semantics is a hard
/// invariant of the reducer, not an accident of clause ordering.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct PatternMatcher {
    /// One fresh type variable per argument position.
    pub arguments: Vec<Type>,
    pub cases: Vec<PatternCase>,
    pub range: SourceRange,
}

impl PatternMatcher {
    pub fn new(arguments: Vec<Type>, cases: Vec<PatternCase>, range: SourceRange) -> Self {
        PatternMatcher {
            arguments,
            cases,
            range,
        }
    }
}
