//! Value expressions.

use crate::ast::PatternMatcher;
use crate::{Name, SourceRange, Symbol, Type};

/// A literal constant.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum Literal {
    Int(i64),
    /// Stored as bits for `Eq`/`Hash`.
    Double(u64),
    Char(char),
    String(Name),
    Bool(bool),
}

/// An expression together with its reserved type and source range.
///
/// Every node carries a type from the moment it is built: a fresh variable
/// reserved during qualification, narrowed by unification during checking.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Value {
    pub kind: ValueKind,
    pub ty: Type,
    pub range: SourceRange,
}

impl Value {
    pub fn new(kind: ValueKind, ty: Type, range: SourceRange) -> Self {
        Value { kind, ty, range }
    }

    /// Functional update: same node, different type.
    #[must_use]
    pub fn with_type(mut self, ty: Type) -> Self {
        self.ty = ty;
        self
    }
}

/// One binding of a `let` expression.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Binding {
    pub symbol: Symbol,
    pub value: Value,
    pub range: SourceRange,
}

impl Binding {
    pub fn new(symbol: Symbol, value: Value, range: SourceRange) -> Self {
        Binding {
            symbol,
            value,
            range,
        }
    }
}

/// A reduced-lambda parameter: a generated argument symbol and its type.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Parameter {
    pub symbol: Symbol,
    pub ty: Type,
}

impl Parameter {
    pub fn new(symbol: Symbol, ty: Type) -> Self {
        Parameter { symbol, ty }
    }
}

/// Expression forms.
///
/// `Sequence` exists only pre-shuffle; `Function` only pre-reduction.
/// `And`, `IsConstructor`, `FieldAccess`, `Lambda`, and `Raise` are built by
/// the pattern reducer and flow through to codegen.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum ValueKind {
    /// Flat juxtaposed sequence as written, before operator shuffling.
    Sequence(Vec<Value>),
    Identifier(Symbol),
    Literal(Literal),
    Apply {
        function: Box<Value>,
        argument: Box<Value>,
    },
    /// A multi-clause pattern-matching function, before reduction.
    Function(PatternMatcher),
    /// A reduced function: plain parameters, dispatch in the body.
    Lambda {
        parameters: Vec<Parameter>,
        body: Box<Value>,
    },
    Conditional {
        condition: Box<Value>,
        when_true: Box<Value>,
        when_false: Box<Value>,
    },
    Let {
        bindings: Vec<Binding>,
        body: Box<Value>,
    },
    /// Short-circuit conjunction of reduced pattern tests.
    And {
        left: Box<Value>,
        right: Box<Value>,
    },
    /// Runtime constructor-tag test.
    IsConstructor {
        value: Box<Value>,
        constructor: Symbol,
    },
    /// Constructor field accessor.
    FieldAccess {
        value: Box<Value>,
        field: Name,
    },
    /// Runtime fault; the reducer's no-match fallback.
    Raise(&'static str),
}
