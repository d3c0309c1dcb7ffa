//! Pattern-match reduction.
//!
//! Linearizes every multi-clause [`PatternMatcher`] into a plain
//! [`ValueKind::Lambda`]: generated parameters, then a chain of nested
//! conditionals trying each clause in declaration order. Constructor
//! patterns become `IsConstructor` tag tests conjoined over every depth;
//! captures bind through chained `FieldAccess` expressions; literals
//! become equality tests; the final fallback raises an incomplete-match
//! fault at runtime. First-match order is a hard invariant.

use tracing::error;

use fen_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use fen_ir::{
    builtin, Binding, Definition, Interner, Literal, Parameter, PatternCase, PatternMatch,
    PatternMatchKind, PatternMatcher, SourceRange, Symbol, Type, Value, ValueKind,
};
use fen_scope::ScopeArena;

/// What one pattern contributes to its clause: a runtime test (absent for
/// irrefutable patterns) and the bindings visible to the clause body.
struct Compiled {
    condition: Option<Value>,
    bindings: Vec<Binding>,
}

pub struct Reducer<'a> {
    arena: &'a mut ScopeArena,
    interner: &'a Interner,
}

impl<'a> Reducer<'a> {
    pub fn new(arena: &'a mut ScopeArena, interner: &'a Interner) -> Self {
        Reducer { arena, interner }
    }

    /// Reduce every matcher in the unit. A fault drops the definition that
    /// contains it; siblings continue.
    pub fn run(
        &mut self,
        definitions: Vec<Definition>,
        faults: &mut DiagnosticQueue,
    ) -> Vec<Definition> {
        definitions
            .into_iter()
            .filter_map(|definition| match definition {
                Definition::Module {
                    name,
                    imports,
                    definitions,
                    range,
                } => {
                    let members = self.run(definitions, faults);
                    Some(Definition::Module {
                        name,
                        imports,
                        definitions: members,
                        range,
                    })
                }
                Definition::Value {
                    symbol,
                    body,
                    range,
                } => match self.value(body) {
                    Ok(body) => Some(Definition::Value {
                        symbol,
                        body,
                        range,
                    }),
                    Err(fault) => {
                        faults.push(fault);
                        None
                    }
                },
                declaration => Some(declaration),
            })
            .collect()
    }

    fn value(&mut self, value: Value) -> Result<Value, Diagnostic> {
        let Value { kind, ty, range } = value;
        let kind = match kind {
            ValueKind::Function(matcher) => return self.matcher(matcher, ty, range),
            ValueKind::Apply { function, argument } => ValueKind::Apply {
                function: Box::new(self.value(*function)?),
                argument: Box::new(self.value(*argument)?),
            },
            ValueKind::Conditional {
                condition,
                when_true,
                when_false,
            } => ValueKind::Conditional {
                condition: Box::new(self.value(*condition)?),
                when_true: Box::new(self.value(*when_true)?),
                when_false: Box::new(self.value(*when_false)?),
            },
            ValueKind::Let { bindings, body } => ValueKind::Let {
                bindings: bindings
                    .into_iter()
                    .map(|binding| {
                        Ok(Binding::new(
                            binding.symbol,
                            self.value(binding.value)?,
                            binding.range,
                        ))
                    })
                    .collect::<Result<Vec<_>, Diagnostic>>()?,
                body: Box::new(self.value(*body)?),
            },
            ValueKind::Lambda { parameters, body } => ValueKind::Lambda {
                parameters,
                body: Box::new(self.value(*body)?),
            },
            ValueKind::Sequence(_) => {
                error!("unshuffled sequence reached the pattern reducer");
                return Err(Diagnostic::internal(
                    "unshuffled sequence reached the pattern reducer",
                    range,
                ));
            }
            leaf => leaf,
        };
        Ok(Value::new(kind, ty, range))
    }

    /// One matcher becomes one lambda.
    fn matcher(
        &mut self,
        matcher: PatternMatcher,
        ty: Type,
        range: SourceRange,
    ) -> Result<Value, Diagnostic> {
        self.check_arities(&matcher)?;

        let parameters: Vec<Parameter> = matcher
            .arguments
            .iter()
            .map(|argument_ty| {
                let name = self.arena.reserve_local(self.interner);
                Parameter::new(Symbol::unqualified(name), argument_ty.clone())
            })
            .collect();

        let mut dispatch = Value::new(
            ValueKind::Raise("Incomplete match"),
            self.arena.reserve_type(),
            range,
        );
        for case in matcher.cases.into_iter().rev() {
            let body = self.value(case.body)?;
            let mut condition: Option<Value> = None;
            let mut bindings: Vec<Binding> = Vec::new();
            for (pattern, parameter) in case.patterns.iter().zip(&parameters) {
                let subject = Value::new(
                    ValueKind::Identifier(parameter.symbol),
                    parameter.ty.clone(),
                    pattern.range,
                );
                let compiled = self.pattern(pattern, subject)?;
                condition = conjoin(condition, compiled.condition, self.interner);
                bindings.extend(compiled.bindings);
            }
            let body = if bindings.is_empty() {
                body
            } else {
                let ty = body.ty.clone();
                let range = body.range;
                Value::new(
                    ValueKind::Let {
                        bindings,
                        body: Box::new(body),
                    },
                    ty,
                    range,
                )
            };
            // An unconditional clause short-circuits everything after it.
            dispatch = match condition {
                None => body,
                Some(condition) => {
                    let ty = body.ty.clone();
                    Value::new(
                        ValueKind::Conditional {
                            condition: Box::new(condition),
                            when_true: Box::new(body),
                            when_false: Box::new(dispatch),
                        },
                        ty,
                        case.range,
                    )
                }
            };
        }

        Ok(Value::new(
            ValueKind::Lambda {
                parameters,
                body: Box::new(dispatch),
            },
            ty,
            range,
        ))
    }

    /// Every clause of a matcher must declare the same number of argument
    /// patterns.
    fn check_arities(&self, matcher: &PatternMatcher) -> Result<(), Diagnostic> {
        let mut first: Option<&PatternCase> = None;
        for case in &matcher.cases {
            match first {
                None => first = Some(case),
                Some(reference) if reference.arity() != case.arity() => {
                    return Err(Diagnostic::error(
                        ErrorCode::E1004,
                        format!(
                            "pattern clauses disagree on argument count: {} here, {} in the first clause",
                            case.arity(),
                            reference.arity()
                        ),
                        case.range,
                    )
                    .with_note(format!(
                        "first clause with {} argument(s) is at {}",
                        reference.arity(),
                        reference.range
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Compile one pattern against the expression that produces the value
    /// it matches.
    fn pattern(&mut self, pattern: &PatternMatch, subject: Value) -> Result<Compiled, Diagnostic> {
        match &pattern.kind {
            PatternMatchKind::Ignore => Ok(Compiled {
                condition: None,
                bindings: Vec::new(),
            }),
            PatternMatchKind::Capture(symbol) => Ok(Compiled {
                condition: None,
                bindings: vec![Binding::new(*symbol, subject, pattern.range)],
            }),
            PatternMatchKind::Literal(literal) => {
                let test = self.equality_test(subject, *literal, pattern.range);
                Ok(Compiled {
                    condition: Some(test),
                    bindings: Vec::new(),
                })
            }
            PatternMatchKind::Struct {
                constructor,
                fields,
            } => {
                let tag_test = Value::new(
                    ValueKind::IsConstructor {
                        value: Box::new(subject.clone()),
                        constructor: *constructor,
                    },
                    builtin::bool(self.interner),
                    pattern.range,
                );
                let mut condition = Some(tag_test);
                let mut bindings = Vec::new();
                for field in fields {
                    let accessor = Value::new(
                        ValueKind::FieldAccess {
                            value: Box::new(subject.clone()),
                            field: field.field,
                        },
                        field.pattern.ty.clone(),
                        field.pattern.range,
                    );
                    let compiled = self.pattern(&field.pattern, accessor)?;
                    condition = conjoin(condition, compiled.condition, self.interner);
                    bindings.extend(compiled.bindings);
                }
                Ok(Compiled {
                    condition,
                    bindings,
                })
            }
            PatternMatchKind::Sequence(_) | PatternMatchKind::Tuple(_) => {
                error!("unqualified pattern form reached the pattern reducer");
                Err(Diagnostic::internal(
                    "unqualified pattern form reached the pattern reducer",
                    pattern.range,
                ))
            }
        }
    }

    /// `subject == literal`, dispatched through the prelude's equality
    /// member so user types compare via their own instances.
    fn equality_test(&mut self, subject: Value, literal: Literal, range: SourceRange) -> Value {
        let equals = Value::new(
            ValueKind::Identifier(Symbol::qualified(
                self.arena.prelude(),
                self.interner.intern("=="),
            )),
            self.arena.reserve_type(),
            range,
        );
        let literal = Value::new(
            ValueKind::Literal(literal),
            self.arena.reserve_type(),
            range,
        );
        let partial = Value::new(
            ValueKind::Apply {
                function: Box::new(equals),
                argument: Box::new(subject),
            },
            self.arena.reserve_type(),
            range,
        );
        Value::new(
            ValueKind::Apply {
                function: Box::new(partial),
                argument: Box::new(literal),
            },
            builtin::bool(self.interner),
            range,
        )
    }
}

/// Conjoin two optional conditions; `None` is "always matches".
fn conjoin(left: Option<Value>, right: Option<Value>, interner: &Interner) -> Option<Value> {
    match (left, right) {
        (None, right) => right,
        (left, None) => left,
        (Some(left), Some(right)) => {
            let range = left.range.merge(right.range);
            Some(Value::new(
                ValueKind::And {
                    left: Box::new(left),
                    right: Box::new(right),
                },
                builtin::bool(interner),
                range,
            ))
        }
    }
}
