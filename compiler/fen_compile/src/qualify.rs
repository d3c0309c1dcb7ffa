//! Scope qualification.
//!
//! Walks parsed definitions depth-first: opens module and block scopes,
//! declares operators, signatures, data constructors, and value symbols
//! ahead of any body (so mutual recursion and the operator table work),
//! then rebuilds every body with sequences shuffled, identifiers
//! qualified, captures defined, tuples lowered onto the built-in tuple
//! descriptors, and a fresh type variable reserved for every node.
//!
//! One fault aborts one definition; siblings continue.

use fen_diagnostic::{Diagnostic, DiagnosticQueue};
use fen_ir::{
    Binding, DataConstructorDescriptor, DataTypeDescriptor, Definition, FieldMatch, Interner, Name,
    PatternCase, PatternMatch, PatternMatchKind, PatternMatcher, Symbol, Type, Value, ValueKind,
};
use fen_scope::ScopeArena;

use crate::shuffle::{check_pattern_arity, shuffle, ExpressionShuffler, PatternShuffler};

pub struct Qualifier<'a> {
    arena: &'a mut ScopeArena,
    interner: &'a Interner,
}

impl<'a> Qualifier<'a> {
    pub fn new(arena: &'a mut ScopeArena, interner: &'a Interner) -> Self {
        Qualifier { arena, interner }
    }

    /// Qualify a compilation unit. Failed definitions are dropped from the
    /// output; their faults accumulate in `faults`.
    pub fn run(
        &mut self,
        definitions: Vec<Definition>,
        faults: &mut DiagnosticQueue,
    ) -> Vec<Definition> {
        definitions
            .into_iter()
            .filter_map(|definition| self.definition(definition, faults))
            .collect()
    }

    fn definition(
        &mut self,
        definition: Definition,
        faults: &mut DiagnosticQueue,
    ) -> Option<Definition> {
        match definition {
            Definition::Module {
                name,
                imports,
                definitions,
                range,
            } => {
                self.arena.enter_module_scope(name, imports.clone());
                for member in &definitions {
                    if let Err(fault) = self.declare(member) {
                        faults.push(fault);
                    }
                }
                let members = definitions
                    .into_iter()
                    .filter_map(|member| self.member(member, name, faults))
                    .collect();
                if let Err(fault) = self.arena.leave_scope() {
                    faults.push(fault.to_diagnostic(range, self.interner));
                }
                Some(Definition::Module {
                    name,
                    imports,
                    definitions: members,
                    range,
                })
            }
            other => {
                faults.push(Diagnostic::internal(
                    "top-level definition outside a module",
                    other.range(),
                ));
                None
            }
        }
    }

    /// Declaration pre-pass: enter a member's symbols into the module scope
    /// without touching its body.
    fn declare(&mut self, member: &Definition) -> Result<(), Diagnostic> {
        match member {
            Definition::Operator {
                symbol,
                operator,
                range,
            } => self
                .arena
                .define_operator(symbol, *operator)
                .map_err(|fault| fault.to_diagnostic(*range, self.interner)),
            Definition::Signature { symbol, ty, range } => self
                .arena
                .define_signature(symbol, ty.clone())
                .map_err(|fault| fault.to_diagnostic(*range, self.interner)),
            Definition::Data { descriptor, range } => {
                self.arena.register_data_type(descriptor.clone());
                for constructor in &descriptor.constructors {
                    let ty = constructor_type(descriptor, constructor);
                    self.arena
                        .define_value(&constructor.symbol, ty)
                        .map_err(|fault| fault.to_diagnostic(*range, self.interner))?;
                }
                Ok(())
            }
            Definition::Class {
                symbol,
                arguments,
                members,
                range,
            } => {
                for argument in arguments {
                    self.arena.extend_context(*argument, *symbol);
                }
                for member in members {
                    if let Definition::Signature {
                        symbol: member_symbol,
                        ty,
                        ..
                    } = member
                    {
                        self.arena
                            .define_signature(member_symbol, ty.clone())
                            .map_err(|fault| fault.to_diagnostic(*range, self.interner))?;
                        self.arena.define_member(member_symbol);
                    }
                }
                Ok(())
            }
            Definition::Value { symbol, range, .. } => {
                let placeholder = self.arena.reserve_type();
                self.arena
                    .define_value(symbol, placeholder)
                    .map_err(|fault| fault.to_diagnostic(*range, self.interner))
            }
            Definition::Module { range, .. } => Err(Diagnostic::internal(
                "nested modules are not supported",
                *range,
            )),
        }
    }

    fn member(
        &mut self,
        member: Definition,
        module: Name,
        faults: &mut DiagnosticQueue,
    ) -> Option<Definition> {
        match member {
            Definition::Value {
                symbol,
                body,
                range,
            } => {
                let saved = self.arena.current();
                match self.value(body) {
                    Ok(body) => Some(Definition::Value {
                        symbol: Symbol::qualified(module, symbol.member()),
                        body,
                        range,
                    }),
                    Err(fault) => {
                        self.arena.set_current(saved);
                        faults.push(fault);
                        None
                    }
                }
            }
            declaration => Some(declaration),
        }
    }

    fn value(&mut self, value: Value) -> Result<Value, Diagnostic> {
        let range = value.range;
        let ty = self.arena.reserve_type();
        let kind = match value.kind {
            ValueKind::Sequence(items) => {
                let items = items
                    .into_iter()
                    .map(|item| self.value(item))
                    .collect::<Result<Vec<_>, _>>()?;
                let mut ops = ExpressionShuffler { arena: self.arena };
                return shuffle(&mut ops, items, range);
            }
            ValueKind::Identifier(symbol) => {
                let qualified = self
                    .arena
                    .qualify(&symbol)
                    .map_err(|fault| fault.to_diagnostic(range, self.interner))?;
                ValueKind::Identifier(qualified)
            }
            ValueKind::Literal(literal) => ValueKind::Literal(literal),
            ValueKind::Apply { function, argument } => ValueKind::Apply {
                function: Box::new(self.value(*function)?),
                argument: Box::new(self.value(*argument)?),
            },
            ValueKind::Function(matcher) => ValueKind::Function(self.matcher(matcher)?),
            ValueKind::Conditional {
                condition,
                when_true,
                when_false,
            } => ValueKind::Conditional {
                condition: Box::new(self.value(*condition)?),
                when_true: Box::new(self.value(*when_true)?),
                when_false: Box::new(self.value(*when_false)?),
            },
            ValueKind::Let { bindings, body } => {
                self.arena.enter_scope();
                for binding in &bindings {
                    let placeholder = self.arena.reserve_type();
                    self.arena
                        .define_value(&binding.symbol, placeholder)
                        .map_err(|fault| fault.to_diagnostic(binding.range, self.interner))?;
                }
                let bindings = bindings
                    .into_iter()
                    .map(|binding| {
                        Ok(Binding::new(
                            binding.symbol,
                            self.value(binding.value)?,
                            binding.range,
                        ))
                    })
                    .collect::<Result<Vec<_>, Diagnostic>>()?;
                let body = self.value(*body)?;
                self.arena
                    .leave_scope()
                    .map_err(|fault| fault.to_diagnostic(range, self.interner))?;
                ValueKind::Let {
                    bindings,
                    body: Box::new(body),
                }
            }
            // Reduced forms do not occur before reduction; pass through.
            passthrough => passthrough,
        };
        Ok(Value::new(kind, ty, range))
    }

    fn matcher(&mut self, matcher: PatternMatcher) -> Result<PatternMatcher, Diagnostic> {
        let arity = matcher.cases.first().map_or(0, PatternCase::arity);
        let arguments: Vec<Type> = (0..arity).map(|_| self.arena.reserve_type()).collect();
        let cases = matcher
            .cases
            .into_iter()
            .map(|case| self.case(case))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PatternMatcher::new(arguments, cases, matcher.range))
    }

    /// One clause: its captures live in a scope of their own, visible to
    /// the clause body only.
    fn case(&mut self, case: PatternCase) -> Result<PatternCase, Diagnostic> {
        self.arena.enter_scope();
        let patterns = case
            .patterns
            .into_iter()
            .map(|pattern| self.pattern(pattern))
            .collect::<Result<Vec<_>, _>>()?;
        for pattern in &patterns {
            check_pattern_arity(self.arena, self.interner, pattern)?;
        }
        let body = self.value(case.body)?;
        self.arena
            .leave_scope()
            .map_err(|fault| fault.to_diagnostic(case.range, self.interner))?;
        Ok(PatternCase::new(patterns, body, case.range))
    }

    fn pattern(&mut self, pattern: PatternMatch) -> Result<PatternMatch, Diagnostic> {
        let range = pattern.range;
        let ty = self.arena.reserve_type();
        let kind = match pattern.kind {
            PatternMatchKind::Sequence(items) => {
                // Operator-named captures stay flat for the shuffler to
                // interpret; everything else is qualified first.
                let items = items
                    .into_iter()
                    .map(|item| match &item.kind {
                        PatternMatchKind::Capture(symbol) if self.arena.is_operator(symbol) => {
                            Ok(item)
                        }
                        _ => self.pattern(item),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let mut ops = PatternShuffler {
                    arena: self.arena,
                    interner: self.interner,
                };
                return shuffle(&mut ops, items, range);
            }
            PatternMatchKind::Capture(symbol) => {
                if let Some(constructor) = self.constructor_symbol(&symbol) {
                    // A bare constructor name; arity is checked once the
                    // enclosing pattern is fully assembled.
                    PatternMatchKind::Struct {
                        constructor,
                        fields: Vec::new(),
                    }
                } else {
                    self.arena
                        .define_value(&symbol, ty.clone())
                        .map_err(|fault| fault.to_diagnostic(range, self.interner))?;
                    PatternMatchKind::Capture(symbol)
                }
            }
            PatternMatchKind::Ignore => PatternMatchKind::Ignore,
            PatternMatchKind::Literal(literal) => PatternMatchKind::Literal(literal),
            PatternMatchKind::Struct {
                constructor,
                fields,
            } => {
                let constructor = self
                    .arena
                    .qualify(&constructor)
                    .map_err(|fault| fault.to_diagnostic(range, self.interner))?;
                let fields = fields
                    .into_iter()
                    .map(|field| {
                        Ok(FieldMatch::new(field.field, self.pattern(field.pattern)?))
                    })
                    .collect::<Result<Vec<_>, Diagnostic>>()?;
                PatternMatchKind::Struct {
                    constructor,
                    fields,
                }
            }
            PatternMatchKind::Tuple(items) => {
                let items = items
                    .into_iter()
                    .map(|item| self.pattern(item))
                    .collect::<Result<Vec<_>, _>>()?;
                let descriptor = self.arena.tuple_descriptor(items.len(), self.interner);
                let constructor = &descriptor.constructors[0];
                let fields = constructor
                    .fields
                    .iter()
                    .zip(items)
                    .map(|(field, item)| FieldMatch::new(field.name, item))
                    .collect();
                PatternMatchKind::Struct {
                    constructor: constructor.symbol,
                    fields,
                }
            }
        };
        Ok(PatternMatch::new(kind, ty, range))
    }

    fn constructor_symbol(&self, symbol: &Symbol) -> Option<Symbol> {
        let qualified = self.arena.qualify(symbol).ok()?;
        self.arena.constructor(&qualified).map(|_| qualified)
    }
}

/// The value type of a constructor: a function from its field types to the
/// fully applied data type.
fn constructor_type(
    descriptor: &DataTypeDescriptor,
    constructor: &DataConstructorDescriptor,
) -> Type {
    let applied = Type::sum_with(
        descriptor.symbol,
        descriptor.parameters.iter().map(|v| Type::Var(*v)).collect(),
    );
    constructor
        .fields
        .iter()
        .rev()
        .fold(applied, |result, field| {
            Type::function(field.ty.clone(), result)
        })
}
