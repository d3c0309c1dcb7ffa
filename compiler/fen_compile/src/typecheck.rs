//! Type checking.
//!
//! A thin Algorithm-W walk over qualified (and normally reduced) values.
//! All real bookkeeping lives in the scope arena's unification table; this
//! pass only drives it: literals meet their built-in types, identifiers
//! instantiate their recorded types, applications unify the function side
//! against `argument -> fresh`, let-bindings generalize, and inferred
//! types are written back onto the defining scope.
//!
//! Faults accumulate per definition; siblings continue.

use tracing::error;

use fen_diagnostic::{Diagnostic, DiagnosticQueue};
use fen_ir::{
    builtin, Definition, Interner, Literal, PatternMatch, PatternMatchKind, PatternMatcher,
    SourceRange, Type, Value, ValueKind,
};
use fen_scope::ScopeArena;

pub struct TypeChecker<'a> {
    arena: &'a mut ScopeArena,
    interner: &'a Interner,
}

impl<'a> TypeChecker<'a> {
    pub fn new(arena: &'a mut ScopeArena, interner: &'a Interner) -> Self {
        TypeChecker { arena, interner }
    }

    /// Check every value definition in the unit and record its inferred
    /// type on the defining scope.
    pub fn run(&mut self, definitions: &[Definition], faults: &mut DiagnosticQueue) {
        for definition in definitions {
            match definition {
                Definition::Module {
                    name, definitions, ..
                } => {
                    let saved = self.arena.current();
                    if let Some(scope) = self.arena.module_scope(*name) {
                        self.arena.set_current(scope);
                    }
                    self.run(definitions, faults);
                    self.arena.set_current(saved);
                }
                Definition::Value {
                    symbol,
                    body,
                    range,
                } => {
                    let saved = self.arena.current();
                    if let Err(fault) = self.check_value(symbol, body, *range) {
                        self.arena.set_current(saved);
                        faults.push(fault);
                    }
                }
                _ => {}
            }
        }
    }

    fn check_value(
        &mut self,
        symbol: &fen_ir::Symbol,
        body: &Value,
        range: SourceRange,
    ) -> Result<(), Diagnostic> {
        let recorded = self.arena.value_type(symbol);
        if let Some(recorded) = &recorded {
            // Recursive references in the body must see the definition's own
            // placeholder, not a fresh instantiation of it.
            self.arena.specialize(recorded);
        }
        let inferred = self.infer(body)?;
        if let Some(recorded) = recorded {
            self.unite(&recorded, &inferred, range)?;
        }
        if let Some(signature) = self.arena.signature(symbol) {
            let instance = self.arena.generate(&signature);
            self.unite(&instance, &inferred, range)?;
        }
        self.arena.generalize(&inferred);
        let resolved = self.arena.resolve_type(&inferred);
        self.arena
            .redefine_value(symbol, resolved)
            .map_err(|fault| fault.to_diagnostic(range, self.interner))
    }

    fn infer(&mut self, value: &Value) -> Result<Type, Diagnostic> {
        match &value.kind {
            ValueKind::Literal(literal) => {
                let ty = self.literal_type(*literal);
                self.unite(&value.ty, &ty, value.range)
            }
            ValueKind::Identifier(symbol) => {
                let recorded = self.arena.value_type(symbol).ok_or_else(|| {
                    fen_scope::ScopeError::NotFound { symbol: *symbol }
                        .to_diagnostic(value.range, self.interner)
                })?;
                let instance = self.arena.generate(&recorded);
                self.unite(&value.ty, &instance, value.range)
            }
            ValueKind::Apply { function, argument } => {
                let function_ty = self.infer(function)?;
                let argument_ty = self.infer(argument)?;
                let applied = Type::function(argument_ty, value.ty.clone());
                self.unite(&function_ty, &applied, value.range)?;
                Ok(value.ty.clone())
            }
            ValueKind::Lambda { parameters, body } => {
                self.arena.enter_scope();
                for parameter in parameters {
                    self.arena
                        .define_value(&parameter.symbol, parameter.ty.clone())
                        .map_err(|fault| fault.to_diagnostic(value.range, self.interner))?;
                    // Lambda-bound variables are monomorphic in the body.
                    self.arena.specialize(&parameter.ty);
                }
                let body_ty = self.infer(body)?;
                self.leave(value.range)?;
                let ty = parameters.iter().rev().fold(body_ty, |result, parameter| {
                    Type::function(parameter.ty.clone(), result)
                });
                self.unite(&value.ty, &ty, value.range)
            }
            ValueKind::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                let condition_ty = self.infer(condition)?;
                self.unite(&condition_ty, &builtin::bool(self.interner), condition.range)?;
                let true_ty = self.infer(when_true)?;
                let false_ty = self.infer(when_false)?;
                self.unite(&true_ty, &false_ty, value.range)?;
                self.unite(&value.ty, &true_ty, value.range)
            }
            ValueKind::Let { bindings, body } => {
                self.arena.enter_scope();
                for binding in bindings {
                    self.arena
                        .define_value(&binding.symbol, binding.value.ty.clone())
                        .map_err(|fault| fault.to_diagnostic(binding.range, self.interner))?;
                    self.arena.specialize(&binding.value.ty);
                }
                for binding in bindings {
                    let bound_ty = self.infer(&binding.value)?;
                    self.unite(&binding.value.ty, &bound_ty, binding.range)?;
                }
                // Let-polymorphism: bindings generalize before the body is
                // checked against them.
                for binding in bindings {
                    self.arena.generalize(&binding.value.ty);
                }
                let body_ty = self.infer(body)?;
                self.leave(value.range)?;
                self.unite(&value.ty, &body_ty, value.range)
            }
            ValueKind::Function(matcher) => {
                let ty = self.infer_matcher(matcher)?;
                self.unite(&value.ty, &ty, value.range)
            }
            ValueKind::And { left, right } => {
                let boolean = builtin::bool(self.interner);
                let left_ty = self.infer(left)?;
                self.unite(&left_ty, &boolean, left.range)?;
                let right_ty = self.infer(right)?;
                self.unite(&right_ty, &boolean, right.range)?;
                self.unite(&value.ty, &boolean, value.range)
            }
            ValueKind::IsConstructor { value: subject, .. } => {
                self.infer(subject)?;
                self.unite(&value.ty, &builtin::bool(self.interner), value.range)
            }
            ValueKind::FieldAccess { value: subject, .. } => {
                self.infer(subject)?;
                Ok(value.ty.clone())
            }
            ValueKind::Raise(_) => Ok(value.ty.clone()),
            ValueKind::Sequence(_) => {
                error!("unshuffled sequence reached the type checker");
                Err(Diagnostic::internal(
                    "unshuffled sequence reached the type checker",
                    value.range,
                ))
            }
        }
    }

    /// An unreduced matcher: each clause's patterns meet the argument
    /// variables, each body meets every other body.
    fn infer_matcher(&mut self, matcher: &PatternMatcher) -> Result<Type, Diagnostic> {
        let result_ty = self.arena.reserve_type();
        for case in &matcher.cases {
            self.arena.enter_scope();
            for (pattern, argument_ty) in case.patterns.iter().zip(&matcher.arguments) {
                self.check_pattern(pattern)?;
                self.unite(&pattern.ty, &argument_ty.clone(), pattern.range)?;
                self.arena.specialize(argument_ty);
            }
            let body_ty = self.infer(&case.body)?;
            self.unite(&result_ty, &body_ty, case.range)?;
            self.leave(case.range)?;
        }
        Ok(matcher
            .arguments
            .iter()
            .rev()
            .fold(result_ty, |result, argument| {
                Type::function(argument.clone(), result)
            }))
    }

    fn check_pattern(&mut self, pattern: &PatternMatch) -> Result<(), Diagnostic> {
        match &pattern.kind {
            PatternMatchKind::Capture(symbol) => {
                // Qualification defined the capture with the pattern's own
                // variable; redefinition here would double-book it.
                if self.arena.value_type(symbol).is_none() {
                    self.arena
                        .define_value(symbol, pattern.ty.clone())
                        .map_err(|fault| fault.to_diagnostic(pattern.range, self.interner))?;
                }
                self.arena.specialize(&pattern.ty);
                Ok(())
            }
            PatternMatchKind::Ignore => Ok(()),
            PatternMatchKind::Literal(literal) => {
                let ty = self.literal_type(*literal);
                self.unite(&pattern.ty, &ty, pattern.range)?;
                Ok(())
            }
            PatternMatchKind::Struct {
                constructor,
                fields,
            } => {
                let recorded = self.arena.value_type(constructor).ok_or_else(|| {
                    fen_scope::ScopeError::NotFound {
                        symbol: *constructor,
                    }
                    .to_diagnostic(pattern.range, self.interner)
                })?;
                // The constructor's recorded type is a function from its
                // field types to the applied data type; peel one arrow per
                // field sub-pattern and the remainder is the matched type.
                let mut remainder = self.arena.generate(&recorded);
                for field in fields {
                    self.check_pattern(&field.pattern)?;
                    let rest = self.arena.reserve_type();
                    let applied = Type::function(field.pattern.ty.clone(), rest.clone());
                    self.unite(&remainder, &applied, field.pattern.range)?;
                    remainder = rest;
                }
                self.unite(&pattern.ty, &remainder, pattern.range)?;
                Ok(())
            }
            PatternMatchKind::Sequence(_) | PatternMatchKind::Tuple(_) => {
                error!("unshuffled pattern reached the type checker");
                Err(Diagnostic::internal(
                    "unshuffled pattern reached the type checker",
                    pattern.range,
                ))
            }
        }
    }

    fn literal_type(&self, literal: Literal) -> Type {
        match literal {
            Literal::Int(_) => builtin::int(self.interner),
            Literal::Double(_) => builtin::double(self.interner),
            Literal::Char(_) => builtin::char(self.interner),
            Literal::String(_) => builtin::string(self.interner),
            Literal::Bool(_) => builtin::bool(self.interner),
        }
    }

    /// Unify two types, attaching the source range on failure. Returns the
    /// first operand for call-site chaining.
    fn unite(&mut self, left: &Type, right: &Type, range: SourceRange) -> Result<Type, Diagnostic> {
        self.arena
            .unify(left, right)
            .map_err(|fault| fault.to_diagnostic(range, self.interner))?;
        Ok(left.clone())
    }

    fn leave(&mut self, range: SourceRange) -> Result<(), Diagnostic> {
        self.arena
            .leave_scope()
            .map(|_| ())
            .map_err(|fault| fault.to_diagnostic(range, self.interner))
    }
}
