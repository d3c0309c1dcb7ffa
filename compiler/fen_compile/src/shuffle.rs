//! Operator-precedence shuffling.
//!
//! A generalized shunting-yard over flat, juxtaposed sequences as the
//! user wrote them. The same core drives two specializations: value
//! expressions (builds `Apply` chains) and pattern matches (builds
//! `Struct` matches, checking constructor field arity). Fixity and
//! precedence come from the scope chain, so shuffling runs inside the
//! qualification pass once the operator table is populated.

use std::collections::VecDeque;

use tracing::error;

use fen_diagnostic::{Diagnostic, ErrorCode};
use fen_ir::{
    FieldMatch, Fixity, Interner, Operator, PatternMatch, PatternMatchKind, SourceRange, Symbol,
    Value, ValueKind,
};
use fen_scope::ScopeArena;

/// Hooks a shuffle specialization provides to the generic core.
pub(crate) trait ShuffleOps {
    type Item: Clone;

    /// `Some` when the item names a declared operator in scope.
    fn operator(&self, item: &Self::Item) -> Option<(Symbol, Operator)>;

    fn range(item: &Self::Item) -> SourceRange;

    fn apply_prefix(
        &mut self,
        operator: &OperatorEntry<Self::Item>,
        operand: Self::Item,
    ) -> Result<Self::Item, Diagnostic>;

    fn apply_infix(
        &mut self,
        operator: &OperatorEntry<Self::Item>,
        left: Self::Item,
        right: Self::Item,
    ) -> Result<Self::Item, Diagnostic>;

    /// Juxtaposition: fold the next adjacent operand into the current one.
    fn fold_adjacent(
        &mut self,
        head: Self::Item,
        next: Self::Item,
    ) -> Result<Self::Item, Diagnostic>;

    /// Validate the finished result before handing it back.
    fn finish(&mut self, item: Self::Item) -> Result<Self::Item, Diagnostic> {
        Ok(item)
    }
}

/// An operator waiting on the operator stack, with the item that named it.
pub(crate) struct OperatorEntry<I> {
    pub symbol: Symbol,
    pub operator: Operator,
    pub item: I,
}

enum Output<I> {
    Operand(I),
    Operator(OperatorEntry<I>),
}

/// Reorder a flat sequence into a single nested item, or fault.
pub(crate) fn shuffle<O: ShuffleOps>(
    ops: &mut O,
    items: Vec<O::Item>,
    range: SourceRange,
) -> Result<O::Item, Diagnostic> {
    let mut input: VecDeque<O::Item> = items.into();
    let first = match input.front() {
        Some(first) => first,
        None => {
            return Err(Diagnostic::error(
                ErrorCode::E1006,
                "empty expression",
                range,
            ))
        }
    };
    let mut expect_prefix = ops.operator(first).is_some();
    let mut output: Vec<Output<O::Item>> = Vec::new();
    let mut operators: Vec<OperatorEntry<O::Item>> = Vec::new();

    while let Some(item) = input.pop_front() {
        match ops.operator(&item) {
            Some((symbol, operator)) => {
                if expect_prefix && operator.fixity != Fixity::Prefix {
                    return Err(Diagnostic::error(
                        ErrorCode::E1001,
                        "unexpected binary operator in prefix position",
                        O::range(&item),
                    ));
                }
                while operators
                    .last()
                    .is_some_and(|top| top.operator.outranks(&operator))
                {
                    if let Some(top) = operators.pop() {
                        output.push(Output::Operator(top));
                    }
                }
                operators.push(OperatorEntry {
                    symbol,
                    operator,
                    item,
                });
                expect_prefix = true;
            }
            None => {
                // Adjacent non-operator items are application by
                // juxtaposition; they bind before any trailing operator.
                let mut operand = item;
                while input
                    .front()
                    .is_some_and(|next| ops.operator(next).is_none())
                {
                    if let Some(next) = input.pop_front() {
                        operand = ops.fold_adjacent(operand, next)?;
                    }
                }
                output.push(Output::Operand(operand));
                expect_prefix = false;
            }
        }
    }
    while let Some(top) = operators.pop() {
        output.push(Output::Operator(top));
    }

    let mut results: Vec<O::Item> = Vec::new();
    for entry in output {
        match entry {
            Output::Operand(item) => results.push(item),
            Output::Operator(operator) => {
                if operator.operator.fixity == Fixity::Prefix {
                    let operand = results.pop().ok_or_else(|| unbalanced(range))?;
                    results.push(ops.apply_prefix(&operator, operand)?);
                } else {
                    let right = results.pop().ok_or_else(|| unbalanced(range))?;
                    let left = results.pop().ok_or_else(|| unbalanced(range))?;
                    results.push(ops.apply_infix(&operator, left, right)?);
                }
            }
        }
    }
    match (results.pop(), results.is_empty()) {
        (Some(result), true) => ops.finish(result),
        _ => Err(unbalanced(range)),
    }
}

fn unbalanced(range: SourceRange) -> Diagnostic {
    error!("shuffle did not reduce to a single result");
    Diagnostic::error(
        ErrorCode::E1002,
        "expression did not reduce to a single result",
        range,
    )
}

/// The expression specialization: operators and adjacency both become
/// `Apply` chains.
pub(crate) struct ExpressionShuffler<'a> {
    pub arena: &'a mut ScopeArena,
}

impl ExpressionShuffler<'_> {
    fn apply(&mut self, function: Value, argument: Value) -> Value {
        let range = function.range.merge(argument.range);
        Value::new(
            ValueKind::Apply {
                function: Box::new(function),
                argument: Box::new(argument),
            },
            self.arena.reserve_type(),
            range,
        )
    }
}

impl ShuffleOps for ExpressionShuffler<'_> {
    type Item = Value;

    fn operator(&self, item: &Value) -> Option<(Symbol, Operator)> {
        match &item.kind {
            ValueKind::Identifier(symbol) => self
                .arena
                .get_operator(symbol)
                .ok()
                .map(|operator| (*symbol, operator)),
            _ => None,
        }
    }

    fn range(item: &Value) -> SourceRange {
        item.range
    }

    fn apply_prefix(
        &mut self,
        operator: &OperatorEntry<Value>,
        operand: Value,
    ) -> Result<Value, Diagnostic> {
        Ok(self.apply(operator.item.clone(), operand))
    }

    fn apply_infix(
        &mut self,
        operator: &OperatorEntry<Value>,
        left: Value,
        right: Value,
    ) -> Result<Value, Diagnostic> {
        let partial = self.apply(operator.item.clone(), left);
        Ok(self.apply(partial, right))
    }

    fn fold_adjacent(&mut self, head: Value, next: Value) -> Result<Value, Diagnostic> {
        Ok(self.apply(head, next))
    }
}

/// The pattern specialization: constructor operators and constructor-headed
/// adjacency become `Struct` matches with fields bound in declared order.
pub(crate) struct PatternShuffler<'a> {
    pub arena: &'a mut ScopeArena,
    pub interner: &'a Interner,
}

impl PatternShuffler<'_> {
    /// Build a struct match from a constructor symbol and its sub-patterns.
    fn struct_match(
        &mut self,
        symbol: Symbol,
        sub_patterns: Vec<PatternMatch>,
        range: SourceRange,
    ) -> Result<PatternMatch, Diagnostic> {
        let constructor = self
            .arena
            .qualify(&symbol)
            .map_err(|fault| fault.to_diagnostic(range, self.interner))?;
        let (_, descriptor) = self.arena.constructor(&constructor).ok_or_else(|| {
            Diagnostic::error(
                ErrorCode::E1005,
                format!(
                    "{} is not a constructor and cannot head a pattern",
                    constructor.display(self.interner)
                ),
                range,
            )
        })?;
        if sub_patterns.len() > descriptor.arity() {
            return Err(self.arity_fault(&constructor, descriptor.arity(), sub_patterns.len(), range));
        }
        let fields = descriptor
            .fields
            .iter()
            .zip(sub_patterns)
            .map(|(field, pattern)| FieldMatch::new(field.name, pattern))
            .collect();
        Ok(PatternMatch::new(
            PatternMatchKind::Struct {
                constructor,
                fields,
            },
            self.arena.reserve_type(),
            range,
        ))
    }

    fn arity_fault(
        &self,
        constructor: &Symbol,
        declared: usize,
        found: usize,
        range: SourceRange,
    ) -> Diagnostic {
        Diagnostic::error(
            ErrorCode::E1003,
            format!(
                "constructor {} has {} field(s) but the pattern matches {}",
                constructor.display(self.interner),
                declared,
                found
            ),
            range,
        )
    }

    fn is_constructor(&self, symbol: &Symbol) -> bool {
        self.arena
            .qualify(symbol)
            .ok()
            .and_then(|qualified| self.arena.constructor(&qualified))
            .is_some()
    }
}

impl ShuffleOps for PatternShuffler<'_> {
    type Item = PatternMatch;

    fn operator(&self, item: &PatternMatch) -> Option<(Symbol, Operator)> {
        match &item.kind {
            PatternMatchKind::Capture(symbol) => self
                .arena
                .get_operator(symbol)
                .ok()
                .map(|operator| (*symbol, operator)),
            _ => None,
        }
    }

    fn range(item: &PatternMatch) -> SourceRange {
        item.range
    }

    fn apply_prefix(
        &mut self,
        operator: &OperatorEntry<PatternMatch>,
        operand: PatternMatch,
    ) -> Result<PatternMatch, Diagnostic> {
        let range = operator.item.range.merge(operand.range);
        self.struct_match(operator.symbol, vec![operand], range)
    }

    fn apply_infix(
        &mut self,
        operator: &OperatorEntry<PatternMatch>,
        left: PatternMatch,
        right: PatternMatch,
    ) -> Result<PatternMatch, Diagnostic> {
        let range = left.range.merge(right.range);
        self.struct_match(operator.symbol, vec![left, right], range)
    }

    fn fold_adjacent(
        &mut self,
        head: PatternMatch,
        next: PatternMatch,
    ) -> Result<PatternMatch, Diagnostic> {
        let range = head.range.merge(next.range);
        match head.kind {
            PatternMatchKind::Capture(symbol) if self.is_constructor(&symbol) => {
                self.struct_match(symbol, vec![next], range)
            }
            PatternMatchKind::Struct {
                constructor,
                mut fields,
            } => {
                let (_, descriptor) = self.arena.constructor(&constructor).ok_or_else(|| {
                    Diagnostic::error(
                        ErrorCode::E1005,
                        format!(
                            "{} is not a constructor and cannot head a pattern",
                            constructor.display(self.interner)
                        ),
                        range,
                    )
                })?;
                if fields.len() >= descriptor.arity() {
                    return Err(self.arity_fault(
                        &constructor,
                        descriptor.arity(),
                        fields.len() + 1,
                        range,
                    ));
                }
                let field = &descriptor.fields[fields.len()];
                fields.push(FieldMatch::new(field.name, next));
                Ok(PatternMatch::new(
                    PatternMatchKind::Struct {
                        constructor,
                        fields,
                    },
                    self.arena.reserve_type(),
                    range,
                ))
            }
            _ => Err(Diagnostic::error(
                ErrorCode::E1005,
                "only a constructor can be applied to sub-patterns",
                head.range,
            )),
        }
    }

    fn finish(&mut self, item: PatternMatch) -> Result<PatternMatch, Diagnostic> {
        check_pattern_arity(self.arena, self.interner, &item)?;
        Ok(item)
    }
}

/// Check that every struct match in a finished pattern carries exactly as
/// many sub-patterns as its constructor declares fields. Adjacency folding
/// builds structs up one field at a time, so an under-filled match can only
/// be caught once the whole pattern is assembled.
pub(crate) fn check_pattern_arity(
    arena: &ScopeArena,
    interner: &Interner,
    pattern: &PatternMatch,
) -> Result<(), Diagnostic> {
    match &pattern.kind {
        PatternMatchKind::Struct {
            constructor,
            fields,
        } => {
            if let Some((_, descriptor)) = arena.constructor(constructor) {
                if fields.len() != descriptor.arity() {
                    return Err(Diagnostic::error(
                        ErrorCode::E1003,
                        format!(
                            "constructor {} has {} field(s) but the pattern matches {}",
                            constructor.display(interner),
                            descriptor.arity(),
                            fields.len()
                        ),
                        pattern.range,
                    ));
                }
            }
            for field in fields {
                check_pattern_arity(arena, interner, &field.pattern)?;
            }
            Ok(())
        }
        PatternMatchKind::Sequence(items) | PatternMatchKind::Tuple(items) => {
            for item in items {
                check_pattern_arity(arena, interner, item)?;
            }
            Ok(())
        }
        PatternMatchKind::Capture(_) | PatternMatchKind::Ignore | PatternMatchKind::Literal(_) => {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests;
