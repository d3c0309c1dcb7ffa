//! Substitution-based unification.
//!
//! Algorithm-W bookkeeping shared by the whole compilation unit: a
//! substitution map from type variables to types, a specialization set
//! separating fixed variables from generalizable ones at let boundaries,
//! and per-variable type-class constraint sets.

use rustc_hash::{FxHashMap, FxHashSet};

use fen_ir::{Symbol, Type};

use crate::counters::Counters;
use crate::error::TypeError;
use crate::resolver::SymbolResolver;

/// The unification state for one compilation unit.
#[derive(Default)]
pub struct TypeTable {
    substitution: FxHashMap<u32, Type>,
    /// Variables that must not be generalized (monomorphic in the current
    /// binding group).
    specialized: FxHashSet<u32>,
    /// Type-class constraints per variable.
    contexts: FxHashMap<u32, FxHashSet<Symbol>>,
}

impl TypeTable {
    pub fn new() -> Self {
        TypeTable::default()
    }

    /// Apply the substitution deeply, following variable chains.
    pub fn resolve(&self, ty: &Type) -> Type {
        match ty {
            Type::Var(v) => match self.substitution.get(v) {
                Some(bound) => self.resolve(bound),
                None => ty.clone(),
            },
            Type::Sum { symbol, arguments } => Type::Sum {
                symbol: *symbol,
                arguments: arguments.iter().map(|a| self.resolve(a)).collect(),
            },
            Type::Function { argument, result } => Type::Function {
                argument: Box::new(self.resolve(argument)),
                result: Box::new(self.resolve(result)),
            },
        }
    }

    /// Bind a variable to a type, occurs-checked, carrying the variable's
    /// type-class constraints over to the bound type.
    pub fn bind(
        &mut self,
        variable: u32,
        ty: &Type,
        resolver: &dyn SymbolResolver,
    ) -> Result<(), TypeError> {
        let ty = self.resolve(ty);
        if ty == Type::Var(variable) {
            return Ok(());
        }
        if ty.contains_variable(variable) {
            return Err(TypeError::Infinite { variable, ty });
        }
        if let Some(classes) = self.contexts.remove(&variable) {
            match ty {
                Type::Var(other) => {
                    self.contexts.entry(other).or_default().extend(classes);
                }
                ref concrete => {
                    for class in &classes {
                        if !resolver.is_instance(class, concrete) {
                            let fault = TypeError::NoInstance {
                                class: *class,
                                ty: concrete.clone(),
                            };
                            self.contexts.insert(variable, classes);
                            return Err(fault);
                        }
                    }
                }
            }
        }
        if self.specialized.contains(&variable) {
            for v in ty.free_variables() {
                self.specialized.insert(v);
            }
        }
        self.substitution.insert(variable, ty);
        Ok(())
    }

    /// Make two types equal, or report why they cannot be.
    pub fn unify(
        &mut self,
        left: &Type,
        right: &Type,
        resolver: &dyn SymbolResolver,
    ) -> Result<(), TypeError> {
        let left = self.resolve(left);
        let right = self.resolve(right);
        match (&left, &right) {
            (Type::Var(v), _) => self.bind(*v, &right, resolver),
            (_, Type::Var(v)) => self.bind(*v, &left, resolver),
            (
                Type::Sum {
                    symbol: ls,
                    arguments: la,
                },
                Type::Sum {
                    symbol: rs,
                    arguments: ra,
                },
            ) if ls == rs && la.len() == ra.len() => {
                for (l, r) in la.iter().zip(ra.iter()) {
                    self.unify(l, r, resolver)?;
                }
                Ok(())
            }
            (
                Type::Function {
                    argument: la,
                    result: lr,
                },
                Type::Function {
                    argument: ra,
                    result: rr,
                },
            ) => {
                self.unify(la, ra, resolver)?;
                self.unify(lr, rr, resolver)
            }
            _ => Err(TypeError::Mismatch {
                expected: left,
                found: right,
            }),
        }
    }

    /// Mark every variable of `ty` as fixed; `generate` will not rename
    /// them.
    pub fn specialize(&mut self, ty: &Type) {
        for v in self.resolve(ty).free_variables() {
            self.specialized.insert(v);
        }
    }

    /// Release the variables of `ty` for generalization at a let boundary.
    pub fn generalize(&mut self, ty: &Type) {
        for v in self.resolve(ty).free_variables() {
            self.specialized.remove(&v);
        }
    }

    /// Instantiate a generalized type: every generalizable variable is
    /// renamed to a fresh one, consistently within this single call, and
    /// its constraints follow it.
    pub fn generate(&mut self, ty: &Type, counters: &mut Counters) -> Type {
        let resolved = self.resolve(ty);
        let mut renaming: FxHashMap<u32, u32> = FxHashMap::default();
        for v in resolved.free_variables() {
            if !self.specialized.contains(&v) {
                let fresh = counters.reserve_type();
                if let Some(classes) = self.contexts.get(&v) {
                    let classes = classes.clone();
                    self.contexts.insert(fresh, classes);
                }
                renaming.insert(v, fresh);
            }
        }
        rename(&resolved, &renaming)
    }

    pub fn extend_context(&mut self, variable: u32, class: Symbol) {
        self.contexts.entry(variable).or_default().insert(class);
    }

    pub fn context(&self, variable: u32) -> Option<&FxHashSet<Symbol>> {
        self.contexts.get(&variable)
    }

    pub fn is_specialized(&self, variable: u32) -> bool {
        self.specialized.contains(&variable)
    }
}

fn rename(ty: &Type, renaming: &FxHashMap<u32, u32>) -> Type {
    match ty {
        Type::Var(v) => match renaming.get(v) {
            Some(fresh) => Type::Var(*fresh),
            None => ty.clone(),
        },
        Type::Sum { symbol, arguments } => Type::Sum {
            symbol: *symbol,
            arguments: arguments.iter().map(|a| rename(a, renaming)).collect(),
        },
        Type::Function { argument, result } => Type::Function {
            argument: Box::new(rename(argument, renaming)),
            result: Box::new(rename(result, renaming)),
        },
    }
}

#[cfg(test)]
mod tests;
