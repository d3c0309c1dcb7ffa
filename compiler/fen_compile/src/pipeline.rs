//! The compilation driver.
//!
//! One [`Compiler`] per source unit. Stages run in order over the whole
//! unit: scan and layout, qualification (including operator shuffling),
//! pattern reduction, type checking. Diagnostics accumulate across stages;
//! a definition that faults is dropped while its siblings continue, so one
//! bad definition never hides the rest of the unit's faults.
//!
//! Single-threaded by construction: the scope tree, counters, and
//! unification table are mutated in place by exactly one caller.

use rustc_hash::FxHashMap;
use tracing::{debug, info_span};

use fen_diagnostic::{Diagnostic, DiagnosticQueue};
use fen_ir::{
    DataTypeDescriptor, Definition, Interner, Name, SharedInterner, Symbol, Token, Value,
};
use fen_lexer::tokenize;
use fen_scope::{ScopeArena, ScopeId, SymbolResolver};

use crate::qualify::Qualifier;
use crate::reduce::Reducer;
use crate::typecheck::TypeChecker;

/// The fully elaborated output of one compilation unit: every surviving
/// value definition keyed by its qualified symbol, reduced to the core
/// forms and carrying resolved types, plus the scope arena that owns the
/// unit's symbol and type information.
pub struct Elaborated {
    definitions: FxHashMap<Symbol, Value>,
    scopes: FxHashMap<Name, ScopeId>,
    arena: ScopeArena,
    interner: SharedInterner,
}

impl Elaborated {
    /// The reduced, typed body of one definition.
    pub fn definition(&self, symbol: &Symbol) -> Option<&Value> {
        self.definitions.get(symbol)
    }

    pub fn definitions(&self) -> impl Iterator<Item = (&Symbol, &Value)> {
        self.definitions.iter()
    }

    /// The scope a module's definitions live in.
    pub fn module_scope(&self, module: Name) -> Option<ScopeId> {
        self.scopes.get(&module).copied()
    }

    pub fn data_types(&self) -> impl Iterator<Item = &DataTypeDescriptor> {
        self.arena.data_types()
    }

    pub fn arena(&self) -> &ScopeArena {
        &self.arena
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }
}

/// Drives one source unit through every stage.
pub struct Compiler {
    uri: String,
    interner: SharedInterner,
    arena: ScopeArena,
    diagnostics: DiagnosticQueue,
}

impl Compiler {
    pub fn new(uri: impl Into<String>, resolver: Box<dyn SymbolResolver>) -> Self {
        let interner = Interner::shared();
        let arena = ScopeArena::new(resolver, &interner);
        Compiler {
            uri: uri.into(),
            interner,
            arena,
            diagnostics: DiagnosticQueue::new(),
        }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Diagnostics accumulated so far, in push order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.diagnostics()
    }

    /// Scan and lay out a source text. Scan faults accumulate on the
    /// compiler; the token stream is always produced.
    pub fn scan_and_layout(&mut self, source: &str) -> Vec<Token> {
        let span = info_span!("scan", uri = %self.uri);
        let _guard = span.enter();
        let (tokens, faults) = tokenize(source, self.interner.clone());
        debug!(tokens = tokens.len(), faults = faults.len(), "scanned");
        self.diagnostics.extend(faults);
        tokens
    }

    /// Shuffle and qualify a parsed unit.
    pub fn qualify(&mut self, definitions: Vec<Definition>) -> Vec<Definition> {
        let span = info_span!("qualify", uri = %self.uri);
        let _guard = span.enter();
        Qualifier::new(&mut self.arena, &self.interner).run(definitions, &mut self.diagnostics)
    }

    /// Reduce every pattern matcher to core dispatch.
    pub fn reduce(&mut self, definitions: Vec<Definition>) -> Vec<Definition> {
        let span = info_span!("reduce", uri = %self.uri);
        let _guard = span.enter();
        Reducer::new(&mut self.arena, &self.interner).run(definitions, &mut self.diagnostics)
    }

    /// Infer and record the type of every definition.
    pub fn typecheck(&mut self, definitions: &[Definition]) {
        let span = info_span!("typecheck", uri = %self.uri);
        let _guard = span.enter();
        TypeChecker::new(&mut self.arena, &self.interner).run(definitions, &mut self.diagnostics);
    }

    /// Run every stage after parsing and collect the elaborated unit.
    ///
    /// Any error-severity diagnostic fails the unit; the full sorted fault
    /// list comes back in the `Err` arm. Warnings do not fail the unit.
    pub fn compile(mut self, definitions: Vec<Definition>) -> Result<Elaborated, Vec<Diagnostic>> {
        let definitions = self.qualify(definitions);
        let definitions = self.reduce(definitions);
        self.typecheck(&definitions);

        if self.diagnostics.has_errors() {
            return Err(self.diagnostics.into_sorted());
        }

        let mut elaborated = Elaborated {
            definitions: FxHashMap::default(),
            scopes: FxHashMap::default(),
            arena: self.arena,
            interner: self.interner,
        };
        collect(&definitions, &mut elaborated);
        debug!(definitions = elaborated.definitions.len(), "elaborated");
        Ok(elaborated)
    }
}

fn collect(definitions: &[Definition], elaborated: &mut Elaborated) {
    for definition in definitions {
        match definition {
            Definition::Module {
                name, definitions, ..
            } => {
                if let Some(scope) = elaborated.arena.module_scope(*name) {
                    elaborated.scopes.insert(*name, scope);
                }
                collect(definitions, elaborated);
            }
            Definition::Value { symbol, body, .. } => {
                let ty = elaborated.arena.resolve_type(&body.ty);
                elaborated
                    .definitions
                    .insert(*symbol, body.clone().with_type(ty));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests;
