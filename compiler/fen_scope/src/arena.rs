//! The scope tree.
//!
//! Scopes live in an index arena: parent/child links are [`ScopeId`]
//! indices, never references, so inserting or re-parenting a scope is a
//! plain index rewrite. The arena also owns everything with
//! compilation-unit lifetime: the shared counters, the unification table,
//! the data-type registry, and the external resolver capability.
//!
//! Scopes accumulate definitions in place as the pipeline stages visit
//! definitions depth-first; nothing is pooled or destroyed before the
//! unit completes.

use rustc_hash::FxHashMap;
use tracing::error;

use fen_ir::{
    builtin, DataConstructorDescriptor, DataFieldDescriptor, DataTypeDescriptor, Interner, Name,
    Operator, Symbol, Type,
};

use crate::counters::Counters;
use crate::error::{ScopeError, TypeError};
use crate::resolver::SymbolResolver;
use crate::unify::TypeTable;

/// Index of a scope in the arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ScopeId(u32);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a scope is for; determines its lookup behavior.
#[derive(Clone, Debug)]
pub enum ScopeKind {
    /// Compilation-unit root; lookups falling through it go to the
    /// external resolver.
    Root,
    /// One module, with its resolved import list (prelude first).
    Module { name: Name, imports: Vec<Name> },
    /// Ordinary lexical nesting: function bodies, case arms, lets.
    Block,
}

/// The attributes a symbol may carry within one scope. At most one of
/// each; a second `define_*` of the same attribute is a conflict.
#[derive(Clone, Default, Debug)]
pub struct SymbolEntry {
    pub value_type: Option<Type>,
    pub signature: Option<Type>,
    pub operator: Option<Operator>,
    /// Set when the symbol is a type-class member.
    pub member: bool,
}

struct ScopeNode {
    parent: Option<ScopeId>,
    kind: ScopeKind,
    entries: FxHashMap<Name, SymbolEntry>,
}

/// Arena of scopes plus the compilation-unit-wide state they share.
pub struct ScopeArena {
    scopes: Vec<ScopeNode>,
    /// Module name to its scope, for qualified lookups.
    modules: FxHashMap<Name, ScopeId>,
    current: ScopeId,
    counters: Counters,
    types: TypeTable,
    resolver: Box<dyn SymbolResolver>,
    data_types: FxHashMap<Symbol, DataTypeDescriptor>,
    /// Constructor symbol to its owning data-type symbol.
    constructor_owner: FxHashMap<Symbol, Symbol>,
    prelude: Name,
}

impl ScopeArena {
    pub fn new(resolver: Box<dyn SymbolResolver>, interner: &Interner) -> Self {
        ScopeArena {
            scopes: vec![ScopeNode {
                parent: None,
                kind: ScopeKind::Root,
                entries: FxHashMap::default(),
            }],
            modules: FxHashMap::default(),
            current: ScopeId::ROOT,
            counters: Counters::new(),
            types: TypeTable::new(),
            resolver,
            data_types: FxHashMap::default(),
            constructor_owner: FxHashMap::default(),
            prelude: interner.intern(builtin::PRELUDE_MODULE),
        }
    }

    pub fn current(&self) -> ScopeId {
        self.current
    }

    /// Re-enter a previously created scope; used when a later pass
    /// revisits a definition.
    pub fn set_current(&mut self, scope: ScopeId) {
        self.current = scope;
    }

    pub fn prelude(&self) -> Name {
        self.prelude
    }

    /// The scope of a module compiled in this unit, if any.
    pub fn module_scope(&self, name: Name) -> Option<ScopeId> {
        self.modules.get(&name).copied()
    }

    /// Push a block scope under the current one.
    pub fn enter_scope(&mut self) -> ScopeId {
        self.push(ScopeKind::Block)
    }

    /// Push a module scope. The implicit prelude import is prepended to
    /// the user's import list, except inside the prelude itself.
    pub fn enter_module_scope(&mut self, name: Name, user_imports: Vec<Name>) -> ScopeId {
        let mut imports = Vec::with_capacity(user_imports.len() + 1);
        if name != self.prelude && !user_imports.contains(&self.prelude) {
            imports.push(self.prelude);
        }
        imports.extend(user_imports);
        let id = self.push(ScopeKind::Module { name, imports });
        self.modules.insert(name, id);
        id
    }

    /// Pop to the parent scope. Illegal at the root.
    pub fn leave_scope(&mut self) -> Result<ScopeId, ScopeError> {
        match self.scopes[self.current.index()].parent {
            Some(parent) => {
                let left = self.current;
                self.current = parent;
                Ok(left)
            }
            None => {
                error!("leave_scope called at the root scope");
                Err(ScopeError::LeaveRoot)
            }
        }
    }

    fn push(&mut self, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(ScopeNode {
            parent: Some(self.current),
            kind,
            entries: FxHashMap::default(),
        });
        self.current = id;
        id
    }

    // === Definition ===

    pub fn define_value(&mut self, symbol: &Symbol, ty: Type) -> Result<(), ScopeError> {
        let entry = self.entry_mut(symbol.member());
        if entry.value_type.is_some() {
            return Err(ScopeError::Conflict {
                symbol: *symbol,
                attribute: "value",
            });
        }
        entry.value_type = Some(ty);
        Ok(())
    }

    pub fn define_signature(&mut self, symbol: &Symbol, ty: Type) -> Result<(), ScopeError> {
        let entry = self.entry_mut(symbol.member());
        if entry.signature.is_some() {
            return Err(ScopeError::Conflict {
                symbol: *symbol,
                attribute: "signature",
            });
        }
        entry.signature = Some(ty);
        Ok(())
    }

    pub fn define_operator(&mut self, symbol: &Symbol, operator: Operator) -> Result<(), ScopeError> {
        let entry = self.entry_mut(symbol.member());
        if entry.operator.is_some() {
            return Err(ScopeError::Conflict {
                symbol: *symbol,
                attribute: "operator",
            });
        }
        entry.operator = Some(operator);
        Ok(())
    }

    pub fn define_member(&mut self, symbol: &Symbol) {
        self.entry_mut(symbol.member()).member = true;
    }

    /// Overwrite a value type wherever the symbol was defined; the type
    /// checker records inferred types this way.
    pub fn redefine_value(&mut self, symbol: &Symbol, ty: Type) -> Result<(), ScopeError> {
        let scope = self
            .find_defining_scope(symbol, |entry| entry.value_type.is_some())
            .ok_or(ScopeError::NotFound { symbol: *symbol })?;
        let entry = self.scopes[scope.index()]
            .entries
            .entry(symbol.member())
            .or_default();
        entry.value_type = Some(ty);
        Ok(())
    }

    pub fn redefine_signature(&mut self, symbol: &Symbol, ty: Type) -> Result<(), ScopeError> {
        let scope = self
            .find_defining_scope(symbol, |entry| entry.signature.is_some())
            .ok_or(ScopeError::NotFound { symbol: *symbol })?;
        let entry = self.scopes[scope.index()]
            .entries
            .entry(symbol.member())
            .or_default();
        entry.signature = Some(ty);
        Ok(())
    }

    fn entry_mut(&mut self, member: Name) -> &mut SymbolEntry {
        self.scopes[self.current.index()]
            .entries
            .entry(member)
            .or_default()
    }

    // === Resolution ===

    /// Resolve a symbol to its scoped identity.
    ///
    /// Unqualified symbols search local entries, then each module-level
    /// import in order, then the parent chain, then the external
    /// resolver. A hit in a block scope keeps the symbol unqualified (it
    /// is a local); a hit in a module scope or an import qualifies it.
    pub fn qualify(&self, symbol: &Symbol) -> Result<Symbol, ScopeError> {
        match symbol {
            Symbol::Unqualified { .. } => self.qualify_unqualified(symbol),
            Symbol::Qualified { .. } => self.qualify_qualified(symbol),
        }
    }

    fn qualify_unqualified(&self, symbol: &Symbol) -> Result<Symbol, ScopeError> {
        let member = symbol.member();
        let mut scope = Some(self.current);
        while let Some(id) = scope {
            let node = &self.scopes[id.index()];
            if node.entries.contains_key(&member) {
                return Ok(match &node.kind {
                    ScopeKind::Module { name, .. } => Symbol::qualified(*name, member),
                    ScopeKind::Root | ScopeKind::Block => *symbol,
                });
            }
            if let ScopeKind::Module { imports, .. } = &node.kind {
                for import in imports {
                    let candidate = Symbol::qualified(*import, member);
                    if self.module_defines(*import, member) || self.resolver_knows(&candidate) {
                        return Ok(candidate);
                    }
                }
            }
            scope = node.parent;
        }
        if self.resolver_knows(symbol) {
            return Ok(*symbol);
        }
        Err(ScopeError::NotFound { symbol: *symbol })
    }

    fn qualify_qualified(&self, symbol: &Symbol) -> Result<Symbol, ScopeError> {
        let module = match symbol.module() {
            Some(module) => module,
            None => return Err(ScopeError::NotFound { symbol: *symbol }),
        };
        if let Some((name, imports)) = self.enclosing_module() {
            if name == module {
                return Ok(*symbol);
            }
            if !imports.contains(&module) {
                return Err(ScopeError::NotImported {
                    symbol: *symbol,
                    module,
                });
            }
        }
        if self.module_defines(module, symbol.member()) || self.resolver_knows(symbol) {
            Ok(*symbol)
        } else {
            Err(ScopeError::NotFound { symbol: *symbol })
        }
    }

    /// The declared fixity of an operator symbol, walking the same chain
    /// as `qualify`. The shuffler calls this before types are known.
    pub fn get_operator(&self, symbol: &Symbol) -> Result<Operator, ScopeError> {
        if let Some(module) = symbol.module() {
            if let Some(entry) = self.module_entry(module, symbol.member()) {
                if let Some(operator) = entry.operator {
                    return Ok(operator);
                }
            }
            return self
                .resolver
                .resolve_operator(symbol)
                .ok_or(ScopeError::NotFound { symbol: *symbol });
        }
        let member = symbol.member();
        let mut scope = Some(self.current);
        while let Some(id) = scope {
            let node = &self.scopes[id.index()];
            if let Some(operator) = node.entries.get(&member).and_then(|e| e.operator) {
                return Ok(operator);
            }
            if let ScopeKind::Module { imports, .. } = &node.kind {
                for import in imports {
                    if let Some(entry) = self.module_entry(*import, member) {
                        if let Some(operator) = entry.operator {
                            return Ok(operator);
                        }
                    }
                    let candidate = Symbol::qualified(*import, member);
                    if let Some(operator) = self.resolver.resolve_operator(&candidate) {
                        return Ok(operator);
                    }
                }
            }
            scope = node.parent;
        }
        self.resolver
            .resolve_operator(symbol)
            .ok_or(ScopeError::NotFound { symbol: *symbol })
    }

    pub fn is_operator(&self, symbol: &Symbol) -> bool {
        self.get_operator(symbol).is_ok()
    }

    /// The recorded value type of a symbol, walking the resolution chain.
    pub fn value_type(&self, symbol: &Symbol) -> Option<Type> {
        if let Some(module) = symbol.module() {
            if let Some(entry) = self.module_entry(module, symbol.member()) {
                if entry.value_type.is_some() {
                    return entry.value_type.clone();
                }
            }
            return self.resolver.resolve_value(symbol);
        }
        let member = symbol.member();
        let mut scope = Some(self.current);
        while let Some(id) = scope {
            let node = &self.scopes[id.index()];
            if let Some(ty) = node.entries.get(&member).and_then(|e| e.value_type.clone()) {
                return Some(ty);
            }
            if let ScopeKind::Module { imports, .. } = &node.kind {
                for import in imports {
                    if let Some(ty) = self
                        .module_entry(*import, member)
                        .and_then(|e| e.value_type.clone())
                    {
                        return Some(ty);
                    }
                    let candidate = Symbol::qualified(*import, member);
                    if let Some(ty) = self.resolver.resolve_value(&candidate) {
                        return Some(ty);
                    }
                }
            }
            scope = node.parent;
        }
        self.resolver.resolve_value(symbol)
    }

    /// The declared signature of a symbol, if any, on the defining scope.
    pub fn signature(&self, symbol: &Symbol) -> Option<Type> {
        let scope = self.find_defining_scope(symbol, |entry| entry.signature.is_some())?;
        self.scopes[scope.index()]
            .entries
            .get(&symbol.member())
            .and_then(|e| e.signature.clone())
    }

    fn find_defining_scope(
        &self,
        symbol: &Symbol,
        has: impl Fn(&SymbolEntry) -> bool,
    ) -> Option<ScopeId> {
        if let Some(module) = symbol.module() {
            let id = *self.modules.get(&module)?;
            let entry = self.scopes[id.index()].entries.get(&symbol.member())?;
            return has(entry).then_some(id);
        }
        let member = symbol.member();
        let mut scope = Some(self.current);
        while let Some(id) = scope {
            let node = &self.scopes[id.index()];
            if node.entries.get(&member).is_some_and(&has) {
                return Some(id);
            }
            scope = node.parent;
        }
        None
    }

    fn module_entry(&self, module: Name, member: Name) -> Option<&SymbolEntry> {
        let id = self.modules.get(&module)?;
        self.scopes[id.index()].entries.get(&member)
    }

    fn module_defines(&self, module: Name, member: Name) -> bool {
        self.module_entry(module, member).is_some()
    }

    fn resolver_knows(&self, symbol: &Symbol) -> bool {
        self.resolver.resolve_value(symbol).is_some()
            || self.resolver.resolve_operator(symbol).is_some()
            || self.resolver.resolve_constructor(symbol).is_some()
    }

    fn enclosing_module(&self) -> Option<(Name, &[Name])> {
        let mut scope = Some(self.current);
        while let Some(id) = scope {
            let node = &self.scopes[id.index()];
            if let ScopeKind::Module { name, imports } = &node.kind {
                return Some((*name, imports));
            }
            scope = node.parent;
        }
        None
    }

    // === Counters ===

    /// A fresh type variable from the unit-wide monotonic sequence.
    pub fn reserve_type(&mut self) -> Type {
        Type::Var(self.counters.reserve_type())
    }

    /// A fresh generated local name such as `$3`; the `$` prefix keeps it
    /// out of the user namespace.
    pub fn reserve_local(&mut self, interner: &Interner) -> Name {
        let ordinal = self.counters.reserve_local();
        interner.intern(&format!("${ordinal}"))
    }

    // === Unification ===

    pub fn resolve_type(&self, ty: &Type) -> Type {
        self.types.resolve(ty)
    }

    pub fn bind(&mut self, variable: u32, ty: &Type) -> Result<(), TypeError> {
        self.types.bind(variable, ty, self.resolver.as_ref())
    }

    pub fn unify(&mut self, left: &Type, right: &Type) -> Result<(), TypeError> {
        self.types.unify(left, right, self.resolver.as_ref())
    }

    pub fn specialize(&mut self, ty: &Type) {
        self.types.specialize(ty);
    }

    pub fn generalize(&mut self, ty: &Type) {
        self.types.generalize(ty);
    }

    pub fn generate(&mut self, ty: &Type) -> Type {
        self.types.generate(ty, &mut self.counters)
    }

    pub fn extend_context(&mut self, variable: u32, class: Symbol) {
        self.types.extend_context(variable, class);
    }

    pub fn context(&self, variable: u32) -> Option<&rustc_hash::FxHashSet<Symbol>> {
        self.types.context(variable)
    }

    // === Data types ===

    pub fn register_data_type(&mut self, descriptor: DataTypeDescriptor) {
        for constructor in &descriptor.constructors {
            self.constructor_owner
                .insert(constructor.symbol, descriptor.symbol);
        }
        self.data_types.insert(descriptor.symbol, descriptor);
    }

    pub fn data_type(&self, symbol: &Symbol) -> Option<&DataTypeDescriptor> {
        self.data_types.get(symbol)
    }

    pub fn data_types(&self) -> impl Iterator<Item = &DataTypeDescriptor> {
        self.data_types.values()
    }

    /// The descriptor pair for a constructor symbol, locally registered
    /// or externally resolved.
    pub fn constructor(
        &self,
        symbol: &Symbol,
    ) -> Option<(DataTypeDescriptor, DataConstructorDescriptor)> {
        if let Some(owner) = self.constructor_owner.get(symbol) {
            let data_type = self.data_types.get(owner)?;
            let constructor = data_type.constructor(symbol)?.clone();
            return Some((data_type.clone(), constructor));
        }
        let data_type = self.resolver.resolve_constructor(symbol)?;
        let constructor = data_type.constructor(symbol)?.clone();
        Some((data_type, constructor))
    }

    /// The built-in tuple descriptor for the given width, registered
    /// lazily. Width 0 is the unit type `()`.
    pub fn tuple_descriptor(&mut self, width: usize, interner: &Interner) -> DataTypeDescriptor {
        let mut text = String::from("(");
        for _ in 1..width {
            text.push(',');
        }
        text.push(')');
        let symbol = Symbol::qualified(self.prelude, interner.intern(&text));
        if let Some(existing) = self.data_types.get(&symbol) {
            return existing.clone();
        }
        let mut parameters = Vec::with_capacity(width);
        let mut fields = Vec::with_capacity(width);
        for ordinal in 0..width {
            let variable = self.counters.reserve_type();
            parameters.push(variable);
            fields.push(DataFieldDescriptor::new(
                ordinal as u32,
                interner.intern(&format!("_{ordinal}")),
                Type::Var(variable),
            ));
        }
        let descriptor = DataTypeDescriptor::new(
            symbol,
            parameters,
            vec![DataConstructorDescriptor::new(0, symbol, fields)],
        );
        self.register_data_type(descriptor.clone());
        descriptor
    }
}
