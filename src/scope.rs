// Tally Scopes
// A scope binds symbols to definitions; the chain is searched
// innermost-first, so an inner definition shadows an outer one completely
// until its scope is popped.

use rustc_hash::FxHashMap;

use crate::error::{TallyError, TallyResult};
use crate::symbols::Symbol;
use crate::value::Value;

/// One vocabulary: symbol -> definition.
#[derive(Debug, Default, Clone)]
pub struct Scope {
    defs: FxHashMap<Symbol, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, sym: Symbol, value: Value) {
        self.defs.insert(sym, value);
    }

    pub fn lookup(&self, sym: Symbol) -> Option<&Value> {
        self.defs.get(&sym)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Push/pop list of scopes. The innermost scope is stored last so both
/// operations are O(1); resolution walks the list in reverse.
#[derive(Debug, Default)]
pub struct ScopeChain {
    scopes: Vec<Scope>,
}

impl ScopeChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a scope as the new innermost.
    pub fn push(&mut self, scope: Scope) {
        self.scopes.push(scope);
    }

    /// Remove and return the innermost scope.
    pub fn pop(&mut self) -> TallyResult<Scope> {
        self.scopes.pop().ok_or(TallyError::EmptyScopeChain)
    }

    /// Resolve innermost-first; the first scope that binds `sym` wins and
    /// the scan stops there.
    pub fn resolve(&self, sym: Symbol) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.lookup(sym))
    }

    /// Mutable access to the innermost scope, for definition words.
    pub fn innermost_mut(&mut self) -> TallyResult<&mut Scope> {
        self.scopes.last_mut().ok_or(TallyError::EmptyScopeChain)
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(id: u32) -> Symbol {
        Symbol(id)
    }

    #[test]
    fn inner_definition_shadows_outer() {
        let mut chain = ScopeChain::new();
        let mut outer = Scope::new();
        outer.define(sym(0), Value::Int(1));
        let mut inner = Scope::new();
        inner.define(sym(0), Value::Int(2));

        chain.push(outer);
        chain.push(inner);
        assert_eq!(chain.resolve(sym(0)), Some(&Value::Int(2)));

        chain.pop().unwrap();
        assert_eq!(chain.resolve(sym(0)), Some(&Value::Int(1)));
    }

    #[test]
    fn resolution_stops_at_first_match() {
        let mut chain = ScopeChain::new();
        let mut outer = Scope::new();
        outer.define(sym(0), Value::Int(1));
        chain.push(outer);
        chain.push(Scope::new());
        // The empty inner scope is skipped, the outer match is returned,
        // and nothing reports a failure.
        assert_eq!(chain.resolve(sym(0)), Some(&Value::Int(1)));
    }

    #[test]
    fn unbound_symbol_resolves_to_none() {
        let mut chain = ScopeChain::new();
        chain.push(Scope::new());
        assert_eq!(chain.resolve(sym(9)), None);
    }

    #[test]
    fn pop_empty_chain_fails() {
        let mut chain = ScopeChain::new();
        assert!(matches!(chain.pop(), Err(TallyError::EmptyScopeChain)));
    }
}
