// Tally Symbol Table
// Interns word text into compact tokens. One table per interpreter, so
// independent runs share nothing and need no synchronization.

use rustc_hash::FxHashMap;

use crate::error::{TallyError, TallyResult};

/// An interned identifier. Two symbols compare equal iff their source
/// strings are equal within one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(pub(crate) u32);

impl Symbol {
    pub fn id(self) -> u32 {
        self.0
    }
}

/// Bijective string <-> token mapping for the life of the table.
/// Tokens are never recycled for a different string.
#[derive(Debug, Default)]
pub struct SymbolTable {
    names: Vec<String>,
    index: FxHashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the canonical token for `text`, creating one on first sight.
    pub fn intern(&mut self, text: &str) -> Symbol {
        if let Some(&sym) = self.index.get(text) {
            return sym;
        }
        let sym = Symbol(self.names.len() as u32);
        self.names.push(text.to_string());
        self.index.insert(text.to_string(), sym);
        sym
    }

    /// Inverse lookup. Fails only for a token this table never produced.
    pub fn text(&self, sym: Symbol) -> TallyResult<&str> {
        self.names
            .get(sym.0 as usize)
            .map(String::as_str)
            .ok_or(TallyError::UnknownSymbol(sym.0))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
