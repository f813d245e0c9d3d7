use std::collections::HashMap;

use super::ir::Value;

/// Identifier to value. There is exactly one global scope, and one flat
/// scope per function.
#[derive(Debug, Default, Clone)]
pub struct Scope(HashMap<String, Value>);

impl Scope {
    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.get(name).copied()
    }

    pub fn set(&mut self, name: &str, value: Value) {
        // Avoid allocating a fresh key on every reassignment
        match self.0.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.0.insert(name.to_owned(), value);
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Holds the global scope and resolves names with local-over-global
/// shadowing. Unbound names resolve to [`SymbolStore::UNBOUND`].
#[derive(Debug, Default)]
pub struct SymbolStore {
    globals: Scope,
}

impl SymbolStore {
    pub const UNBOUND: Value = 0.0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn globals(&self) -> &Scope {
        &self.globals
    }

    /// Writes into `local` when a function scope is active, else into the
    /// globals. Never falls through from one to the other.
    pub fn set_value(&mut self, local: Option<&mut Scope>, name: &str, value: Value) {
        match local {
            Some(scope) => scope.set(name, value),
            None => self.globals.set(name, value),
        }
    }

    pub fn get_value(&self, local: Option<&Scope>, name: &str) -> Value {
        local
            .and_then(|scope| scope.get(name))
            .or_else(|| self.globals.get(name))
            .unwrap_or(Self::UNBOUND)
    }
}
