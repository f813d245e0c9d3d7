use std::collections::HashMap;

use super::{
    ir::{Statement, Value},
    symbols::Scope,
};

#[derive(Debug, Default)]
pub struct FunctionDefinition {
    pub has_return_value: bool,
    /// Only meaningful when `has_return_value` is set.
    pub return_value: Value,
    pub locals: Scope,
    pub body: Vec<Statement>,
}

impl FunctionDefinition {
    pub fn new(has_return_value: bool) -> Self {
        Self {
            has_return_value,
            ..Default::default()
        }
    }

    /// What a call yields once the body has run.
    pub fn result(&self) -> Value {
        if self.has_return_value {
            self.return_value
        } else {
            0.0
        }
    }
}

#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDefinition>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates `name`, or resets it if it already exists. The last
    /// registration wins.
    pub fn register(&mut self, name: &str, has_return_value: bool) -> &mut FunctionDefinition {
        let definition = self.functions.entry(name.to_owned()).or_default();
        *definition = FunctionDefinition::new(has_return_value);
        definition
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDefinition> {
        self.functions.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FunctionDefinition> {
        self.functions.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
