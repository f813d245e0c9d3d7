use super::{
    error::Error,
    functions::FunctionRegistry,
    ir::{Statement, Value},
    symbols::SymbolStore,
};

/// Which function, if any, is currently being defined.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum DefinitionContext {
    #[default]
    TopLevel,
    Defining(String),
}

impl DefinitionContext {
    /// TopLevel -> Defining(name). Definitions do not nest, so beginning one
    /// while another is open is rejected and leaves the open one untouched.
    pub fn begin(&mut self, name: &str) -> Result<(), Error> {
        match self {
            DefinitionContext::TopLevel => {
                *self = DefinitionContext::Defining(name.to_owned());
                Ok(())
            }
            DefinitionContext::Defining(open) => Err(Error::NestedDefinition {
                open: open.clone(),
                requested: name.to_owned(),
            }),
        }
    }

    /// Defining(name) -> TopLevel, handing back the name that was closed.
    pub fn end(&mut self) -> Option<String> {
        match std::mem::take(self) {
            DefinitionContext::TopLevel => None,
            DefinitionContext::Defining(name) => Some(name),
        }
    }

    pub fn current(&self) -> Option<&str> {
        match self {
            DefinitionContext::TopLevel => None,
            DefinitionContext::Defining(name) => Some(name),
        }
    }

    pub fn is_top_level(&self) -> bool {
        matches!(self, DefinitionContext::TopLevel)
    }
}

/// Everything one program owns: global symbols, function registry,
/// definition context and the stack of functions currently executing.
///
/// A `Program` is caller-owned and independent of any other, so building two
/// programs in one process is fine as long as each gets its own instance.
#[derive(Debug, Default)]
pub struct Program {
    pub symbols: SymbolStore,
    pub functions: FunctionRegistry,
    pub definition: DefinitionContext,
    call_stack: Vec<String>,
}

impl Program {
    /// Reserved global written by a `return` at top level.
    pub const GLOBAL_RETURN: &'static str = "__global_return";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_definition(&mut self, name: &str, has_return_value: bool) -> Result<(), Error> {
        self.definition.begin(name)?;
        self.functions.register(name, has_return_value);
        Ok(())
    }

    pub fn end_definition(&mut self) -> Option<String> {
        self.definition.end()
    }

    /// Appends `statement` to the body of the function being defined. At top
    /// level the statement is handed back so the caller can run it right away.
    pub fn record_statement(&mut self, statement: Statement) -> Option<Statement> {
        if let Some(name) = self.definition.current() {
            if let Some(function) = self.functions.get_mut(name) {
                function.body.push(statement);
                return None;
            }
        }

        Some(statement)
    }

    /// The function whose locals are visible right now: the innermost one
    /// executing, otherwise the one being defined.
    pub fn active_function(&self) -> Option<&str> {
        self.call_stack
            .last()
            .map(String::as_str)
            .or_else(|| self.definition.current())
    }

    pub fn set_value(&mut self, name: &str, value: Value) {
        let active = self
            .call_stack
            .last()
            .map(String::as_str)
            .or_else(|| self.definition.current());
        let local = active
            .and_then(|function| self.functions.get_mut(function))
            .map(|function| &mut function.locals);

        self.symbols.set_value(local, name, value);
    }

    pub fn get_value(&self, name: &str) -> Value {
        let local = self
            .active_function()
            .and_then(|function| self.functions.get(function))
            .map(|function| &function.locals);

        self.symbols.get_value(local, name)
    }

    pub fn call_depth(&self) -> usize {
        self.call_stack.len()
    }

    pub(crate) fn enter(&mut self, name: &str) {
        self.call_stack.push(name.to_owned());
    }

    pub(crate) fn leave(&mut self) {
        self.call_stack.pop();
    }
}
