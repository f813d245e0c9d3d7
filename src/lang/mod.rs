pub mod codegen;
pub mod error;
pub mod functions;
pub mod interpreter;
pub mod ir;
pub mod program;
pub mod symbols;

use error::{Diagnostics, Error};
use ir::{Expr, Statement, Value};

/// The surface a front end drives while it recognizes source constructs.
///
/// Both backends consume the same calls in the same order; one runs them, the
/// other turns them into C. A backend is picked once per run and owns all of
/// its state, so nothing is shared between two backends or two programs.
pub trait Backend: Sized {
    type Output;

    /// Starts collecting statements into `name` instead of the top level.
    /// Fails, and reports, if another definition is still open.
    fn begin_definition(&mut self, name: &str, has_return_value: bool) -> Result<(), Error>;

    fn end_definition(&mut self);

    /// Runs or records a single statement. Yields the value of a call, `0.0`
    /// for everything else.
    fn statement(&mut self, statement: Statement) -> Value;

    fn lookup(&self, name: &str) -> Value;

    fn diagnostics(&self) -> &Diagnostics;

    /// Terminal: consumes the backend, so nothing can be added afterwards.
    fn finish(self) -> Result<Self::Output, Error>;

    fn assign(&mut self, name: &str, value: impl Into<Expr>) {
        self.statement(Statement::Assign {
            name: name.to_owned(),
            value: value.into(),
        });
    }

    fn print_text(&mut self, text: &str) {
        self.statement(Statement::PrintText(text.to_owned()));
    }

    fn print_number(&mut self, value: impl Into<Expr>) {
        self.statement(Statement::PrintNumber(value.into()));
    }

    fn return_value(&mut self, value: impl Into<Expr>) {
        self.statement(Statement::Return(value.into()));
    }

    fn call(&mut self, name: &str) -> Value {
        self.statement(Statement::Call(name.to_owned()))
    }
}
