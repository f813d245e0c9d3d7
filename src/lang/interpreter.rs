use super::{
    error::{Diagnostics, Error},
    ir::{Environment, Expr, Statement, Value},
    program::Program,
    Backend,
};
use log::{debug, trace, warn};
use std::io::{self, Write};

/// Calls nested deeper than this are abandoned instead of overflowing the
/// native stack.
pub const MAX_CALL_DEPTH: usize = 256;

/// Runs statements directly. At top level every statement takes effect as
/// soon as it arrives; inside a definition it is kept and replayed, in order,
/// on every call to that function.
pub struct Interpreter<W: Write = io::Stdout> {
    program: Program,
    out: W,
    diagnostics: Diagnostics,
}

impl Interpreter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Self {
        Self {
            program: Program::new(),
            out,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Runs the body of `name` once and yields its return value, or `0.0`
    /// when it has none. Unknown functions are reported, not fatal.
    pub fn invoke(&mut self, name: &str) -> Value {
        let body = match self.program.functions.get(name) {
            Some(function) => function.body.clone(),
            None => {
                self.diagnostics
                    .report(Error::UndefinedFunction(name.to_owned()));
                return 0.0;
            }
        };

        if self.program.call_depth() >= MAX_CALL_DEPTH {
            self.diagnostics.report(Error::CallDepthExceeded {
                name: name.to_owned(),
                limit: MAX_CALL_DEPTH,
            });
            return 0.0;
        }

        debug!("invoking '{name}' ({} statements)", body.len());

        self.program.enter(name);
        for statement in &body {
            self.execute(statement);
        }
        self.program.leave();

        self.program
            .functions
            .get(name)
            .map_or(0.0, |function| function.result())
    }

    fn execute(&mut self, statement: &Statement) -> Value {
        trace!("executing {}", statement.kind());

        match statement {
            Statement::Assign { name, value } => {
                let value = value.evaluate(self);
                self.program.set_value(name, value);
            }

            Statement::PrintText(text) => {
                let result = writeln!(self.out, "{text}");
                self.check(result);
            }

            Statement::PrintNumber(value) => {
                let value = value.evaluate(self);
                let result = writeln!(self.out, "{}", format_number(value));
                self.check(result);
            }

            Statement::Return(value) => {
                let value = value.evaluate(self);

                // Outside of any call there is nothing to return from, so the
                // value lands in a reserved global instead.
                match self.program.active_function().map(str::to_owned) {
                    Some(name) => {
                        if let Some(function) = self.program.functions.get_mut(&name) {
                            function.return_value = value;
                        }
                    }
                    None => self.program.set_value(Program::GLOBAL_RETURN, value),
                }
            }

            Statement::Call(name) => return self.invoke(name),
        }

        0.0
    }

    fn check(&mut self, result: io::Result<()>) {
        if let Err(err) = result {
            self.diagnostics.report(err.into());
        }
    }
}

impl<W: Write> Environment for Interpreter<W> {
    fn resolve_identifier(&mut self, name: &str) -> Value {
        self.program.get_value(name)
    }

    fn resolve_call(&mut self, name: &str) -> Value {
        self.invoke(name)
    }
}

impl<W: Write> Backend for Interpreter<W> {
    // Whatever was reported while running
    type Output = Diagnostics;

    fn begin_definition(&mut self, name: &str, has_return_value: bool) -> Result<(), Error> {
        self.program
            .begin_definition(name, has_return_value)
            .map_err(|err| self.diagnostics.reject(err))?;

        debug!("defining '{name}' (returns value: {has_return_value})");
        Ok(())
    }

    fn end_definition(&mut self) {
        match self.program.end_definition() {
            Some(name) => debug!("finished defining '{name}'"),
            None => warn!("end of definition outside of any definition, ignoring"),
        }
    }

    fn statement(&mut self, statement: Statement) -> Value {
        match self.program.record_statement(statement) {
            Some(statement) => self.execute(&statement),
            None => {
                trace!(
                    "deferred statement into '{}'",
                    self.program.definition.current().unwrap_or_default()
                );
                0.0
            }
        }
    }

    fn lookup(&self, name: &str) -> Value {
        self.program.get_value(name)
    }

    fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    fn finish(mut self) -> Result<Self::Output, Error> {
        self.out.flush()?;
        Ok(self.diagnostics)
    }
}

/// Renders `value` the way C's `printf("%f")` does, NaN included: its sign
/// bit decides between `nan` and `-nan`.
pub fn format_number(value: Value) -> String {
    if value.is_nan() {
        if value.is_sign_negative() {
            "-nan".to_owned()
        } else {
            "nan".to_owned()
        }
    } else if value == f64::INFINITY {
        "inf".to_owned()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_owned()
    } else {
        format!("{value:.6}")
    }
}
