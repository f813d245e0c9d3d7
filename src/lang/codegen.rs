use super::{
    error::{Diagnostics, Error},
    ir::{Expr, Statement, Value},
    program::DefinitionContext,
    symbols::SymbolStore,
    Backend,
};
use log::{debug, trace, warn};
use std::{
    collections::{HashMap, HashSet},
    fmt::Write as _,
    io::Write,
};

const HEADER: &str = "#include <stdio.h>\n\n";
const INDENT: &str = "    ";

/// Translates the same statements the interpreter runs into a single C
/// translation unit: function definitions in the order they were first
/// registered, followed by a `main` holding the top level.
pub struct CodeGenerator<W: Write> {
    out: W,
    definitions: String,
    main: String,
    /// Every function emitted so far, with whether it returns a value.
    emitted: HashMap<String, bool>,
    definition: DefinitionContext,
    /// Set while a repeated definition is open; its statements are dropped.
    suppressed: bool,
    returns_value: bool,
    declared_main: HashSet<String>,
    declared_local: HashSet<String>,
    /// Callees in the order they were first referenced.
    called: Vec<String>,
    diagnostics: Diagnostics,
}

impl<W: Write> CodeGenerator<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            definitions: String::new(),
            main: String::new(),
            emitted: HashMap::new(),
            definition: DefinitionContext::default(),
            suppressed: false,
            returns_value: false,
            declared_main: HashSet::new(),
            declared_local: HashSet::new(),
            called: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// The artifact as it would be written right now.
    pub fn render(&self) -> String {
        let mut text = String::with_capacity(
            HEADER.len() + self.definitions.len() + self.main.len() + 64,
        );

        text.push_str(HEADER);
        text.push_str(&self.definitions);
        if self.definition.current().is_some() && !self.suppressed {
            // Still open, close it so the output stays well formed
            text.push_str("}\n\n");
        }
        text.push_str("int main() {\n");
        text.push_str(&self.main);
        text.push_str(INDENT);
        text.push_str("return 0;\n}\n");

        text
    }

    /// C text for `expr`. Only names already declared in the block being
    /// written exist in C; anything else reads as unbound, i.e. `0.0`.
    fn expression(&mut self, expr: &Expr, in_function: bool) -> String {
        match expr {
            Expr::Literal(value) => literal(*value),

            Expr::Identifier(name) => {
                let declared = if in_function {
                    &self.declared_local
                } else {
                    &self.declared_main
                };
                if declared.contains(name) {
                    return name.clone();
                }

                // main's variables are locals of main, a function cannot see them
                if in_function && self.declared_main.contains(name) {
                    let function = self.definition.current().unwrap_or_default().to_owned();
                    self.diagnostics.report(Error::TopLevelNotVisible {
                        name: name.clone(),
                        function,
                    });
                }
                literal(SymbolStore::UNBOUND)
            }

            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.expression(lhs, in_function);
                let rhs = self.expression(rhs, in_function);
                format!("({lhs} {} {rhs})", op.symbol())
            }

            // A void function still has to produce a number when used as one
            Expr::Call(name) => match self.emitted.get(name) {
                Some(false) => format!("({name}(), 0.0)"),
                _ => format!("{name}()"),
            },
        }
    }

    fn line(&mut self, statement: &Statement, in_function: bool) -> String {
        match statement {
            Statement::Assign { name, value } => {
                // A whole number on its own keeps the short `double x = 5;` form,
                // the declaration converts it
                let value = match value {
                    Expr::Literal(value) if is_small_whole(*value) => format!("{value}"),
                    value => self.expression(value, in_function),
                };
                let declared = if in_function {
                    &mut self.declared_local
                } else {
                    &mut self.declared_main
                };

                // Redeclaring in the same block is not valid C
                if declared.insert(name.clone()) {
                    format!("double {name} = {value};")
                } else {
                    format!("{name} = {value};")
                }
            }

            Statement::PrintText(text) => format!("printf(\"%s\\n\", \"{}\");", escape(text)),

            Statement::PrintNumber(value) => {
                format!("printf(\"%f\\n\", {});", self.expression(value, in_function))
            }

            Statement::Return(value) => {
                if self.returns_value {
                    format!("return {};", self.expression(value, in_function))
                } else {
                    "return;".to_owned()
                }
            }

            Statement::Call(name) => format!("{name}();"),
        }
    }
}

impl<W: Write> Backend for CodeGenerator<W> {
    type Output = Diagnostics;

    fn begin_definition(&mut self, name: &str, has_return_value: bool) -> Result<(), Error> {
        self.definition
            .begin(name)
            .map_err(|err| self.diagnostics.reject(err))?;

        if self.emitted.contains_key(name) {
            debug!("'{name}' already emitted, skipping its body");
            self.suppressed = true;
            return Ok(());
        }

        debug!("emitting '{name}' (returns value: {has_return_value})");
        self.emitted.insert(name.to_owned(), has_return_value);
        self.returns_value = has_return_value;
        self.declared_local.clear();

        let ret = if has_return_value { "double" } else { "void" };
        // Writing into a String never fails
        let _ = writeln!(self.definitions, "{ret} {name}() {{");

        Ok(())
    }

    fn end_definition(&mut self) {
        match self.definition.end() {
            Some(name) => {
                if !self.suppressed {
                    self.definitions.push_str("}\n\n");
                }
                self.suppressed = false;
                debug!("finished '{name}'");
            }
            None => warn!("end of definition outside of any definition, ignoring"),
        }
    }

    fn statement(&mut self, statement: Statement) -> Value {
        if self.suppressed {
            trace!("dropping {} from a repeated definition", statement.kind());
            return 0.0;
        }

        let in_function = !self.definition.is_top_level();
        if statement.is_function_only() && !in_function {
            self.diagnostics.report(Error::ReturnOutsideFunction);
            return 0.0;
        }

        let line = self.line(&statement, in_function);

        trace!("{} -> {line}", statement.kind());

        let called = &mut self.called;
        statement.for_each_call(&mut |name| {
            if !called.iter().any(|seen| seen == name) {
                called.push(name.to_owned());
            }
        });

        let block = if in_function {
            &mut self.definitions
        } else {
            &mut self.main
        };
        block.push_str(INDENT);
        block.push_str(&line);
        block.push('\n');

        0.0
    }

    /// Values only exist once the generated program runs, so every name reads
    /// as unbound here.
    fn lookup(&self, _name: &str) -> Value {
        SymbolStore::UNBOUND
    }

    fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    fn finish(mut self) -> Result<Self::Output, Error> {
        if let Some(name) = self.definition.current() {
            warn!("definition of '{name}' was never closed, closing it");
        }

        // Every definition lands above main, so only names that were never
        // defined at all are missing from the artifact
        for name in std::mem::take(&mut self.called) {
            if !self.emitted.contains_key(&name) {
                self.diagnostics.report(Error::UndefinedFunction(name));
            }
        }

        let text = self.render();
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;

        Ok(self.diagnostics)
    }
}

/// A C double literal that reads back as the same value. Never an `int`,
/// so `/` stays floating point and `printf("%f")` gets a double.
fn literal(value: Value) -> String {
    if value.is_nan() {
        "(0.0 / 0.0)".to_owned()
    } else if value == f64::INFINITY {
        "(1.0 / 0.0)".to_owned()
    } else if value == f64::NEG_INFINITY {
        "(-1.0 / 0.0)".to_owned()
    } else {
        // Debug always keeps a '.' or an exponent: 5.0, -0.0, 1e20
        format!("{value:?}")
    }
}

/// Whole numbers whose integer spelling converts back exactly.
fn is_small_whole(value: Value) -> bool {
    value.fract() == 0.0 && value.abs() < 1e15 && !(value == 0.0 && value.is_sign_negative())
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            c if c.is_ascii_control() => {
                let _ = write!(escaped, "\\{:03o}", c as u32);
            }
            c => escaped.push(c),
        }
    }

    escaped
}
