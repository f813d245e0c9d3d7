//! Errors and the side channel used to report them.
//!
//! Almost nothing here aborts a run. Logical problems in the program being
//! built (calling a function that was never defined, opening a definition
//! inside another one) are reported into [`Diagnostics`] and the backend
//! carries on with a default value. Only [`Error::Io`] is meant to stop the
//! process.

use std::{fmt, io, sync::Arc};
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("Function '{0}' not defined.")]
    UndefinedFunction(String),

    #[error("cannot begin definition of '{requested}' while '{open}' is still being defined")]
    NestedDefinition { open: String, requested: String },

    #[error("call depth limit of {limit} exceeded while calling '{name}'")]
    CallDepthExceeded { name: String, limit: usize },

    #[error("return outside of a function has no effect in generated code")]
    ReturnOutsideFunction,

    #[error("top-level '{name}' is not visible inside '{function}' in generated code, reading 0.0")]
    TopLevelNotVisible { name: String, function: String },

    #[error("IO error: {0}")]
    Io(Arc<io::Error>),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(Arc::new(err))
    }
}

/// Ordered list of everything reported during a run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    reports: Vec<Error>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, error: Error) {
        log::error!("{error}");
        self.reports.push(error);
    }

    /// Reports `error` and hands the same error back to the caller.
    pub fn reject(&mut self, error: Error) -> Error {
        self.report(error.clone());
        error
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Error> {
        self.reports.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.reports {
            writeln!(f, "Error: {report}")?;
        }
        Ok(())
    }
}
