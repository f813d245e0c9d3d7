//! Intermediate representation and backends for a small imperative language
//! with a single numeric type.
//!
//! A front end drives a [`lang::Backend`] while it recognizes source
//! constructs. [`lang::interpreter::Interpreter`] runs the program as it is
//! built; [`lang::codegen::CodeGenerator`] turns the same calls into C.
//!
//! Each backend owns all of its program state. Nothing is global, but state
//! is never reset either: build one program per backend instance.

pub mod demos;
pub mod lang;
