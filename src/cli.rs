use clap::{
    builder::{OsStr, PossibleValue},
    Parser, ValueEnum,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Which built-in program to feed through the backend
    #[arg(value_enum, default_value_t = Demo::All)]
    pub demo: Demo,

    /// Specifies the backend, run the program directly or translate it to C
    #[arg(short, long, value_enum, default_value = Mode::Interpret)]
    pub mode: Mode,

    /// Where the generator writes its C file
    #[arg(short, long, default_value = "out.c")]
    pub output: PathBuf,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    Interpret,
    Generate,
}

impl From<Mode> for OsStr {
    fn from(mode: Mode) -> OsStr {
        match mode {
            Mode::Interpret => "interpreter".into(),
            Mode::Generate => "generator".into(),
        }
    }
}

impl ValueEnum for Mode {
    fn value_variants<'a>() -> &'a [Self] {
        &[Mode::Interpret, Mode::Generate]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(match self {
            Mode::Interpret => PossibleValue::new("interpreter").help("Execute via interpreter"),
            Mode::Generate => {
                PossibleValue::new("generator").help("Translate to a C source file")
            }
        })
    }
}

#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Demo {
    Arithmetic,
    Functions,
    Scoping,
    /// Calls a function that was never defined
    Undefined,
    All,
}
