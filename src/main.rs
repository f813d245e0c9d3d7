mod cli;

use clap::Parser;
use cli::{Cli, Demo, Mode};
use irlang::{
    demos,
    lang::{
        codegen::CodeGenerator,
        error::{Diagnostics, Error},
        interpreter::Interpreter,
        Backend,
    },
};
use log::info;
use std::{fs::File, io::BufWriter, process};

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let finished = match cli.mode {
        Mode::Interpret => run(Interpreter::stdout(), cli.demo),

        Mode::Generate => {
            // Not being able to produce the artifact is the one fatal error
            let file = match File::create(&cli.output) {
                Ok(file) => file,
                Err(err) => {
                    eprintln!("Failed to open {} for writing: {err}", cli.output.display());
                    process::exit(1);
                }
            };

            info!("writing C to {}", cli.output.display());
            run(CodeGenerator::new(BufWriter::new(file)), cli.demo)
        }
    };

    match finished {
        Ok(diagnostics) => eprint!("{diagnostics}"),
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}

fn run<B: Backend<Output = Diagnostics>>(mut backend: B, demo: Demo) -> Result<Diagnostics, Error> {
    match demo {
        Demo::Arithmetic => demos::arithmetic(&mut backend),
        Demo::Functions => demos::functions(&mut backend),
        Demo::Scoping => demos::scoping(&mut backend),
        Demo::Undefined => demos::undefined_call(&mut backend),
        Demo::All => {
            demos::arithmetic(&mut backend);
            demos::functions(&mut backend);
            demos::scoping(&mut backend);
            demos::undefined_call(&mut backend);
        }
    }

    backend.finish()
}
