//! `cinderc` entry point: argv parsing, file IO, and process exit codes
//! (`spec.md` §6/§7). Preprocessing, lowering, and diagnostic accumulation
//! all live in the portable `cinder_compiler`/`cinder_llvm`/
//! `cinder_preprocess` crates — this binary is just their driver, the same
//! split the teacher draws between its CLI binary and its library crates.

mod args;
mod lmod;
mod parser;
mod resolver;
mod tracing_setup;

use std::io::IsTerminal;
use std::path::Path;

use inkwell::context::Context;

use cinder_compiler::{compile_module, CompileConfig, CompileError};
use cinder_diagnostic::{render, ColorMode};

use args::ParsedArgs;
use parser::{NoSourceParser, SourceParser};
use resolver::FsIncludeResolver;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    tracing_setup::init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    match args::parse(&argv) {
        Ok(ParsedArgs::Help) => args::print_usage(),
        Ok(ParsedArgs::Version) => println!("cinderc {VERSION}"),
        Ok(ParsedArgs::Run(run_args)) => std::process::exit(run(&run_args)),
        Err(message) => {
            eprintln!("cinderc: {message}");
            args::print_usage();
            std::process::exit(1);
        }
    }
}

fn run(args: &args::Args) -> i32 {
    let source_text = match std::fs::read_to_string(&args.source) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("cinderc: could not read '{}': {err}", args.source);
            return 1;
        }
    };

    let source_path = Path::new(&args.source)
        .parent()
        .map(|dir| {
            let dir = dir.to_string_lossy();
            if dir.is_empty() {
                String::new()
            } else {
                format!("{dir}/")
            }
        })
        .unwrap_or_default();
    let source_name = Path::new(&args.source)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.source.clone());

    let parser = NoSourceParser;
    let mut module = match parser.parse(&source_name, &args.source, &source_text) {
        Ok(module) => module,
        Err(message) => {
            eprintln!("cinderc: {message}");
            return 1;
        }
    };
    module.source_name = source_name;
    module.source_path = source_path;

    let include_path = match args.include_path.as_str() {
        "" => String::new(),
        path if path.ends_with('/') => path.to_string(),
        path => format!("{path}/"),
    };

    let resolver = FsIncludeResolver::new(&parser);
    let context = Context::create();
    let config = CompileConfig {
        include_path,
        module_mode: args.module_mode,
    };

    let output = match compile_module(&context, &mut module, &resolver, &config) {
        Ok(output) => output,
        Err(err) => {
            report_host_error(&err);
            return 1;
        }
    };

    let is_tty = std::io::stderr().is_terminal();
    for diagnostic in &output.diagnostics {
        eprint!("{}", render(diagnostic, Some(&source_text), ColorMode::Auto, is_tty));
    }

    if let Err(err) = std::fs::write(&args.output, &output.ir_text) {
        eprintln!("cinderc: could not write '{}': {err}", args.output);
        return 1;
    }

    if let Some(definitions) = &output.definitions_text {
        let definitions_path = Path::new(&args.output).with_extension("lmod");
        if let Err(err) = std::fs::write(&definitions_path, definitions) {
            eprintln!("cinderc: could not write '{}': {err}", definitions_path.display());
            return 1;
        }
    }

    i32::from(output.has_errors())
}

fn report_host_error(err: &CompileError) {
    eprintln!("cinderc: {err}");
}
