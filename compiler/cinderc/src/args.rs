//! Manual `argv` parsing for the fixed, single-letter flag surface in
//! `spec.md` §6. A derive-macro argument parser would be overkill for six
//! flags, none of which take alternate long forms — matching the teacher's
//! own `oric` binary, which hand-rolls its dispatch rather than depending on
//! a CLI-parsing crate.

pub struct Args {
    pub source: String,
    pub output: String,
    pub include_path: String,
    pub module_mode: bool,
}

pub enum ParsedArgs {
    Help,
    Version,
    Run(Args),
}

const USAGE: &str = "\
Usage: cinderc -s <input> [-o <output>] [-I <include-path>] [-m] [-v] [-h]

  -s <input>          source file to compile (required)
  -o <output>          output path for the backend IR (default: a.out)
  -I <include-path>    fallback directory for include()/require() lookups
  -m                   module mode: also emit a companion .lmod file
  -v                   print version and exit
  -h                   print this help and exit
";

pub fn parse(argv: &[String]) -> Result<ParsedArgs, String> {
    let mut source: Option<String> = None;
    let mut output: Option<String> = None;
    let mut include_path = String::new();
    let mut module_mode = false;

    let mut i = 0;
    while i < argv.len() {
        match argv[i].as_str() {
            "-h" => return Ok(ParsedArgs::Help),
            "-v" => return Ok(ParsedArgs::Version),
            "-m" => module_mode = true,
            "-s" => {
                i += 1;
                source = Some(argv.get(i).ok_or("-s requires a file argument")?.clone());
            }
            "-o" => {
                i += 1;
                output = Some(argv.get(i).ok_or("-o requires a file argument")?.clone());
            }
            "-I" => {
                i += 1;
                include_path = argv.get(i).ok_or("-I requires a directory argument")?.clone();
            }
            other => return Err(format!("unrecognized argument '{other}'")),
        }
        i += 1;
    }

    let source = source.ok_or("missing required -s <input>")?;
    Ok(ParsedArgs::Run(Args {
        source,
        output: output.unwrap_or_else(|| "a.out".to_string()),
        include_path,
        module_mode,
    }))
}

pub fn print_usage() {
    eprint!("{USAGE}");
}
