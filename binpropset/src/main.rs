//! Property-set command-line tool for checking, listing, and converting
//! device property-set descriptions.
//!
//! Usage: propset [OPTIONS] [FILE|DIR]...
//!
//! Options:
//!   -t, --to <FORMAT>      Output format (pset, yaml, toml) [default: pset]
//!   --check                Report diagnostics and line counts only
//!   --locations            Print the /vendor/bus/device-id/revision/name
//!                          location of every property
//!   --dump                 Print the source, records, and diagnostics
//!   -o, --output <FILE>    Write output to specified file
//!   -h, --help             Print help
//!   -V, --version          Print version

use libpropset::{parse_file, parse_str, ParsedSet};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod transcode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Pset,
    Yaml,
    Toml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Convert(Format),
    Check,
    Locations,
    Dump,
}

enum Input {
    Stdin,
    File(PathBuf),
}

fn parse_format(s: &str) -> Option<Format> {
    match s {
        "pset" => Some(Format::Pset),
        "yaml" | "yml" => Some(Format::Yaml),
        "toml" => Some(Format::Toml),
        _ => None,
    }
}

/// Log to stderr, filtered by `RUST_LOG`. Diagnostics are printed by
/// [`process_input`], so their log events are off unless asked for.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,propset::diagnostics=off"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn set_mode(mode: &mut Option<Mode>, next: Mode) {
    match *mode {
        Some(current) if current != next => {
            eprintln!("Error: --check, --locations, --dump and --to are mutually exclusive");
            process::exit(1);
        }
        _ => *mode = Some(next),
    }
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    let mut mode: Option<Mode> = None;
    let mut output_file: Option<&str> = None;
    let mut input_paths: Vec<&str> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("propset {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "-t" | "--to" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: -t requires a format argument");
                    process::exit(1);
                }
                match parse_format(&args[i]) {
                    Some(format) => set_mode(&mut mode, Mode::Convert(format)),
                    None => {
                        eprintln!("Error: Unknown format: {}", args[i]);
                        process::exit(1);
                    }
                }
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires an argument");
                    process::exit(1);
                }
                output_file = Some(&args[i]);
            }
            "--check" => set_mode(&mut mode, Mode::Check),
            "--locations" => set_mode(&mut mode, Mode::Locations),
            "--dump" => set_mode(&mut mode, Mode::Dump),
            "-" => input_paths.push("-"),
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                process::exit(1);
            }
            path => input_paths.push(path),
        }
        i += 1;
    }

    let mode = mode.unwrap_or(Mode::Convert(Format::Pset));

    let inputs = collect_inputs(&input_paths);
    if output_file.is_some() && inputs.len() != 1 {
        eprintln!("Error: --output requires exactly one input file");
        process::exit(1);
    }

    let mut had_errors = false;
    for input in &inputs {
        if process_input(input, mode, output_file) != 0 {
            had_errors = true;
        }
    }
    process::exit(if had_errors { 1 } else { 0 });
}

/// Expand command-line paths into inputs. A directory contributes its
/// `.pset` files, sorted; no paths at all means stdin.
fn collect_inputs(paths: &[&str]) -> Vec<Input> {
    if paths.is_empty() {
        return vec![Input::Stdin];
    }

    let mut inputs = Vec::new();
    for &path in paths {
        if path == "-" {
            inputs.push(Input::Stdin);
            continue;
        }
        let path_ref = Path::new(path);
        if !path_ref.is_dir() {
            inputs.push(Input::File(path_ref.to_path_buf()));
            continue;
        }
        let entries = match fs::read_dir(path_ref) {
            Ok(e) => e,
            Err(e) => {
                warn!(directory = path, error = %e, "cannot read input directory");
                eprintln!("Error reading directory {}: {}", path, e);
                process::exit(1);
            }
        };
        let mut files: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|p| p.extension().map(|e| e == "pset").unwrap_or(false))
            .collect();
        files.sort();
        inputs.extend(files.into_iter().map(Input::File));
    }
    inputs
}

fn load(input: &Input) -> Result<ParsedSet, String> {
    match input {
        Input::File(path) => parse_file(path).map_err(|e| e.to_string()),
        Input::Stdin => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("cannot read stdin: {}", e))?;
            Ok(parse_str(&buffer, None))
        }
    }
}

fn process_input(input: &Input, mode: Mode, output_file: Option<&str>) -> i32 {
    let parsed = match load(input) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("? {}", e);
            return 1;
        }
    };
    let name = parsed.filename().unwrap_or("<stdin>").to_string();
    debug!(
        input = %name,
        ?mode,
        diagnostics = parsed.diagnostics().len(),
        "parsed input"
    );

    for diagnostic in parsed.diagnostics() {
        eprintln!("? {}", diagnostic);
    }
    let status = if parsed.okay() { 0 } else { 1 };

    let output = match mode {
        Mode::Check => format!("File: {}\n{}\n", name, parsed.summary()),
        Mode::Dump => parsed.dump().to_string(),
        _ if parsed.has_errors() => {
            eprintln!(
                "{}: {} errors found, no output written",
                name,
                parsed.diagnostics().len()
            );
            return 1;
        }
        Mode::Locations => match parsed.property_locations() {
            Ok(locations) => locations.iter().map(|l| format!("{}\n", l)).collect(),
            Err(e) => {
                eprintln!("{}: {}", name, e);
                return 1;
            }
        },
        Mode::Convert(Format::Pset) => parsed.encode(),
        Mode::Convert(Format::Yaml) => match transcode::yaml::encode(&parsed) {
            Ok(output) => output,
            Err(e) => {
                eprintln!("Error: Cannot convert to YAML: {}", e);
                return 1;
            }
        },
        Mode::Convert(Format::Toml) => transcode::toml::encode(&parsed),
    };

    write_text_output(&output, output_file);
    status
}

fn write_text_output(output: &str, output_file: Option<&str>) {
    if let Some(path) = output_file {
        if let Err(e) = fs::write(path, output) {
            eprintln!("Error writing {}: {}", path, e);
            process::exit(1);
        }
    } else {
        print!("{}", output);
        if !output.is_empty() && !output.ends_with('\n') {
            println!();
        }
    }
}

fn print_help() {
    println!(
        "propset - device property-set checker and converter

USAGE:
    propset [OPTIONS] [FILE|DIR]...

ARGS:
    [FILE|DIR]...    Input files or directories (reads from stdin if not provided)
                     When a directory is given, processes all .pset files in it

OPTIONS:
    -t, --to <FORMAT>      Output format [default: pset]
                           Supported: pset, yaml, toml

                           'pset' re-emits the set in canonical form.

    --check                Print diagnostics and the line/error summary only
                           (exit 0 if valid, 1 if any diagnostic was raised)

    --locations            Print /vendor/bus/device-id/revision/name for
                           every property

    --dump                 Print the source, the parsed records, and all
                           diagnostics

    -o, --output <FILE>    Write output to specified file (single input only)

    -h, --help             Print help

    -V, --version          Print version

ENVIRONMENT:
    RUST_LOG               Log filter, e.g. RUST_LOG=libpropset=debug

EXAMPLES:
    # Check a property set
    propset --check uart.pset

    # Check every set in a directory
    propset --check ./sets/

    # Reformat to canonical form
    propset uart.pset -o uart.pset

    # Convert to YAML
    propset -t yaml uart.pset

    # List where each property will be stored
    propset --locations uart.pset
"
    );
}
