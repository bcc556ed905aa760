//! Command-line interface for ejb
//! This binary converts programming problems between e-judge package formats.
//!
//! Usage:
//!   ejb convert --from `<fmt>` --to `<fmt>` `<inputs>`... [-o `<dir>`]   - Convert packages
//!   ejb formats                                                         - List formats
//!   ejb inspect --from `<fmt>` `<file>`                                   - Print a problem summary
//!
//! Exit status: 0 when every file converted, 1 when some file failed, 2 on usage or
//! configuration errors.

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use ejb::Problem;
use ejb_babel::{convert, BatchReport, ConvertSpec, FormatRegistry, Outcome};
use ejb_config::{ConfigError, EjbConfig, Loader};
use std::path::PathBuf;
use std::process;

const EXIT_FAILED_FILES: i32 = 1;
const EXIT_CONFIGURATION: i32 = 2;

fn cli() -> Command {
    Command::new("ejb")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Converts programming problems between e-judge package formats")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("set")
                .long("set")
                .global(true)
                .action(ArgAction::Append)
                .value_name("KEY=VALUE")
                .help("Override a configuration key (e.g. convert.boca.pdf_compiler=xelatex)"),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert problem packages from one format to another")
                .arg(
                    Arg::new("from")
                        .long("from")
                        .short('f')
                        .required(true)
                        .help("Source format (see `ejb formats`)"),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .short('t')
                        .required(true)
                        .help("Destination format"),
                )
                .arg(
                    Arg::new("inputs")
                        .required(true)
                        .num_args(1..)
                        .value_parser(value_parser!(PathBuf))
                        .help("Package files, or directories of package files"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .default_value(".")
                        .value_parser(value_parser!(PathBuf))
                        .help("Existing directory the converted packages are written to"),
                )
                .arg(
                    Arg::new("report")
                        .long("report")
                        .default_value("text")
                        .value_parser(["text", "json"])
                        .help("Per-file report printed on stdout"),
                )
                .arg(
                    Arg::new("statement-language")
                        .long("statement-language")
                        .help("Polygon: statement language to read (default: english)"),
                )
                .arg(
                    Arg::new("tmp")
                        .long("tmp")
                        .help("BOCA: directory for LaTeX scratch files"),
                )
                .arg(
                    Arg::new("notes")
                        .long("notes")
                        .action(ArgAction::SetTrue)
                        .help("BOCA: include notes in the statement PDF"),
                )
                .arg(
                    Arg::new("tutorial")
                        .long("tutorial")
                        .action(ArgAction::SetTrue)
                        .help("BOCA: include the tutorial in the statement PDF"),
                )
                .arg(
                    Arg::new("penalty")
                        .long("penalty")
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(i64))
                        .help("CodeRunner: attempts without penalty (default: 2)"),
                )
                .arg(
                    Arg::new("all-or-nothing")
                        .long("all-or-nothing")
                        .action(ArgAction::SetTrue)
                        .help("CodeRunner: grade all tests as a whole"),
                )
                .arg(
                    Arg::new("answer-language")
                        .long("answer-language")
                        .help("CodeRunner: c, cpp, py or all (default: all)"),
                ),
        )
        .subcommand(Command::new("formats").about("List the available formats"))
        .subcommand(
            Command::new("inspect")
                .about("Read one package and print its problem as JSON")
                .arg(
                    Arg::new("from")
                        .long("from")
                        .short('f')
                        .required(true)
                        .help("Format of the package"),
                )
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Package file"),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();

    let config = load_config(&matches).unwrap_or_else(|err| {
        eprintln!("Configuration error: {}", err);
        process::exit(EXIT_CONFIGURATION);
    });
    init_tracing(&config.logging.filter);

    let code = match matches.subcommand() {
        Some(("convert", sub)) => handle_convert_command(sub, config),
        Some(("formats", _)) => handle_formats_command(),
        Some(("inspect", sub)) => handle_inspect_command(sub, config),
        _ => EXIT_CONFIGURATION,
    };
    process::exit(code);
}

/// Defaults, then `--config`, then `--set`, then the dedicated convert flags.
fn load_config(matches: &ArgMatches) -> Result<EjbConfig, String> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        loader = loader.with_file(path);
    }
    if let Some(pairs) = matches.get_many::<String>("set") {
        for pair in pairs {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("--set expects KEY=VALUE, got '{}'", pair))?;
            loader = loader
                .set_override(key.trim(), value.trim())
                .map_err(|e| e.to_string())?;
        }
    }
    if let Some(("convert", sub)) = matches.subcommand() {
        loader = apply_convert_flags(loader, sub).map_err(|e| e.to_string())?;
    }
    loader.build().map_err(|e| e.to_string())
}

fn apply_convert_flags(mut loader: Loader, sub: &ArgMatches) -> Result<Loader, ConfigError> {
    for (flag, key) in [
        ("statement-language", "convert.polygon.statement_language"),
        ("tmp", "convert.boca.tmp_dir"),
        ("answer-language", "convert.coderunner.answer_language"),
    ] {
        if let Some(value) = sub.get_one::<String>(flag) {
            loader = loader.set_override(key, value.as_str())?;
        }
    }
    for (flag, key) in [
        ("notes", "convert.boca.include_notes"),
        ("tutorial", "convert.boca.include_tutorial"),
        ("all-or-nothing", "convert.coderunner.all_or_nothing"),
    ] {
        if sub.get_flag(flag) {
            loader = loader.set_override(key, true)?;
        }
    }
    if let Some(penalty) = sub.get_one::<i64>("penalty") {
        loader = loader.set_override("convert.coderunner.penalty_grace", *penalty)?;
    }
    Ok(loader)
}

/// `RUST_LOG` wins over the configured filter. Logs go to stderr, reports to stdout.
fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_convert_command(sub: &ArgMatches, config: EjbConfig) -> i32 {
    let from = sub.get_one::<String>("from").map(String::as_str).unwrap_or_default();
    let to = sub.get_one::<String>("to").map(String::as_str).unwrap_or_default();
    let output = sub
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));

    let mut spec = ConvertSpec::new(from, to)
        .with_output_dir(output)
        .with_options(config.convert);
    if let Some(inputs) = sub.get_many::<PathBuf>("inputs") {
        for input in inputs {
            spec = spec.with_input(input);
        }
    }

    let registry = FormatRegistry::default();
    let report = match convert(&registry, &spec) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("Error: {}", err);
            return EXIT_CONFIGURATION;
        }
    };

    match sub.get_one::<String>("report").map(String::as_str) {
        Some("json") => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                eprintln!("Error formatting report: {}", err);
                return EXIT_FAILED_FILES;
            }
        },
        _ => print!("{}", text_report(&report)),
    }

    if report.all_succeeded() {
        0
    } else {
        EXIT_FAILED_FILES
    }
}

fn text_report(report: &BatchReport) -> String {
    let mut out = String::new();
    for file in &report.files {
        match &file.outcome {
            Outcome::Converted { artifacts } => {
                let artifacts: Vec<String> = artifacts.iter().map(|a| a.display().to_string()).collect();
                out.push_str(&format!("ok    {} -> {}\n", file.input.display(), artifacts.join(", ")));
            }
            Outcome::Failed { error } => {
                out.push_str(&format!("FAIL  {}: {}\n", file.input.display(), error));
            }
        }
    }
    let failed = report.failures().count();
    out.push_str(&format!(
        "{} converted, {} failed\n",
        report.files.len() - failed,
        failed
    ));
    out
}

fn handle_formats_command() -> i32 {
    let registry = FormatRegistry::default();
    println!("Available formats:\n");
    for name in registry.list_formats() {
        let Ok(format) = registry.get(&name) else {
            continue;
        };
        let directions = match (format.supports_reading(), format.supports_writing()) {
            (true, true) => "read, write",
            (true, false) => "read",
            (false, true) => "write",
            (false, false) => "-",
        };
        println!("  {:<12} {:<12} {}", name, directions, format.description());
    }
    0
}

fn handle_inspect_command(sub: &ArgMatches, config: EjbConfig) -> i32 {
    let from = sub.get_one::<String>("from").map(String::as_str).unwrap_or_default();
    let Some(file) = sub.get_one::<PathBuf>("file") else {
        return EXIT_CONFIGURATION;
    };
    if let Err(err) = config.convert.validate() {
        eprintln!("Error: {}", err);
        return EXIT_CONFIGURATION;
    }

    let registry = FormatRegistry::default();
    let problem = match registry.read(file, from, &config.convert) {
        Ok(problem) => problem,
        Err(err) if err.is_per_file() => {
            eprintln!("Error: {}: {}", file.display(), err);
            return EXIT_FAILED_FILES;
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            return EXIT_CONFIGURATION;
        }
    };

    match serde_json::to_string_pretty(&summary(&problem)) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(err) => {
            eprintln!("Error formatting summary: {}", err);
            EXIT_FAILED_FILES
        }
    }
}

fn summary(problem: &Problem) -> serde_json::Value {
    let statement = problem.statement();
    let evaluation = problem.evaluation();
    let limits = evaluation.limits();
    serde_json::json!({
        "id": problem.id(),
        "title": statement.title(),
        "tags": statement.tags(),
        "examples": statement.examples().len(),
        "aux_files": statement.aux_files().keys().collect::<Vec<_>>(),
        "has_tutorial": statement.tutorial().is_some(),
        "has_notes": statement.notes().is_some(),
        "tests": {
            "examples": evaluation.tests().examples().keys().collect::<Vec<_>>(),
            "hidden": evaluation.tests().hidden().keys().collect::<Vec<_>>(),
        },
        "languages": evaluation.languages(),
        "limits": {
            "time_seconds": limits.time_seconds(),
            "memory_mb": limits.memory_mb(),
            "max_file_size_kb": limits.max_file_size_kb(),
        },
    })
}
