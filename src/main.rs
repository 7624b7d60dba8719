use std::fs;
use std::io;
use std::process::ExitCode;

use clap::{Arg, ArgAction, Command};

use stata_preproc::backend::StataSession;
use stata_preproc::executor::run_noecho;
use stata_preproc::parser::{clean_code, preprocess};

fn main() -> ExitCode {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let matches = Command::new("stata-preproc")
        .version(VERSION)
        .about("Preprocess Stata .do-file cells into executable statement units.")
        .arg(
            Arg::new("filename")
                .required(true)
                .help("The .do file or cell contents to preprocess."),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Emit the segmented units as JSON."),
        )
        .arg(
            Arg::new("clean-only")
                .long("clean-only")
                .action(ArgAction::SetTrue)
                .help("Print the cleaned text without segmenting it."),
        )
        .arg(
            Arg::new("run")
                .long("run")
                .action(ArgAction::SetTrue)
                .help("Run the units through a console-mode Stata session, without echo."),
        )
        .arg(
            Arg::new("stata")
                .long("stata")
                .default_value("stata")
                .help("Stata executable to use with --run."),
        )
        .get_matches();

    let filename = matches.get_one::<String>("filename").unwrap();
    let raw = match fs::read_to_string(filename) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("error: cannot read {}: {}", filename, err);
            return ExitCode::FAILURE;
        }
    };

    if matches.get_flag("clean-only") {
        println!("{}", clean_code(&raw));
        return ExitCode::SUCCESS;
    }

    if matches.get_flag("run") {
        let program = matches.get_one::<String>("stata").unwrap();
        return match run_file(program, &raw) {
            Ok(output) => {
                print!("{}", output);
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("error: {}", err);
                ExitCode::FAILURE
            }
        };
    }

    let units = preprocess(&raw);

    if matches.get_flag("json") {
        match serde_json::to_string_pretty(&units) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                eprintln!("error: {}", err);
                return ExitCode::FAILURE;
            }
        }
    } else {
        for (i, unit) in units.iter().enumerate() {
            println!("--- unit {} ({:?}) ---", i, unit.kind);
            println!("{}", unit.text);
        }
    }

    ExitCode::SUCCESS
}

fn run_file(program: &str, raw: &str) -> io::Result<String> {
    let mut session = StataSession::start(program)?;
    run_noecho(&mut session, raw)
}
