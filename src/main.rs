//! `json2xml`: translates a JSON file into an XML file.
//!
//! Grammar errors do not stop the translation. They are echoed to stderr
//! as they are found and listed in a comment at the top of the output.
//!
//! Exit codes: 0 when output was written (with or without diagnostics),
//! 1 on bad usage, 2 when the input or output could not be accessed.

// std imports
use std::{
    fs::{self, File},
    io::{self, BufReader, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

// third-party imports
use clap::{error::ErrorKind, Parser};
use env_logger::{self as logger};

// local imports
use rill_json2xml::{
    translate_reader, Diagnostics, Error, Options, Result, DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT,
};

const JSON2XML_LOG: &str = "JSON2XML_LOG";
const JSON2XML_LOG_STYLE: &str = "JSON2XML_LOG_STYLE";

const EXIT_USAGE: u8 = 1;
const EXIT_FAILURE: u8 = 2;

/// Translate a JSON document into XML, reporting errors without stopping.
#[derive(Parser, Debug)]
#[command(name = "json2xml", version, about, long_about = None)]
struct Args {
    /// Input JSON file, `-` for stdin
    input: PathBuf,

    /// Output XML file, `-` for stdout
    output: PathBuf,

    /// Maximum nesting of objects and arrays
    #[arg(
        long,
        env = "JSON2XML_MAX_DEPTH",
        default_value_t = DEFAULT_MAX_DEPTH,
        value_parser = parse_max_depth
    )]
    max_depth: usize,

    /// Do not echo diagnostics to stderr
    #[arg(short, long)]
    quiet: bool,
}

fn parse_max_depth(value: &str) -> std::result::Result<usize, String> {
    let depth: usize = value.parse().map_err(|err| format!("{err}"))?;
    if depth > MAX_DEPTH_LIMIT {
        return Err(format!("must be at most {MAX_DEPTH_LIMIT}"));
    }
    Ok(depth)
}

fn bootstrap() {
    if std::env::var(JSON2XML_LOG).is_ok() {
        logger::Builder::from_env(
            logger::Env::new()
                .filter(JSON2XML_LOG)
                .write_style(JSON2XML_LOG_STYLE),
        )
        .format_timestamp_micros()
        .init();
        log::debug!("logging initialized");
    } else {
        logger::Builder::new()
            .filter_level(log::LevelFilter::Error)
            .format_timestamp_millis()
            .init()
    }
}

fn is_std_stream(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn run(args: &Args) -> Result<()> {
    let options = Options {
        max_depth: args.max_depth,
    };
    let diagnostics = if args.quiet {
        Diagnostics::new()
    } else {
        Diagnostics::with_observer(|diagnostic| eprintln!("{diagnostic}"))
    };

    let translation = if is_std_stream(&args.input) {
        translate_reader(io::stdin().lock(), &options, diagnostics)?
    } else {
        let file = File::open(&args.input).map_err(|source| Error::Open {
            path: args.input.clone(),
            source,
        })?;
        translate_reader(BufReader::new(file), &options, diagnostics)?
    };
    let document = translation.render();

    let write_error = |source: io::Error| Error::Write {
        path: args.output.clone(),
        source,
    };
    if is_std_stream(&args.output) {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(document.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(write_error)?;
    } else {
        fs::write(&args.output, document).map_err(write_error)?;
        println!("OK. Generated: {}", args.output.display());
    }

    log::debug!(
        "finished with {} diagnostic(s)",
        translation.diagnostics.len()
    );
    Ok(())
}

fn main() -> ExitCode {
    bootstrap();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            if err.print().is_err() {
                eprintln!("{err}");
            }
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EXIT_USAGE),
            };
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("fatal: {err:?}");
            eprintln!("Failure: {err}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
