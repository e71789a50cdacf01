use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser};
use drng_dump::{exit_codes, logger, CollectionError, Collector, HardwareEntropySource, OutputStream};

/// Write raw 64-bit words from the CPU's hardware random number generator to a file.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Number of 64-bit words to write
    word_count: u64,

    /// File to create, or truncate if it exists
    #[arg(value_parser = parse_output_path)]
    output_path: PathBuf,

    /// Log more (repeat for more detail)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Log nothing
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn parse_output_path(s: &str) -> Result<PathBuf, String> {
    if s.is_empty() {
        return Err("output path must not be empty".to_string());
    }
    Ok(PathBuf::from(s))
}

#[derive(Debug)]
struct UnsupportedCpu;

impl fmt::Display for UnsupportedCpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("this CPU does not support the rdrand instruction")
    }
}

impl std::error::Error for UnsupportedCpu {}

fn main() -> ExitCode {
    // Usage errors exit here with clap's status 2.
    let args = Args::parse();

    if let Err(e) = logger::init(logger::level_from_verbosity(args.verbose, args.quiet)) {
        eprintln!("failed to initialize logging: {}", e);
    }

    match run(&args) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS),
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let source = HardwareEntropySource::rdrand().ok_or(UnsupportedCpu)?;
    let mut sink = open(&args.output_path)?;

    Collector::new(source)
        .run(args.word_count, &mut sink)
        .with_context(|| format!("writing {}", args.output_path.display()))
}

fn open(path: &Path) -> anyhow::Result<OutputStream> {
    OutputStream::open(path)
        .with_context(|| format!("cannot open {} for writing", path.display()))
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    if let Some(CollectionError::HardwareExhausted { .. }) = err.downcast_ref::<CollectionError>() {
        exit_codes::HARDWARE_EXHAUSTED
    } else if err.is::<UnsupportedCpu>() {
        exit_codes::UNSUPPORTED_CPU
    } else {
        exit_codes::IO_FAILURE
    }
}
