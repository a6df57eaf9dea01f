use std::path::PathBuf;
use std::process::ExitCode;

use arcoder_tools::{bench_files, compress_file, decompress_file, ToolResult};
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Adaptive range coder: compress, decompress and benchmark files.
#[derive(Parser, Debug)]
#[command(name = "arcoder", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress INPUT into OUTPUT
    Compress { input: PathBuf, output: PathBuf },
    /// Decompress INPUT (written by `compress`) into OUTPUT
    Decompress { input: PathBuf, output: PathBuf },
    /// Report ratio and timings for each file and verify the round trip
    Bench {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn run(cli: Cli) -> ToolResult<()> {
    match cli.command {
        Command::Compress { input, output } => compress_file(&input, &output),
        Command::Decompress { input, output } => decompress_file(&input, &output),
        Command::Bench { files } => {
            let stdout = std::io::stdout();
            let reports = bench_files(&files, &mut stdout.lock())?;
            if reports.iter().any(|report| !report.mismatches.is_empty()) {
                error!("round-trip mismatch detected");
            }
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            eprintln!("arcoder: {}", err);
            ExitCode::FAILURE
        }
    }
}
