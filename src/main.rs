// src/main.rs
//! binload-unpack
//!
//! Command-line front end: converts a hybrid binary load file with
//! LZ4-compressed segments into a plain binary load file.
//!
//! ```bash
//! binload-unpack game.xex game-plain.xex
//! binload-unpack --strict-lz4 -v game.xex game-plain.xex
//! ```
//!
//! Segment trace lines and diagnostics go to standard output. The log
//! filter can be overridden with `RUST_LOG`.

use anyhow::{Context, Result};
use binload_lz4::{convert_file, BlockEnd, ConvertOptions};
use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "binload-unpack", version)]
#[command(about = "LZ4 Hybrid Binary Load File Decompressor", long_about = None)]
struct Cli {
    /// Hybrid binary load file to read
    input: PathBuf,

    /// Plain binary load file to write
    output: PathBuf,

    /// Only accept LZ4 blocks that end at end of input (no zero-offset end mark)
    #[arg(long)]
    strict_lz4: bool,

    /// Only print warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print decoder details
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    fn options(&self) -> ConvertOptions {
        let block_end = if self.strict_lz4 {
            BlockEnd::EndOfInput
        } else {
            BlockEnd::ZeroOffset
        };
        ConvertOptions::new().with_block_end(block_end)
    }
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_target(false)
        .without_time()
        .try_init();
}

fn run(cli: &Cli) -> Result<()> {
    let report = convert_file(&cli.input, &cli.output, &cli.options())
        .with_context(|| format!("Failed to convert {}", cli.input.display()))?;

    info!(
        "Wrote {} ({} segments, {} decompressed, {} bytes)",
        cli.output.display(),
        report.segments.len() - report.dropped_segments(),
        report.compressed_segments(),
        report.bytes_written
    );
    Ok(())
}

/// Clap's text for a parse failure, and whether it is a real error
/// rather than a help or version request
fn usage_message(e: &clap::Error) -> (String, bool) {
    let is_error = !matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion);
    (e.render().to_string(), is_error)
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let (message, is_error) = usage_message(&e);
            if !is_error {
                print!("{}", message);
                return ExitCode::SUCCESS;
            }
            init_tracing("info");
            error!("{}", message.trim_end());
            return ExitCode::FAILURE;
        }
    };
    init_tracing(cli.log_level());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
