//! Main entry point for the unwad CLI application.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use unwad::{ArchiveSource, Cli, ConsoleProgress, Error, WadExtractor, io};

/// Exit status for I/O and resource failures
const EXIT_IO: u8 = 3;
/// Exit status for malformed archives
const EXIT_FORMAT: u8 = 4;
/// Exit status for unsafe or undecodable entry names
const EXIT_PATH: u8 = 5;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(&cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Load, parse and list or extract. Returns `false` when some entries failed
/// under `--keep-going`.
async fn run(cli: &Cli) -> Result<bool> {
    let archive = io::open(&cli.file, cli.load_mode())?;
    let extractor = WadExtractor::new(archive, cli.parse_options());

    if cli.is_list() {
        list_files(&extractor, cli.verbose)?;
        return Ok(true);
    }

    let index = extractor.index()?;
    if !cli.quiet {
        println!("Found {} files", index.len());
    }

    let summary = extractor
        .extract(&index, &cli.extract_options(), &ConsoleProgress { quiet: cli.quiet })
        .await
        .with_context(|| format!("Extracting {}", cli.file.display()))?;

    for failure in &summary.failures {
        eprintln!("Error: entry {} ({}): {}", failure.index, failure.name, failure.error);
    }
    if !summary.is_success() {
        eprintln!(
            "{} of {} entries failed",
            summary.failures.len(),
            summary.files + summary.failures.len()
        );
    }

    Ok(summary.is_success())
}

/// List archive contents, either names only or a table with sizes and offsets.
fn list_files<S: ArchiveSource>(extractor: &WadExtractor<S>, verbose: bool) -> Result<()> {
    let index = extractor.index()?;

    if verbose {
        println!("{:>10}  {:>10}  Name", "Length", "Offset");
        println!("{}", "-".repeat(50));
    }

    for entry in &index.entries {
        if verbose {
            println!(
                "{:>10}  {:>10}  {}",
                entry.data_length,
                index.data_start as u64 + entry.data_offset as u64,
                entry.display_name()
            );
        } else {
            println!("{}", entry.display_name());
        }
    }

    if verbose {
        println!("{}", "-".repeat(50));
        println!("{:>10}  {:>10}  {} files", index.total_size(), "", index.len());
    }

    Ok(())
}

/// Map an error to a distinct process exit status.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<Error>() {
        Some(Error::Io(_) | Error::Resource { .. }) => EXIT_IO,
        Some(Error::Format(_)) => EXIT_FORMAT,
        Some(Error::Path(_)) => EXIT_PATH,
        None => 1,
    }
}
