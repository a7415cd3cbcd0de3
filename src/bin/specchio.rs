//! Specchio CLI - periodic one-way directory mirroring.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use specchio::{MirrorBuilder, TracingSink};

/// Specchio - keep a replica folder identical to a source folder
#[derive(Parser)]
#[command(name = "specchio")]
#[command(version)]
#[command(about = "One-way periodic directory mirroring")]
#[command(long_about = None)]
struct Cli {
    /// Source folder path
    source: PathBuf,

    /// Replica folder path
    replica: PathBuf,

    /// Synchronization interval in seconds
    interval: u64,

    /// Log file path
    log_file: PathBuf,

    /// Skip symbolic links and special files
    #[arg(long)]
    skip_symlinks: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&cli.log_file)?;

    let mirror = MirrorBuilder::new().skip_symlinks(cli.skip_symlinks).build();
    let interval = Duration::from_secs(cli.interval);

    tracing::info!(
        source = %cli.source.display(),
        replica = %cli.replica.display(),
        interval_secs = cli.interval,
        "starting mirror loop"
    );

    // The engine exposes no timer; repeated invocation lives here.
    loop {
        let stats = mirror.sync(&cli.source, &cli.replica, &mut TracingSink::new());
        tracing::info!(
            dirs_created = stats.dirs_created,
            files_copied = stats.files_copied,
            files_removed = stats.files_removed,
            dirs_removed = stats.dirs_removed,
            errors = stats.errors,
            "pass complete"
        );
        thread::sleep(interval);
    }
}

/// Install a process-wide subscriber that appends to the configured log
/// file. Opened once at startup; flushed line by line.
fn init_logging(log_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .init();

    Ok(())
}
