//! Sequential candidate tester.
//!
//! Loads a wordlist into `.sieve/`, tests candidates one per tick and keeps
//! rejected ones in a bin. Runs pause on Ctrl-C and resume where they stopped.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sieve::core::types::Verdict;
use sieve::driver::DriverEvent;
use sieve::exit_codes;
use sieve::io::paths::{InitOptions, init_workspace};
use sieve::logging;
use sieve::session::{RunOptions, RunStop, load_wordlist, run_session, session_report};

#[derive(Parser)]
#[command(
    name = "sieve",
    version,
    about = "Sequential candidate tester with pause/resume"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `.sieve/` with a default config.
    Init {
        /// Overwrite an existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Import a wordlist and start a fresh session.
    Load {
        /// Text file, one candidate per line.
        file: PathBuf,
    },
    /// Test candidates of the session (or of FILE) until done or paused.
    Run {
        /// Load this wordlist first instead of resuming the saved session.
        file: Option<PathBuf>,
        /// Pause after this many candidates.
        #[arg(long)]
        pause_after: Option<NonZeroUsize>,
        /// Milliseconds between candidates (overrides config).
        #[arg(long)]
        interval_ms: Option<u64>,
    },
    /// Print progress and counts of the saved session.
    Stats,
    /// Print rejected candidates, one per line.
    Bin,
}

#[tokio::main]
async fn main() {
    logging::init();
    let code = match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let root = std::env::current_dir()?;
    match cli.command {
        Command::Init { force } => cmd_init(&root, force),
        Command::Load { file } => cmd_load(&root, &file),
        Command::Run {
            file,
            pause_after,
            interval_ms,
        } => {
            let options = RunOptions {
                source: file,
                pause_after,
                interval: interval_ms.map(Duration::from_millis),
            };
            cmd_run(&root, &options).await
        }
        Command::Stats => cmd_stats(&root),
        Command::Bin => cmd_bin(&root),
    }
}

fn cmd_init(root: &Path, force: bool) -> Result<i32> {
    let paths = init_workspace(root, &InitOptions { force })?;
    println!("init: config={}", paths.config_path.display());
    Ok(exit_codes::OK)
}

fn cmd_load(root: &Path, file: &Path) -> Result<i32> {
    let outcome = load_wordlist(root, file)?;
    println!("Loaded {} candidates.", outcome.total);
    Ok(exit_codes::OK)
}

async fn cmd_run(root: &Path, options: &RunOptions) -> Result<i32> {
    let outcome = run_session(root, options, ctrl_c(), print_event).await?;
    println!("{}", outcome.report.progress());
    println!("{}", outcome.report.stats_line());
    let code = match outcome.stop {
        RunStop::Complete => exit_codes::OK,
        RunStop::Paused => exit_codes::PAUSED,
        RunStop::Halted { reason } => {
            eprintln!("stopped: {reason}");
            exit_codes::PAUSED
        }
        RunStop::NothingToTest => exit_codes::NOTHING_TO_TEST,
    };
    Ok(code)
}

fn cmd_stats(root: &Path) -> Result<i32> {
    let report = session_report(root)?;
    println!("{}", report.progress());
    println!("{}", report.stats_line());
    Ok(exit_codes::OK)
}

fn cmd_bin(root: &Path) -> Result<i32> {
    let report = session_report(root)?;
    print!("{}", report.bin());
    Ok(exit_codes::OK)
}

fn print_event(event: &DriverEvent) {
    if let DriverEvent::Stepped {
        index,
        total,
        candidate,
        verdict,
    } = event
    {
        let label = match verdict {
            Verdict::Accepted => "accepted",
            Verdict::Rejected => "rejected",
        };
        println!("Testing candidate {}/{}: {} {}", index + 1, total, candidate, label);
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
