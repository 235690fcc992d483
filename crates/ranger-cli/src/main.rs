//! `ranger-tui` – live terminal viewer for the ultrasonic ranger array.
//!
//! 1. Loads `~/.ranger/config.toml` (if present), applies `RANGER_*`
//!    environment overrides, then command-line flags.
//! 2. Prints a one-off pre-read of the source so problems are visible even
//!    before the full-screen view starts.
//! 3. Runs the [`SamplingLoop`] against a crossterm terminal until `q`,
//!    Esc, Ctrl-C or SIGTERM.
//!
//! `--once` skips the terminal entirely and prints a single frame as JSON.

mod args;
mod config;
mod terminal;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use colored::Colorize;
use tracing::{error, info, warn};

use ranger_hal::{FileLineSource, LineSource};
use ranger_runtime::telemetry::{LogSink, init_tracing};
use ranger_runtime::SamplingLoop;
use ranger_types::RangerError;

use crate::args::Cli;
use crate::terminal::TerminalScreen;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Settings: defaults < file < env < flags ──────────────────────────
    let mut cfg = match config::load() {
        Ok(Some(cfg)) => cfg,
        Ok(None) => config::Config::default(),
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            config::Config::default()
        }
    };
    config::apply_env_overrides(&mut cfg);
    cli.apply(&mut cfg);

    // ── Structured logging ───────────────────────────────────────────────
    // The live view owns the terminal, so logs only reach stderr in --once
    // mode; otherwise they go to the log file or nowhere.
    let sink = match (&cfg.log_file, cli.once) {
        (Some(path), _) => LogSink::File(path.clone()),
        (None, true) => LogSink::Stderr,
        (None, false) => LogSink::Discard,
    };
    let _guard = init_tracing("ranger-tui", sink);

    if cli.write_config {
        return match config::save(&cfg) {
            Ok(()) => {
                println!(
                    "{} Config saved to {}",
                    "✓".green().bold(),
                    config::config_path().display().to_string().bold()
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                println!("{}: {}", "Error saving config".red(), e);
                ExitCode::FAILURE
            }
        };
    }

    let mut sampler = SamplingLoop::new(cfg.sampling(), Box::new(FileLineSource::new()));

    if cli.once {
        let frame = sampler.sample();
        return match serde_json::to_string_pretty(&frame) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "failed to serialise frame");
                ExitCode::FAILURE
            }
        };
    }

    print_initial_sample(&cfg.source_path);

    // ── Shutdown flag (SIGINT / SIGTERM) ─────────────────────────────────
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || shutdown_clone.store(true, Ordering::SeqCst)) {
        warn!(error = %e, "failed to install signal handler; use q to quit");
    }
    let mut sampler = sampler.with_shutdown(shutdown);

    // ── Terminal ─────────────────────────────────────────────────────────
    let mut screen = match TerminalScreen::setup() {
        Ok(screen) => screen,
        Err(e) => {
            eprintln!("{}: {}", "Failed to initialise terminal".red(), e);
            return ExitCode::FAILURE;
        }
    };
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        terminal::restore();
        original_hook(panic_info);
    }));

    let result = sampler.run(&mut screen);
    screen.teardown();

    match result {
        Ok(()) => {
            info!("viewer exited");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "viewer aborted");
            eprintln!("{}: {}", "Terminal error".red(), e);
            ExitCode::FAILURE
        }
    }
}

/// One-off read printed before the terminal switches to the live view.
fn print_initial_sample(path: &Path) {
    match FileLineSource::new().read_first_line(path) {
        Ok(line) => println!("{} initial sample: {}", "[i]".green(), line.trim()),
        Err(RangerError::SourceNotFound(_)) => println!(
            "{} source path not found: {}",
            "[w]".yellow(),
            path.display()
        ),
        Err(e) => println!("{} pre-read failed: {}", "[w]".yellow(), e),
    }
}
