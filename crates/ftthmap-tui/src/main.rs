//! `ftthmap-tui`: terminal map of FTTH availability.
//!
//! Built on [ratatui](https://ratatui.rs). Loads the address dataset once in
//! a background data bridge, then draws every visible address on a braille
//! canvas with a filter sidebar. Screens: Map and Addresses (keys 1-2).
//!
//! Logs are written to a file (default `/tmp/ftthmap-tui.log`) so they never
//! corrupt the terminal.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod map_layer;
mod screen;
mod screens;
mod theme;
mod tui;
mod viewport;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use ftthmap_config::SourceOverrides;

use crate::app::App;

/// Terminal map of FTTH availability across geocoded addresses.
#[derive(Parser, Debug)]
#[command(name = "ftthmap-tui", version, about)]
struct Cli {
    /// Data file URL or path (overrides any dataset profile)
    #[arg(short = 'd', long, env = "FTTHMAP_DATA")]
    data: Option<String>,

    /// Dataset profile from the config file
    #[arg(short = 'p', long, env = "FTTHMAP_DATASET")]
    dataset: Option<String>,

    /// Load timeout in seconds
    #[arg(long, env = "FTTHMAP_TIMEOUT")]
    timeout: Option<u64>,

    /// Log file path
    #[arg(long, default_value = "/tmp/ftthmap-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing. Hold the guard for the app's lifetime so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "ftthmap_tui={log_level},ftthmap_core={log_level},ftthmap_config={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("."));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("ftthmap-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal is touched.
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let cfg = ftthmap_config::load_config()?;
    let resolved = ftthmap_config::resolve_source(
        &cfg,
        SourceOverrides {
            data: cli.data.as_deref(),
            dataset: cli.dataset.as_deref(),
            timeout: cli.timeout,
        },
    )?;
    info!(
        source = %resolved.source,
        dataset = resolved.name.as_deref().unwrap_or("(none)"),
        "starting ftthmap-tui"
    );

    let mut app = App::new(resolved, cfg.map);
    app.run().await?;

    Ok(())
}
