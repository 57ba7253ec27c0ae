mod cli;
mod config;
mod engine;
mod error;
mod logging;
mod model;
mod orchestrator;
mod samples;
mod storage;
mod text_summary;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let is_silent = args.silent;
    let is_non_tui = !args.is_tui();

    // An explicit --config must load; a broken default config only produces a warning.
    let (settings, config_error) = match args.config.as_deref() {
        Some(path) => (config::Settings::load_from(path)?, None),
        None => match config::Settings::default_path() {
            Ok(path) => config::Settings::load_or_default(&path),
            Err(e) => (config::Settings::default(), Some(e)),
        },
    };

    // Only warnings by default; RUST_LOG or `log_level` in the config for more detail.
    logging::init(
        settings.log_level.as_deref().unwrap_or("warn"),
        cfg!(feature = "tui") && !is_non_tui,
    );
    if let Some(e) = config_error {
        tracing::warn!(error = %format!("{e:#}"), "ignoring unreadable config, using defaults");
    }

    match cli::run(args, settings).await {
        Ok(()) => {
            // Explicitly exit with code 0 on success, especially for non-TUI modes
            if is_non_tui {
                std::process::exit(0);
            }
            Ok(())
        }
        Err(e) => {
            if is_silent {
                println!("{:#}", e);
                std::process::exit(1);
            } else {
                Err(e)
            }
        }
    }
}
