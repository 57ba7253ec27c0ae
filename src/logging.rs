//! Tracing setup. The TUI owns the terminal, so in TUI mode logs go to a file.

use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_NAME: &str = "resume-refiner.log";

/// Location of the TUI log file.
pub fn log_file_path() -> Option<std::path::PathBuf> {
    dirs::data_local_dir().map(|d| d.join("resume-refiner").join(LOG_FILE_NAME))
}

/// Initialize the global subscriber. `RUST_LOG` takes precedence over `default_filter`.
pub fn init(default_filter: &str, to_file: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let (writer, ansi) = if to_file {
        match open_log_file() {
            Some(file) => (BoxMakeWriter::new(Mutex::new(file)), false),
            None => (BoxMakeWriter::new(std::io::sink), false),
        }
    } else {
        (BoxMakeWriter::new(std::io::stderr), true)
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(ansi)
                .with_writer(writer),
        )
        .try_init();
}

fn open_log_file() -> Option<std::fs::File> {
    let path = log_file_path()?;
    std::fs::create_dir_all(path.parent()?).ok()?;
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .ok()
}
