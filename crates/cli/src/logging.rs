use anyhow::{Context as AnyhowContext, Result};
use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Crates whose debug output drowns the run log
const NOISY_MODULES: &[&str] = &["hyper", "hyper_util", "reqwest", "rustls", "h2"];

/// Echoes records to the console logger and appends them to the run log.
///
/// Each side has its own filter: `--quiet` and `RUST_LOG` only shape the
/// console, the run log always keeps `info` and above.
struct TeeLogger {
    console: env_logger::Logger,
    file_filter: env_logger::Logger,
    file: Mutex<File>,
}

impl Log for TeeLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.console.enabled(metadata) || self.file_filter.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.console.matches(record) {
            self.console.log(record);
        }
        if !self.file_filter.matches(record) {
            return;
        }
        if let Ok(mut file) = self.file.lock() {
            // best effort
            let _ = writeln!(file, "{}", format_line(record));
        }
    }

    fn flush(&self) {
        self.console.flush();
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

fn format_line(record: &Record) -> String {
    format!(
        "{} {:<5} {}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        record.level(),
        record.args()
    )
}

fn console_logger(verbose: bool, quiet: bool) -> env_logger::Logger {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if quiet {
        builder.filter_level(LevelFilter::Warn);
    } else if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    for module in NOISY_MODULES {
        builder.filter_module(module, LevelFilter::Warn);
    }
    builder.target(env_logger::Target::Stderr);
    builder.build()
}

fn file_filter(verbose: bool) -> env_logger::Logger {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
    for module in NOISY_MODULES {
        builder.filter_module(module, LevelFilter::Warn);
    }
    builder.build()
}

/// Install the process logger: stderr via env_logger plus an append-only
/// copy in `log_path`. `RUST_LOG` still overrides the console filter.
pub(crate) fn init(verbose: bool, quiet: bool, log_path: &Path) -> Result<()> {
    let console = console_logger(verbose, quiet);
    let file_filter = file_filter(verbose);
    let max_level = console.filter().max(file_filter.filter());

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open run log {}", log_path.display()))?;

    log::set_boxed_logger(Box::new(TeeLogger {
        console,
        file_filter,
        file: Mutex::new(file),
    }))
    .context("Logger already initialized")?;
    log::set_max_level(max_level);
    Ok(())
}
