//! Logging initialization for the scraper binary.
//!
//! Messages go to the terminal and are appended to the run history in
//! `<base>/logs/parser.log`, one `DD.MM.YYYY HH:MM:SS - [LEVEL] - message`
//! line per record.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use chrono::NaiveDateTime;
use indicatif::ProgressBar;
use log::{Level, LevelFilter, Log, Metadata, Record};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
};

pub const LOG_TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Initialize terminal logging plus the appending file logger at `log_file`.
///
/// Terminal lines are printed with `progress` suspended. A log file that
/// cannot be opened only costs the file half.
pub fn initialize(log_file: &Path, level: LevelFilter, progress: ProgressBar) {
    let config = build_config();
    let terminal = TermLogger::new(level, config.clone(), TerminalMode::Mixed, ColorChoice::Auto);
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![Box::new(BarAwareLogger {
        inner: terminal,
        bar: progress,
    })];
    if let Some(file_logger) = create_file_logger(log_file, level, config) {
        loggers.push(file_logger);
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .add_filter_allow_str("pydocs")
        .build()
}

fn create_file_logger(log_file: &Path, level: LevelFilter, config: Config) -> Option<Box<LineLogger>> {
    if let Some(dir) = log_file.parent() {
        if let Err(err) = fs::create_dir_all(dir) {
            eprintln!("Warning: Could not create log directory {:?}: {}", dir, err);
            return None;
        }
    }
    match OpenOptions::new().create(true).append(true).open(log_file) {
        Ok(file) => Some(Box::new(LineLogger::new(level, config, file))),
        Err(err) => {
            eprintln!("Warning: Could not open log file at {:?}: {}", log_file, err);
            None
        }
    }
}

pub fn format_line(timestamp: NaiveDateTime, level: Level, message: impl fmt::Display) -> String {
    format!(
        "{} - [{}] - {}",
        timestamp.format(LOG_TIMESTAMP_FORMAT),
        level,
        message
    )
}

/// Terminal logger that clears the progress bar while it writes.
pub struct BarAwareLogger {
    inner: Box<TermLogger>,
    bar: ProgressBar,
}

impl Log for BarAwareLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if self.inner.enabled(record.metadata()) {
            self.bar.suspend(|| self.inner.log(record));
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

impl SharedLogger for BarAwareLogger {
    fn level(&self) -> LevelFilter {
        self.inner.level()
    }

    fn config(&self) -> Option<&Config> {
        self.inner.config()
    }

    fn as_log(self: Box<Self>) -> Box<dyn Log> {
        Box::new(*self)
    }
}

/// File logger writing one [`format_line`] line per record.
pub struct LineLogger {
    level: LevelFilter,
    config: Config,
    file: Mutex<File>,
}

impl LineLogger {
    fn new(level: LevelFilter, config: Config, file: File) -> Self {
        Self {
            level,
            config,
            file: Mutex::new(file),
        }
    }
}

impl Log for LineLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level && metadata.target().starts_with("pydocs")
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(chrono::Local::now().naive_local(), record.level(), record.args());
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{line}");
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

impl SharedLogger for LineLogger {
    fn level(&self) -> LevelFilter {
        self.level
    }

    fn config(&self) -> Option<&Config> {
        Some(&self.config)
    }

    fn as_log(self: Box<Self>) -> Box<dyn Log> {
        Box::new(*self)
    }
}
