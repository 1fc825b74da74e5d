use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use pydocs_core::{Mode, OutputMode, ScrapeConfig, Table};
use pydocs_logging::pydocs_info;
use thiserror::Error;

use crate::persist::{AtomicFileWriter, PersistError};

/// Timestamp embedded in result file names.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write to console: {0}")]
    Io(#[from] io::Error),
    #[error("failed to save results: {0}")]
    Persist(#[from] PersistError),
}

/// Each row on its own line, fields separated by a single space.
pub fn render_plain(table: &Table) -> String {
    let mut out = String::new();
    for row in table.to_string_rows() {
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    out
}

/// Left aligned box table with the header set off by a rule.
pub fn render_pretty(table: &Table) -> String {
    let rows = table.to_string_rows();
    let mut widths = vec![0usize; table.width()];
    for row in &rows {
        for (width, field) in widths.iter_mut().zip(row) {
            *width = (*width).max(field.chars().count());
        }
    }

    let rule = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line
    };

    let mut out = String::new();
    out.push_str(&rule);
    out.push('\n');
    for (idx, row) in rows.iter().enumerate() {
        out.push('|');
        for (field, width) in row.iter().zip(&widths) {
            let pad = width - field.chars().count();
            out.push(' ');
            out.push_str(field);
            out.push_str(&" ".repeat(pad + 1));
            out.push('|');
        }
        out.push('\n');
        if idx == 0 {
            out.push_str(&rule);
            out.push('\n');
        }
    }
    if rows.len() > 1 {
        out.push_str(&rule);
        out.push('\n');
    }
    out
}

/// Every field quoted, quotes doubled, `\n` line endings.
pub fn render_csv(table: &Table) -> String {
    let mut out = String::new();
    for row in table.to_string_rows() {
        let fields: Vec<String> = row
            .iter()
            .map(|field| format!("\"{}\"", field.replace('"', "\"\"")))
            .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

pub fn csv_file_name(mode: Mode, now: NaiveDateTime) -> String {
    format!("{}_{}.csv", mode, now.format(DATETIME_FORMAT))
}

pub fn write_csv(
    table: &Table,
    mode: Mode,
    results_dir: &Path,
    now: NaiveDateTime,
) -> Result<PathBuf, OutputError> {
    let writer = AtomicFileWriter::new(results_dir.to_path_buf());
    let path = writer.write(&csv_file_name(mode, now), render_csv(table))?;
    pydocs_info!("Results saved to file: {}", path.display());
    Ok(path)
}

/// Render `table` the way `output` asks. Returns the CSV path for file output.
pub fn control_output(
    table: &Table,
    output: OutputMode,
    mode: Mode,
    config: &ScrapeConfig,
    console: &mut dyn Write,
) -> Result<Option<PathBuf>, OutputError> {
    match output {
        OutputMode::Console => {
            console.write_all(render_plain(table).as_bytes())?;
            Ok(None)
        }
        OutputMode::Pretty => {
            console.write_all(render_pretty(table).as_bytes())?;
            Ok(None)
        }
        OutputMode::File => {
            let now = chrono::Local::now().naive_local();
            write_csv(table, mode, &config.results_dir(), now).map(Some)
        }
    }
}
