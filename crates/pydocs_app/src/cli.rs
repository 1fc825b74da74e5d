use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use pydocs_core::{Mode, OutputMode};

/// Scrapes docs.python.org and peps.python.org into tables, CSV files or archives
#[derive(Parser, Debug)]
#[command(name = "pydocs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// What to scrape
    #[arg(value_enum)]
    pub mode: ModeArg,

    /// Render results as an aligned table or save them to a CSV file
    #[arg(short, long, value_enum)]
    pub output: Option<OutputArg>,

    /// Purge the response cache before running
    #[arg(short, long)]
    pub clear_cache: bool,

    /// RON file overriding URLs, directories, encoding or expected PEP statuses
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding downloads/, results/, logs/ and cache/
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Log debug messages as well
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    WhatsNew,
    LatestVersions,
    Download,
    Pep,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputArg {
    Pretty,
    File,
}

impl From<ModeArg> for Mode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::WhatsNew => Mode::WhatsNew,
            ModeArg::LatestVersions => Mode::LatestVersions,
            ModeArg::Download => Mode::Download,
            ModeArg::Pep => Mode::Pep,
        }
    }
}

impl Cli {
    pub fn mode(&self) -> Mode {
        self.mode.into()
    }

    pub fn output_mode(&self) -> OutputMode {
        match self.output {
            None => OutputMode::Console,
            Some(OutputArg::Pretty) => OutputMode::Pretty,
            Some(OutputArg::File) => OutputMode::File,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
