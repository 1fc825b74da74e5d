use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ExpectedStatusTable;

pub const MAIN_DOC_URL: &str = "https://docs.python.org/3/";
pub const MAIN_PEPS_URL: &str = "https://peps.python.org/";
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Immutable settings handed to every extractor.
///
/// Missing fields in a config file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub main_doc_url: String,
    pub main_peps_url: String,
    /// Parent of the `downloads`, `results`, `logs` and `cache` directories.
    pub base_dir: PathBuf,
    /// Label used to decode every page, regardless of what the server declares.
    pub encoding: String,
    pub expected_status: ExpectedStatusTable,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            main_doc_url: MAIN_DOC_URL.to_string(),
            main_peps_url: MAIN_PEPS_URL.to_string(),
            base_dir: PathBuf::from("."),
            encoding: DEFAULT_ENCODING.to_string(),
            expected_status: ExpectedStatusTable::default(),
        }
    }
}

impl ScrapeConfig {
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.base_dir.join("downloads")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.base_dir.join("results")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join("parser.log")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.base_dir.join("cache")
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}
