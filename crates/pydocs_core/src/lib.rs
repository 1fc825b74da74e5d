//! Scraper core: pure data model, configuration and text helpers.
mod census;
mod config;
mod mode;
mod status;
mod table;
mod text;

pub use census::StatusCensus;
pub use config::ScrapeConfig;
pub use mode::{Mode, OutputMode};
pub use status::ExpectedStatusTable;
pub use table::{ArityMismatch, Cell, Table};
pub use text::{collapse_newlines, dedupe_preserving_order, parse_version_status, VersionStatus};
