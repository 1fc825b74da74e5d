//! The four scraping modes and their shared plumbing.
mod download;
mod latest_versions;
mod pep;
mod whats_new;

use pydocs_core::{ArityMismatch, Mode, ScrapeConfig, Table};
use pydocs_logging::pydocs_error;

use crate::persist::PersistError;
use crate::{PageError, ProgressSink, Session};

pub use download::{download, find_pdf_a4_href};
pub use latest_versions::{latest_versions, parse_version_links};
pub use pep::{parse_pep_index, parse_pep_status, pep, PepIndexEntry};
pub use whats_new::{parse_whats_new_entry, parse_whats_new_index, whats_new, WhatsNewEntry};

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Page(#[from] PageError),
    #[error("malformed result table: {0}")]
    Table(#[from] ArityMismatch),
    #[error("failed to save file: {0}")]
    Persist(#[from] PersistError),
}

/// Run the extractor for `mode`. `None` means the mode produced no table.
pub async fn run_mode(
    mode: Mode,
    session: &Session,
    config: &ScrapeConfig,
    progress: &dyn ProgressSink,
) -> Result<Option<Table>, ScrapeError> {
    match mode {
        Mode::WhatsNew => whats_new(session, config, progress).await.map(Some),
        Mode::LatestVersions => latest_versions(session, config).await.map(Some),
        Mode::Download => download(session, config).await.map(|_| None),
        Mode::Pep => pep(session, config, progress).await.map(Some),
    }
}

/// Flush the errors collected while skipping items as one log entry.
fn flush_item_errors(mode: Mode, errors: &[PageError]) {
    if errors.is_empty() {
        return;
    }
    let lines: Vec<String> = errors.iter().map(|err| format!("  - {err}")).collect();
    pydocs_error!(
        "{} skipped {} item(s):\n{}",
        mode,
        errors.len(),
        lines.join("\n")
    );
}
