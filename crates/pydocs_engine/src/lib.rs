//! Scraper engine: fetching, caching, HTML lookup, extractors and output.
mod cache;
mod decode;
mod document;
mod extract;
mod fetch;
mod output;
mod persist;
mod progress;
mod session;
mod types;

pub use cache::{cache_key, CachedFetcher, ResponseCache};
pub use decode::{decode_with_label, DecodedHtml};
pub use document::{
    element_text, find_all, find_tag, join_url, load_document, AttrFilter, AttrMatch,
};
pub use extract::{
    download, find_pdf_a4_href, latest_versions, parse_pep_index, parse_pep_status,
    parse_version_links, parse_whats_new_entry, parse_whats_new_index, pep, run_mode, whats_new,
    PepIndexEntry, ScrapeError, WhatsNewEntry,
};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use output::{
    control_output, csv_file_name, render_csv, render_plain, render_pretty, write_csv,
    OutputError, DATETIME_FORMAT,
};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use progress::{NullProgressSink, ProgressEvent, ProgressSink, TerminalProgressSink};
pub use session::Session;
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput, PageError, TagNotFound};
