use std::path::PathBuf;
use std::sync::LazyLock;

use pydocs_core::ScrapeConfig;
use pydocs_logging::pydocs_info;
use regex::Regex;
use scraper::Html;
use url::Url;

use super::ScrapeError;
use crate::document::{find_tag, join_url, load_document, AttrFilter};
use crate::persist::{ensure_output_dir, AtomicFileWriter};
use crate::{PageError, Session};

static PDF_A4_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".+pdf-a4\.zip$").expect("valid archive regex"));

/// The href of the A4 PDF archive in the downloads table.
pub fn find_pdf_a4_href(doc: &Html) -> Result<String, PageError> {
    let table = find_tag(
        doc.root_element(),
        "table",
        &[AttrFilter::class("docutils")],
    )?;
    let link = find_tag(table, "a", &[AttrFilter::pattern("href", &PDF_A4_HREF)])?;
    // The href filter above guarantees the attribute.
    Ok(link.value().attr("href").unwrap_or_default().to_string())
}

fn archive_file_name(archive_url: &str) -> Option<String> {
    let url = Url::parse(archive_url).ok()?;
    url.path_segments()?
        .next_back()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Save the A4 PDF documentation archive under the downloads directory.
pub async fn download(session: &Session, config: &ScrapeConfig) -> Result<PathBuf, ScrapeError> {
    let downloads_url = join_url(&config.main_doc_url, "download.html")?;
    let href = {
        let doc = load_document(session.pages(), &downloads_url, &config.encoding).await?;
        find_pdf_a4_href(&doc)?
    };
    let archive_url = join_url(&downloads_url, &href)?;
    let filename = archive_file_name(&archive_url).ok_or_else(|| PageError::MissingContent {
        what: "archive file name",
        url: archive_url.clone(),
    })?;

    let downloads_dir = config.downloads_dir();
    ensure_output_dir(&downloads_dir)?;
    let archive = session
        .downloads()
        .fetch(&archive_url)
        .await
        .map_err(PageError::from)?;
    let path = AtomicFileWriter::new(downloads_dir).write(&filename, &archive.bytes)?;
    pydocs_info!("Archive downloaded and saved: {}", path.display());
    Ok(path)
}
