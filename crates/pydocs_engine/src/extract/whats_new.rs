use pydocs_core::{collapse_newlines, Cell, Mode, ScrapeConfig, Table};
use scraper::Html;

use super::{flush_item_errors, ScrapeError};
use crate::document::{element_text, find_all, find_tag, join_url, load_document, AttrFilter};
use crate::{PageError, ProgressEvent, ProgressSink, Session};

pub const WHATS_NEW_HEADER: [&str; 3] = ["Ссылка на статью", "Заголовок", "Редактор, автор"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsNewEntry {
    pub url: String,
    pub heading: String,
    pub editors: String,
}

/// Absolute URLs of the per-version pages listed on the "What's New" index.
///
/// The outer error means the index itself is unusable. An inner error marks
/// one list item without a usable link; the others are still returned.
pub fn parse_whats_new_index(
    doc: &Html,
    index_url: &str,
) -> Result<Vec<Result<String, PageError>>, PageError> {
    let section = find_tag(
        doc.root_element(),
        "section",
        &[AttrFilter::id("what-s-new-in-python")],
    )?;
    let wrapper = find_tag(section, "div", &[AttrFilter::class("toctree-wrapper")])?;

    Ok(find_all(wrapper, "li", &[AttrFilter::class("toctree-l1")])
        .into_iter()
        .map(|item| {
            let link = find_tag(item, "a", &[])?;
            let href = link
                .value()
                .attr("href")
                .ok_or_else(|| PageError::MissingContent {
                    what: "release link",
                    url: index_url.to_string(),
                })?;
            join_url(index_url, href)
        })
        .collect())
}

pub fn parse_whats_new_entry(doc: &Html, url: &str) -> Result<WhatsNewEntry, PageError> {
    let root = doc.root_element();
    let heading = find_tag(root, "h1", &[])?;
    let editors = find_tag(root, "dl", &[])?;
    Ok(WhatsNewEntry {
        url: url.to_string(),
        heading: element_text(heading),
        editors: collapse_newlines(&element_text(editors)),
    })
}

async fn load_entry(
    session: &Session,
    config: &ScrapeConfig,
    url: &str,
) -> Result<WhatsNewEntry, PageError> {
    let doc = load_document(session.pages(), url, &config.encoding).await?;
    parse_whats_new_entry(&doc, url)
}

/// One row per Python release: detail page URL, heading and editors.
///
/// A release page that fails to load or parse is skipped; the index page failing aborts.
pub async fn whats_new(
    session: &Session,
    config: &ScrapeConfig,
    progress: &dyn ProgressSink,
) -> Result<Table, ScrapeError> {
    let index_url = join_url(&config.main_doc_url, "whatsnew/")?;
    let links = {
        let doc = load_document(session.pages(), &index_url, &config.encoding).await?;
        parse_whats_new_index(&doc, &index_url)?
    };

    let mut table = Table::new(WHATS_NEW_HEADER);
    let mut errors = Vec::new();
    let total = links.len();
    for (idx, link) in links.into_iter().enumerate() {
        progress.emit(ProgressEvent::Item {
            current: idx + 1,
            total,
            label: link.as_ref().unwrap_or(&index_url).clone(),
        });
        let entry = match link {
            Ok(url) => load_entry(session, config, &url).await,
            Err(err) => Err(err),
        };
        match entry {
            Ok(entry) => table.push_row(vec![
                Cell::Text(entry.url),
                Cell::Text(entry.heading),
                Cell::Text(entry.editors),
            ])?,
            Err(err) => errors.push(err),
        }
    }
    progress.emit(ProgressEvent::Finished { total });
    flush_item_errors(Mode::WhatsNew, &errors);
    Ok(table)
}
