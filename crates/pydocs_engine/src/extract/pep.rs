use std::collections::HashMap;

use pydocs_core::{dedupe_preserving_order, Mode, ScrapeConfig, StatusCensus, Table};
use pydocs_logging::pydocs_info;
use scraper::{ElementRef, Html};

use super::{flush_item_errors, ScrapeError};
use crate::document::{element_text, find_all, find_tag, join_url, load_document, AttrFilter};
use crate::{PageError, ProgressEvent, ProgressSink, Session};

/// A PEP listed in the category index, with the abbreviation shown next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PepIndexEntry {
    /// Type letter followed by the status letter, e.g. `SF`; `I` has no status letter.
    pub abbr: String,
    pub url: String,
}

impl PepIndexEntry {
    /// The abbreviation without its leading type letter.
    pub fn status_code(&self) -> &str {
        let mut chars = self.abbr.chars();
        chars.next();
        chars.as_str()
    }
}

/// PEPs of the "index by category" section, each paired with the abbreviation
/// from its own table row. A PEP listed in several categories appears once.
pub fn parse_pep_index(doc: &Html, index_url: &str) -> Result<Vec<PepIndexEntry>, PageError> {
    let section = find_tag(
        doc.root_element(),
        "section",
        &[AttrFilter::id("index-by-category")],
    )?;

    let mut abbr_by_url = HashMap::new();
    let mut urls = Vec::new();
    for row in find_all(section, "tr", &[]) {
        let Some(abbr) = find_all(row, "abbr", &[]).into_iter().next() else {
            continue;
        };
        let Some(href) = find_all(row, "a", &[AttrFilter::class("pep reference internal")])
            .into_iter()
            .find_map(|link| link.value().attr("href"))
        else {
            continue;
        };
        let url = join_url(index_url, href)?;
        abbr_by_url
            .entry(url.clone())
            .or_insert_with(|| element_text(abbr).trim().to_string());
        urls.push(url);
    }

    Ok(dedupe_preserving_order(urls)
        .into_iter()
        .map(|url| PepIndexEntry {
            abbr: abbr_by_url.remove(&url).unwrap_or_default(),
            url,
        })
        .collect())
}

/// Status shown on a PEP page: the first `dd` of the header list holding an `abbr`.
pub fn parse_pep_status(doc: &Html, url: &str) -> Result<String, PageError> {
    let fields = find_tag(doc.root_element(), "dl", &[])?;
    fields
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "dd")
        .find(|dd| !find_all(*dd, "abbr", &[]).is_empty())
        .map(|dd| element_text(dd).trim().to_string())
        .ok_or_else(|| PageError::MissingContent {
            what: "status field",
            url: url.to_string(),
        })
}

async fn load_status(
    session: &Session,
    config: &ScrapeConfig,
    url: &str,
) -> Result<String, PageError> {
    let doc = load_document(session.pages(), url, &config.encoding).await?;
    parse_pep_status(&doc, url)
}

/// Count PEPs per status as shown on their own pages.
///
/// A status that disagrees with the index abbreviation is logged and still counted.
pub async fn pep(
    session: &Session,
    config: &ScrapeConfig,
    progress: &dyn ProgressSink,
) -> Result<Table, ScrapeError> {
    let index_url = config.main_peps_url.as_str();
    let entries = {
        let doc = load_document(session.pages(), index_url, &config.encoding).await?;
        parse_pep_index(&doc, index_url)?
    };

    let mut census = StatusCensus::new();
    let mut errors = Vec::new();
    let total = entries.len();
    for (idx, entry) in entries.iter().enumerate() {
        progress.emit(ProgressEvent::Item {
            current: idx + 1,
            total,
            label: entry.url.clone(),
        });
        let status = match load_status(session, config, &entry.url).await {
            Ok(status) => status,
            Err(err) => {
                errors.push(err);
                continue;
            }
        };
        let code = entry.status_code();
        if !config.expected_status.is_expected(code, &status) {
            pydocs_info!(
                "Mismatched statuses:\n{}\nStatus on card: {}\nExpected statuses: {:?}",
                entry.url,
                status,
                config.expected_status.expected(code)
            );
        }
        census.record(&status);
    }
    progress.emit(ProgressEvent::Finished { total });
    flush_item_errors(Mode::Pep, &errors);
    Ok(census.into_table())
}
