use pydocs_core::{parse_version_status, Cell, ScrapeConfig, Table, VersionStatus};
use scraper::Html;

use super::ScrapeError;
use crate::document::{element_text, find_all, find_tag, load_document, AttrFilter};
use crate::{PageError, Session};

pub const LATEST_VERSIONS_HEADER: [&str; 3] = ["Ссылка на документацию", "Версия", "Статус"];
const ALL_VERSIONS_MARKER: &str = "All versions";

/// `(href, version/status)` for every link of the sidebar's "All versions" list.
pub fn parse_version_links(
    doc: &Html,
    url: &str,
) -> Result<Vec<(String, VersionStatus)>, PageError> {
    let sidebar = find_tag(
        doc.root_element(),
        "div",
        &[AttrFilter::class("sphinxsidebarwrapper")],
    )?;
    let versions_list = find_all(sidebar, "ul", &[])
        .into_iter()
        .find(|list| element_text(*list).contains(ALL_VERSIONS_MARKER))
        .ok_or_else(|| PageError::MissingContent {
            what: "version list",
            url: url.to_string(),
        })?;

    find_all(versions_list, "a", &[])
        .into_iter()
        .map(|link| {
            let href = link
                .value()
                .attr("href")
                .ok_or_else(|| PageError::MissingContent {
                    what: "version link",
                    url: url.to_string(),
                })?;
            Ok((href.to_string(), parse_version_status(&element_text(link))))
        })
        .collect()
}

pub async fn latest_versions(
    session: &Session,
    config: &ScrapeConfig,
) -> Result<Table, ScrapeError> {
    let url = config.main_doc_url.as_str();
    let links = {
        let doc = load_document(session.pages(), url, &config.encoding).await?;
        parse_version_links(&doc, url)?
    };

    let mut table = Table::new(LATEST_VERSIONS_HEADER);
    for (href, VersionStatus { version, status }) in links {
        table.push_row(vec![Cell::Text(href), Cell::Text(version), Cell::Text(status)])?;
    }
    Ok(table)
}
