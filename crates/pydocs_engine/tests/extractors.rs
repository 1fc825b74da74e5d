mod common;

use common::*;
use pretty_assertions::assert_eq;
use pydocs_core::{Cell, Mode, Table};
use pydocs_engine::{
    download, latest_versions, pep, run_mode, whats_new, FailureKind, FetchSettings,
    NullProgressSink, PageError, ProgressEvent, ResponseCache, ScrapeError, Session,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn text_row(fields: &[&str]) -> Vec<Cell> {
    fields.iter().map(|field| Cell::from(*field)).collect()
}

#[tokio::test]
async fn latest_versions_builds_rows_from_sidebar() {
    init_logging();
    let server = MockServer::start().await;
    mount_page(&server, "/3/", DOCS_INDEX).await;
    let temp = TempDir::new().unwrap();
    let config = config_for(&server, temp.path());

    let table = latest_versions(&uncached_session(), &config).await.unwrap();

    let mut expected = Table::new(["Ссылка на документацию", "Версия", "Статус"]);
    for row in [
        ["https://docs.python.org/3.11/", "3.11", "security"],
        ["https://docs.python.org/3.12/", "3.12", "bugfix"],
        ["https://www.python.org/doc/versions/", "legacy", ""],
    ] {
        expected.push_row(text_row(&row)).unwrap();
    }
    assert_eq!(table, expected);
}

#[tokio::test]
async fn whats_new_skips_items_that_fail_to_load_or_parse() {
    init_logging();
    let server = MockServer::start().await;
    mount_page(&server, "/3/whatsnew/", WHATSNEW_INDEX).await;
    mount_page(&server, "/3/whatsnew/3.12.html", WHATSNEW_3_12).await;
    mount_page(&server, "/3/whatsnew/3.10.html", WHATSNEW_3_10).await;
    // 3.11 is not mounted and answers 404.
    let temp = TempDir::new().unwrap();
    let config = config_for(&server, temp.path());
    let sink = RecordingSink::new();

    let table = whats_new(&uncached_session(), &config, &sink).await.unwrap();

    let url = format!("{}/3/whatsnew/3.12.html", server.uri());
    assert_eq!(table.header(), ["Ссылка на статью", "Заголовок", "Редактор, автор"]);
    assert_eq!(
        table.rows(),
        [text_row(&[
            url.as_str(),
            "What’s New In Python 3.12",
            " Editor: Adam Turner ",
        ])]
    );

    let events = sink.take();
    assert_eq!(events.len(), 4);
    assert_eq!(events.last(), Some(&ProgressEvent::Finished { total: 3 }));
}

#[tokio::test]
async fn whats_new_index_failure_aborts_the_run() {
    init_logging();
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let config = config_for(&server, temp.path());

    let err = whats_new(&uncached_session(), &config, &NullProgressSink)
        .await
        .unwrap_err();
    match err {
        ScrapeError::Page(PageError::Fetch(fetch)) => {
            assert_eq!(fetch.kind, FailureKind::HttpStatus(404));
        }
        other => panic!("expected fetch failure, got {other:?}"),
    }
}

#[tokio::test]
async fn pep_census_counts_statuses_and_skips_missing_pages() {
    init_logging();
    let server = MockServer::start().await;
    mount_page(&server, "/peps/", PEP_INDEX).await;
    mount_page(&server, "/peps/pep-0001/", PEP_0001).await;
    mount_page(&server, "/peps/pep-0008/", PEP_0008).await;
    mount_page(&server, "/peps/pep-0999/", PEP_0999).await;
    let temp = TempDir::new().unwrap();
    let config = config_for(&server, temp.path());
    let sink = RecordingSink::new();

    let table = pep(&uncached_session(), &config, &sink).await.unwrap();

    assert_eq!(table.header(), ["Статус", "Количество"]);
    assert_eq!(
        table.rows(),
        [
            vec![Cell::from("Active"), Cell::Count(1)],
            vec![Cell::from("Final"), Cell::Count(1)],
            vec![Cell::from("Withdrawn"), Cell::Count(1)],
            vec![Cell::from("Total"), Cell::Count(3)],
        ]
    );
    let items = sink
        .take()
        .into_iter()
        .filter(|event| matches!(event, ProgressEvent::Item { .. }))
        .count();
    assert_eq!(items, 4);
}

#[tokio::test]
async fn pep_census_skips_pages_without_a_status_field() {
    init_logging();
    let server = MockServer::start().await;
    mount_page(&server, "/peps/", PEP_INDEX).await;
    mount_page(&server, "/peps/pep-0001/", PEP_0001).await;
    mount_page(
        &server,
        "/peps/pep-0008/",
        "<html><body><h1>PEP 8</h1><p>Header list moved away</p></body></html>",
    )
    .await;
    mount_page(&server, "/peps/pep-0999/", PEP_0999).await;
    mount_page(
        &server,
        "/peps/pep-0404/",
        "<html><body><dl><dt>Author</dt><dd>Barry Warsaw</dd></dl></body></html>",
    )
    .await;
    let temp = TempDir::new().unwrap();
    let config = config_for(&server, temp.path());

    let table = pep(&uncached_session(), &config, &NullProgressSink)
        .await
        .unwrap();

    assert_eq!(
        table.rows(),
        [
            vec![Cell::from("Active"), Cell::Count(1)],
            vec![Cell::from("Withdrawn"), Cell::Count(1)],
            vec![Cell::from("Total"), Cell::Count(2)],
        ]
    );
}

#[tokio::test]
async fn download_saves_archive_named_after_url() {
    init_logging();
    let server = MockServer::start().await;
    mount_page(&server, "/3/download.html", DOWNLOAD).await;
    let archive = b"PK\x03\x04 not really a zip".to_vec();
    Mock::given(method("GET"))
        .and(path("/3/archives/python-3.12.1-docs-pdf-a4.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(archive.clone(), "application/zip"))
        .expect(1)
        .mount(&server)
        .await;
    let temp = TempDir::new().unwrap();
    let config = config_for(&server, temp.path());

    let saved = download(&uncached_session(), &config).await.unwrap();

    assert_eq!(
        saved,
        temp.path().join("downloads").join("python-3.12.1-docs-pdf-a4.zip")
    );
    assert_eq!(std::fs::read(&saved).unwrap(), archive);
}

#[tokio::test]
async fn download_mode_renders_nothing() {
    init_logging();
    let server = MockServer::start().await;
    mount_page(&server, "/3/download.html", DOWNLOAD).await;
    Mock::given(method("GET"))
        .and(path("/3/archives/python-3.12.1-docs-pdf-a4.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"zip".to_vec(), "application/zip"))
        .mount(&server)
        .await;
    let temp = TempDir::new().unwrap();
    let config = config_for(&server, temp.path());

    let result = run_mode(Mode::Download, &uncached_session(), &config, &NullProgressSink)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn cached_session_serves_repeat_runs_identically() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/"))
        .respond_with(html(DOCS_INDEX))
        .expect(1)
        .mount(&server)
        .await;
    let temp = TempDir::new().unwrap();
    let config = config_for(&server, temp.path());
    let cache = ResponseCache::new(config.cache_dir());
    let session = Session::new(
        cache.clone(),
        FetchSettings::default(),
        FetchSettings::for_downloads(),
    );

    let first = run_mode(Mode::LatestVersions, &session, &config, &NullProgressSink)
        .await
        .unwrap();
    let second = run_mode(Mode::LatestVersions, &session, &config, &NullProgressSink)
        .await
        .unwrap();

    assert!(first.is_some());
    assert_eq!(first, second);
    assert!(cache.get(&config.main_doc_url).is_some());

    session.clear_cache().unwrap();
    assert!(!config.cache_dir().exists());
    assert!(cache.get(&config.main_doc_url).is_none());
}
