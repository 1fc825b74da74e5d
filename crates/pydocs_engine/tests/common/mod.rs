#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex, Once};

use pydocs_core::ScrapeConfig;
use pydocs_engine::{FetchSettings, ProgressEvent, ProgressSink, ReqwestFetcher, Session};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const WHATSNEW_INDEX: &str = include_str!("../fixtures/whatsnew_index.html");
pub const WHATSNEW_3_12: &str = include_str!("../fixtures/whatsnew_3_12.html");
pub const WHATSNEW_3_10: &str = include_str!("../fixtures/whatsnew_3_10.html");
pub const DOCS_INDEX: &str = include_str!("../fixtures/docs_index.html");
pub const DOWNLOAD: &str = include_str!("../fixtures/download.html");
pub const PEP_INDEX: &str = include_str!("../fixtures/pep_index.html");
pub const PEP_0001: &str = include_str!("../fixtures/pep_0001.html");
pub const PEP_0008: &str = include_str!("../fixtures/pep_0008.html");
pub const PEP_0999: &str = include_str!("../fixtures/pep_0999.html");

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(pydocs_logging::initialize_for_tests);
}

pub fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html; charset=utf-8")
}

pub async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Python docs under `/3/`, PEP index under `/peps/`, files under `base_dir`.
pub fn config_for(server: &MockServer, base_dir: &Path) -> ScrapeConfig {
    ScrapeConfig {
        main_doc_url: format!("{}/3/", server.uri()),
        main_peps_url: format!("{}/peps/", server.uri()),
        ..ScrapeConfig::default()
    }
    .with_base_dir(base_dir)
}

pub fn uncached_session() -> Session {
    Session::from_fetchers(
        Box::new(ReqwestFetcher::new(FetchSettings::default())),
        Box::new(ReqwestFetcher::new(FetchSettings::for_downloads())),
    )
}

#[derive(Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}
