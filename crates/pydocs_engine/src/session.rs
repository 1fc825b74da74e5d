use crate::cache::{CachedFetcher, ResponseCache};
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::persist::PersistError;

/// HTTP access for one run: a cached fetcher for pages and a plain one for archives.
pub struct Session {
    pages: Box<dyn Fetcher>,
    downloads: Box<dyn Fetcher>,
    cache: Option<ResponseCache>,
}

impl Session {
    /// Pages go through the on-disk cache at `cache`, downloads never do.
    pub fn new(
        cache: ResponseCache,
        page_settings: FetchSettings,
        download_settings: FetchSettings,
    ) -> Self {
        let pages = CachedFetcher::new(ReqwestFetcher::new(page_settings), cache.clone());
        Self {
            pages: Box::new(pages),
            downloads: Box::new(ReqwestFetcher::new(download_settings)),
            cache: Some(cache),
        }
    }

    /// Session over arbitrary fetchers, without a cache to clear.
    pub fn from_fetchers(pages: Box<dyn Fetcher>, downloads: Box<dyn Fetcher>) -> Self {
        Self {
            pages,
            downloads,
            cache: None,
        }
    }

    pub fn pages(&self) -> &dyn Fetcher {
        self.pages.as_ref()
    }

    pub fn downloads(&self) -> &dyn Fetcher {
        self.downloads.as_ref()
    }

    pub fn clear_cache(&self) -> Result<(), PersistError> {
        match &self.cache {
            Some(cache) => cache.clear(),
            None => Ok(()),
        }
    }
}
