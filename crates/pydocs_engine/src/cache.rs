//! On-disk response cache shared by every page request of a run.
//!
//! Each URL maps to `<key>.body` holding the raw response and `<key>.json`
//! holding its [`FetchMetadata`]. Keys are a hex prefix of the SHA-256 of
//! the URL.

use std::fs;
use std::io;
use std::path::PathBuf;

use pydocs_logging::{pydocs_debug, pydocs_info, pydocs_warn};
use sha2::{Digest, Sha256};

use crate::persist::{AtomicFileWriter, PersistError};
use crate::{FetchError, FetchMetadata, FetchOutput, Fetcher};

const KEY_BYTES: usize = 16;

pub fn cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(KEY_BYTES * 2);
    for byte in digest.iter().take(KEY_BYTES) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn get(&self, url: &str) -> Option<FetchOutput> {
        let key = cache_key(url);
        let body_path = self.dir.join(format!("{key}.body"));
        let meta_path = self.dir.join(format!("{key}.json"));

        let bytes = match fs::read(&body_path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                pydocs_warn!("Failed to read cached body {:?}: {}", body_path, err);
                return None;
            }
        };
        let metadata: FetchMetadata = match fs::read_to_string(&meta_path)
            .map_err(|err| err.to_string())
            .and_then(|text| serde_json::from_str(&text).map_err(|err| err.to_string()))
        {
            Ok(metadata) => metadata,
            Err(err) => {
                pydocs_warn!("Ignoring cache entry for {} ({:?}): {}", url, meta_path, err);
                return None;
            }
        };
        if metadata.original_url != url {
            pydocs_warn!("Cache key collision for {}, ignoring entry", url);
            return None;
        }
        Some(FetchOutput { bytes, metadata })
    }

    pub fn put(&self, output: &FetchOutput) -> Result<(), PersistError> {
        let key = cache_key(&output.metadata.original_url);
        let meta_name = format!("{key}.json");
        let metadata =
            serde_json::to_string(&output.metadata).map_err(|err| PersistError::Write {
                path: self.dir.join(&meta_name),
                source: io::Error::other(err),
            })?;
        let writer = AtomicFileWriter::new(self.dir.clone());
        writer.write(&format!("{key}.body"), &output.bytes)?;
        writer.write(&meta_name, metadata)?;
        Ok(())
    }

    /// Remove every cached response.
    pub fn clear(&self) -> Result<(), PersistError> {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => {
                pydocs_info!("Response cache cleared: {:?}", self.dir);
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistError::Remove {
                path: self.dir.clone(),
                source,
            }),
        }
    }
}

/// Serves repeat requests from a [`ResponseCache`] and stores fresh responses in it.
pub struct CachedFetcher<F> {
    inner: F,
    cache: ResponseCache,
}

impl<F: Fetcher> CachedFetcher<F> {
    pub fn new(inner: F, cache: ResponseCache) -> Self {
        Self { inner, cache }
    }
}

#[async_trait::async_trait]
impl<F: Fetcher> Fetcher for CachedFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        if let Some(hit) = self.cache.get(url) {
            pydocs_debug!("Cache hit for {}", url);
            return Ok(hit);
        }
        let output = self.inner.fetch(url).await?;
        if let Err(err) = self.cache.put(&output) {
            pydocs_warn!("Failed to cache response for {}: {}", url, err);
        }
        Ok(output)
    }
}
