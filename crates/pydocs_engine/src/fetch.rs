use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use pydocs_logging::pydocs_debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect, Response};

use crate::{FailureKind, FetchError, FetchMetadata, FetchOutput};

const USER_AGENT: &str = concat!("pydocs/", env!("CARGO_PKG_VERSION"));

/// Limits applied to a single request.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// `None` keeps the HTTP client's own behaviour.
    pub connect_timeout: Option<Duration>,
    /// `None` lets a request run as long as the server keeps it alive.
    pub request_timeout: Option<Duration>,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Media types accepted without parameters. Empty accepts anything.
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    /// Settings for documentation and PEP pages.
    fn default() -> Self {
        Self {
            connect_timeout: None,
            request_timeout: None,
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec!["text/html".into(), "application/xhtml+xml".into()],
        }
    }
}

impl FetchSettings {
    /// Settings for binary archives: any content type and a larger cap.
    pub fn for_downloads() -> Self {
        Self {
            max_bytes: 256 * 1024 * 1024,
            allowed_content_types: Vec::new(),
            ..Self::default()
        }
    }

    fn accepts(&self, content_type: &str) -> bool {
        let media_type = content_type.split(';').next().unwrap_or_default().trim();
        self.allowed_content_types.is_empty()
            || self
                .allowed_content_types
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(media_type))
    }
}

/// Source of raw response bodies. Extractors only see this seam.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError>;
}

/// Plain HTTP fetcher over reqwest with rustls.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    /// A client whose redirect policy reports the hop count into `hops`.
    fn client_for_request(&self, hops: Arc<AtomicUsize>) -> reqwest::Result<reqwest::Client> {
        let limit = self.settings.redirect_limit;
        let policy = redirect::Policy::custom(move |attempt| {
            let previous = attempt.previous().len();
            hops.store(previous, Ordering::Relaxed);
            if previous >= limit {
                attempt.error("redirect limit exceeded")
            } else {
                attempt.follow()
            }
        });
        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(policy);
        if let Some(timeout) = self.settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = self.settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    fn check_headers(&self, url: &str, response: &Response) -> Result<Option<String>, FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                url,
                status.to_string(),
            ));
        }
        if let Some(declared) = response.content_length() {
            if declared > self.settings.max_bytes {
                return Err(too_large(url, self.settings.max_bytes, declared));
            }
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        match content_type.as_deref() {
            Some(ct) if !self.settings.accepts(ct) => Err(FetchError::new(
                FailureKind::UnsupportedContentType {
                    content_type: ct.to_string(),
                },
                url,
                "unexpected content type",
            )),
            _ => Ok(content_type),
        }
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let target = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, url, err.to_string()))?;
        let hops = Arc::new(AtomicUsize::new(0));
        let client = self
            .client_for_request(Arc::clone(&hops))
            .map_err(|err| FetchError::new(FailureKind::Network, url, err.to_string()))?;

        pydocs_debug!("GET {}", url);
        let response = client
            .get(target)
            .send()
            .await
            .map_err(|err| classify(url, err))?;
        let content_type = self.check_headers(url, &response)?;
        let final_url = response.url().to_string();
        let bytes = read_capped(url, response, self.settings.max_bytes).await?;

        Ok(FetchOutput {
            metadata: FetchMetadata {
                original_url: url.to_string(),
                final_url,
                redirect_count: hops.load(Ordering::Relaxed),
                content_type,
                byte_len: bytes.len() as u64,
            },
            bytes,
        })
    }
}

/// Stream the body, failing as soon as it grows past `max_bytes`.
async fn read_capped(url: &str, response: Response, max_bytes: u64) -> Result<Vec<u8>, FetchError> {
    let mut body = Vec::new();
    let mut chunks = response.bytes_stream();
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.map_err(|err| classify(url, err))?;
        let received = (body.len() + chunk.len()) as u64;
        if received > max_bytes {
            return Err(too_large(url, max_bytes, received));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

fn too_large(url: &str, max_bytes: u64, actual: u64) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        url,
        "response exceeds size limit",
    )
}

fn classify(url: &str, err: reqwest::Error) -> FetchError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_redirect() {
        FailureKind::RedirectLimitExceeded
    } else {
        FailureKind::Network
    };
    FetchError::new(kind, url, err.to_string())
}
