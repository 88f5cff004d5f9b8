use crate::error::{Error, Result};
use crate::extract;
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};

/// Statistics gathered for one requested URL.
///
/// When `error` is set the content counts are zero. `status_code` and
/// `response_time` are only present if a response actually arrived.
#[derive(Debug, Default)]
pub struct PageResult {
    /// The normalized URL that was requested.
    pub url: String,
    pub word_count: usize,
    pub image_count: usize,
    pub link_count: usize,
    pub status_code: Option<u16>,
    /// Time from dispatching the request until the response headers arrived.
    pub response_time: Option<Duration>,
    pub error: Option<Error>,
}

impl PageResult {
    pub fn failed(url: String, error: Error) -> Self {
        Self {
            url,
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Prepends `http://` when `url` does not already start with `http`.
///
/// No other validation happens here; malformed URLs surface as transport
/// errors from the HTTP client.
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Produces the result for a single URL. Failures are carried in the
    /// returned `PageResult`, never raised.
    async fn analyze(&self, url: String) -> PageResult;
}

pub struct HttpAnalyzer {
    client: Client,
}

impl HttpAnalyzer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds an analyzer on a client with reqwest's defaults plus the given overrides.
    pub fn with_options(timeout: Option<Duration>, user_agent: Option<&str>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = user_agent {
            builder = builder.user_agent(user_agent.to_string());
        }
        let client = builder.build().map_err(Error::Client)?;
        Ok(Self::new(client))
    }
}

impl Default for HttpAnalyzer {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

#[async_trait]
impl Analyzer for HttpAnalyzer {
    async fn analyze(&self, url: String) -> PageResult {
        let url = normalize_url(&url);
        log::info!("Visiting: {}", url);

        let start = Instant::now();
        let res = match self.client.get(&url).send().await {
            Ok(res) => res,
            Err(e) => {
                log::warn!("Request to {} failed: {}", url, e);
                return PageResult::failed(url, Error::Transport(e));
            }
        };
        let response_time = start.elapsed();
        let status = res.status();

        // Decoded by the Content-Type charset; undecodable bytes become U+FFFD.
        let html = match res.text().await {
            Ok(html) => html,
            Err(e) => {
                log::warn!("Reading body of {} failed: {}", url, e);
                return PageResult::failed(url, Error::BodyRead(e));
            }
        };
        log::debug!("HTML length: {} bytes", html.len());

        let content = extract::extract(&html);
        let result = PageResult {
            url,
            word_count: content.word_count(),
            image_count: content.image_count,
            link_count: content.link_count,
            status_code: Some(status.as_u16()),
            response_time: Some(response_time),
            error: None,
        };

        log::debug!(
            "{}: {} words, {} images, {} links",
            result.url,
            result.word_count,
            result.image_count,
            result.link_count
        );
        result
    }
}
