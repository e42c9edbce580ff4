use crate::news::parser::{parse_articles, ParseResult};
use crate::news::types::{Article, Category};
use futures::StreamExt;
use reqwest::redirect::Policy;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors that can occur while fetching a page of news.
///
/// The first group are transport failures, `Malformed` covers bodies that
/// arrived intact but are not a usable news response. Callers treat every
/// variant the same way: log it and show zero new articles.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
    /// Body was not JSON, or had no `articles` array
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// True for bodies that arrived but could not be understood.
    pub fn is_malformed(&self) -> bool {
        matches!(self, FetchError::Malformed(_))
    }
}

/// Create a custom redirect policy with loop detection and limited hops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// Build `{endpoint}/api/news?category={category}&page={page}`.
///
/// Any path already present on the endpoint is kept as a prefix, and any
/// query string on it is replaced.
pub fn page_url(endpoint: &Url, category: Category, page: u32) -> Url {
    let mut url = endpoint.clone();
    let path = format!("{}/api/news", endpoint.path().trim_end_matches('/'));
    url.set_path(&path);
    url.set_fragment(None);
    url.query_pairs_mut()
        .clear()
        .append_pair("category", category.as_str())
        .append_pair("page", &page.to_string());
    url
}

/// HTTP client for the news endpoint.
///
/// Cheap to clone: the inner `reqwest::Client` is reference counted, so each
/// background fetch task takes its own copy.
#[derive(Debug, Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    endpoint: Url,
    timeout: Option<Duration>,
    max_articles: usize,
}

impl NewsClient {
    /// Create a client for `endpoint`.
    ///
    /// `timeout` of `None` waits indefinitely. `max_articles` caps how many
    /// entries are kept from each response; 0 keeps all of them.
    pub fn new(
        endpoint: Url,
        timeout: Option<Duration>,
        max_articles: usize,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .user_agent(concat!("headlines/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            timeout,
            max_articles,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch one page of articles for `category`.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Network`] - Connection or TLS errors
    /// - [`FetchError::Timeout`] - Request exceeded the configured timeout
    /// - [`FetchError::HttpStatus`] - Non-2xx HTTP response
    /// - [`FetchError::ResponseTooLarge`] - Response exceeded 10MB
    /// - [`FetchError::IncompleteResponse`] - Body shorter than Content-Length
    /// - [`FetchError::Malformed`] - Not JSON, or no `articles` array
    pub async fn fetch_page(
        &self,
        category: Category,
        page: u32,
    ) -> Result<Vec<Article>, FetchError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.fetch_page_inner(category, page))
                .await
                .map_err(|_| FetchError::Timeout)?,
            None => self.fetch_page_inner(category, page).await,
        }
    }

    async fn fetch_page_inner(
        &self,
        category: Category,
        page: u32,
    ) -> Result<Vec<Article>, FetchError> {
        let url = page_url(&self.endpoint, category, page);
        tracing::debug!(url = %url, "Fetching news page");

        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        let bytes = read_limited_bytes(response, MAX_RESPONSE_SIZE).await?;

        let ParseResult {
            mut articles,
            skipped,
        } = parse_articles(&bytes).map_err(FetchError::Malformed)?;

        if skipped > 0 {
            tracing::warn!(
                category = %category,
                page,
                skipped,
                "Entries without a usable title skipped"
            );
        }

        if self.max_articles > 0 && articles.len() > self.max_articles {
            tracing::debug!(
                received = articles.len(),
                kept = self.max_articles,
                "Truncating news page"
            );
            articles.truncate(self.max_articles);
        }

        Ok(articles)
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    if let Some(len) = expected_length {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}
