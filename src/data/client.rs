//! REST Countries API client
//!
//! Translates the four read-only queries the directory needs (all countries,
//! one country by code, countries in a region, name search) into HTTP GET
//! requests. Every response is cached in a shared `ResponseCache` keyed by the
//! fully-built request URL, so repeated queries inside the freshness window
//! never touch the network.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use super::{Country, Region};
use crate::cache::ResponseCache;

/// Base URL of the public REST Countries API
pub const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1";

/// Reduced field projection requested by the list endpoints
const LIST_FIELDS: &str = "name,capital,region,subregion,population,flags,cca3,cca2";

/// Errors that can occur when querying the countries API
#[derive(Debug, Error)]
pub enum CountryError {
    /// Network failure or unreadable response body
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The server answered with a non-success status other than 404
    #[error("HTTP error {status} for {url}")]
    HttpStatus { status: StatusCode, url: String },

    /// The server answered 404, or a code lookup matched nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse the JSON response
    #[error("Failed to parse API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The configured base URL cannot be extended with path segments
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl CountryError {
    /// Returns true for the "no such resource" case
    pub fn is_not_found(&self) -> bool {
        matches!(self, CountryError::NotFound(_))
    }
}

/// Performs a single GET and returns the body as JSON
///
/// Implemented over reqwest by `HttpTransport`; tests substitute a recording
/// fake so that cache behaviour can be checked without a network.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, CountryError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with a default reqwest client
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<Value, CountryError> {
        let response = self.client.get(url).send().await?;

        match response.status() {
            status if status.is_success() => {
                let text = response.text().await?;
                Ok(serde_json::from_str(&text)?)
            }
            StatusCode::NOT_FOUND => Err(CountryError::NotFound(url.to_string())),
            status => Err(CountryError::HttpStatus {
                status,
                url: url.to_string(),
            }),
        }
    }
}

/// `alpha/{code}` answers with an array, but tolerate a bare object too
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Country>),
    One(Box<Country>),
}

/// Client for the REST Countries API with transparent response caching
///
/// Cloning shares both the transport and the cache.
#[derive(Clone)]
pub struct CountryClient {
    transport: Arc<dyn Transport>,
    cache: ResponseCache,
    base_url: String,
}

impl fmt::Debug for CountryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountryClient")
            .field("base_url", &self.base_url)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl Default for CountryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CountryClient {
    /// Creates a client for the public API with an empty cache
    pub fn new() -> Self {
        Self::with_transport(Arc::new(HttpTransport::new()))
    }

    /// Creates a client that sends requests through `transport`
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            cache: ResponseCache::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Points the client at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replaces the response cache
    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = cache;
        self
    }

    /// The cache shared by all clones of this client
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// The API root requests are built from
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the request URL, which doubles as the cache key
    ///
    /// Segments are percent-encoded. When `projected` is set, the reduced
    /// `fields` projection is appended as the query string.
    fn endpoint(&self, segments: &[&str], projected: bool) -> Result<String, CountryError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CountryError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| CountryError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);

        if projected {
            url.set_query(Some(&format!("fields={}", LIST_FIELDS)));
        }

        Ok(url.to_string())
    }

    /// Returns the cached payload for `url` if fresh, otherwise fetches it
    ///
    /// Only payloads that decode as `T` are cached. Transport failures and
    /// responses of the wrong shape are never stored.
    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, CountryError> {
        if let Some(cached) = self.cache.get_fresh(url) {
            debug!(url, "cache hit");
            return Ok(serde_json::from_value(cached)?);
        }

        debug!(url, "cache miss");
        let payload = self.transport.get_json(url).await.inspect_err(|e| {
            if e.is_not_found() {
                debug!(url, "resource not found");
            } else {
                warn!(url, error = %e, "request failed");
            }
        })?;

        let decoded: T = serde_json::from_value(payload.clone()).inspect_err(|e| {
            warn!(url, error = %e, "unexpected response shape");
        })?;
        self.cache.set(url, payload);
        Ok(decoded)
    }

    /// Fetches every country, projected to the list fields
    pub async fn list_all(&self) -> Result<Vec<Country>, CountryError> {
        let url = self.endpoint(&["all"], true)?;
        self.fetch(&url).await
    }

    /// Fetches the full record for a two- or three-letter country code
    ///
    /// There is no local existence check: an unknown code fails with
    /// `CountryError::NotFound`, which is distinct from an empty success.
    pub async fn get_by_code(&self, code: &str) -> Result<Country, CountryError> {
        let url = self.endpoint(&["alpha", code.trim()], false)?;

        match self.fetch::<OneOrMany>(&url).await? {
            OneOrMany::Many(countries) => countries
                .into_iter()
                .next()
                .ok_or_else(|| CountryError::NotFound(code.to_string())),
            OneOrMany::One(country) => Ok(*country),
        }
    }

    /// Fetches the countries of one region, projected to the list fields
    pub async fn list_by_region(&self, region: Region) -> Result<Vec<Country>, CountryError> {
        let url = self.endpoint(&["region", region.as_str()], true)?;
        self.fetch(&url).await
    }

    /// Server-side, case-insensitive name search
    ///
    /// A blank query returns no results without a request. A 404 from the
    /// server means "no matches" and also yields an empty list; any other
    /// failure is returned to the caller.
    pub async fn search(&self, name_part: &str) -> Result<Vec<Country>, CountryError> {
        if name_part.trim().is_empty() {
            return Ok(Vec::new());
        }

        let url = self.endpoint(&["name", name_part], true)?;
        match self.fetch(&url).await {
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            result => result,
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Recording transport used by tests across the crate

    use super::*;
    use std::sync::Mutex;

    /// What the fake server answers for a matching URL
    #[derive(Debug, Clone)]
    pub enum MockResponse {
        Json(Value),
        Status(u16),
    }

    /// Answers requests from a list of (URL fragment, response) rules
    ///
    /// The first rule whose fragment appears in the URL wins. Unmatched URLs
    /// get a 404.
    #[derive(Debug, Default)]
    pub struct MockTransport {
        rules: Mutex<Vec<(String, MockResponse)>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockTransport {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn respond(&self, fragment: &str, response: MockResponse) {
            self.rules
                .lock()
                .unwrap()
                .push((fragment.to_string(), response));
        }

        pub fn respond_json<T: serde::Serialize>(&self, fragment: &str, body: &T) {
            let value = serde_json::to_value(body).expect("fixture should serialize");
            self.respond(fragment, MockResponse::Json(value));
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn get_json(&self, url: &str) -> Result<Value, CountryError> {
            self.calls.lock().unwrap().push(url.to_string());

            let rule = self
                .rules
                .lock()
                .unwrap()
                .iter()
                .find(|(fragment, _)| url.contains(fragment.as_str()))
                .map(|(_, response)| response.clone());

            match rule {
                Some(MockResponse::Json(value)) => Ok(value),
                Some(MockResponse::Status(404)) | None => {
                    Err(CountryError::NotFound(url.to_string()))
                }
                Some(MockResponse::Status(code)) => Err(CountryError::HttpStatus {
                    status: StatusCode::from_u16(code)
                        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                    url: url.to_string(),
                }),
            }
        }
    }

    pub const TEST_BASE_URL: &str = "https://countries.test/v3.1";

    /// A client wired to `transport` with a fresh cache
    pub fn client_with(transport: &Arc<MockTransport>) -> CountryClient {
        let transport: Arc<dyn Transport> = transport.clone();
        CountryClient::with_transport(transport).with_base_url(TEST_BASE_URL)
    }
}
