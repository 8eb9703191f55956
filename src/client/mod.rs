pub mod guard;

use std::fmt;
use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::record::{ApiErrorBody, InfractionRecord, SearchResponse};

pub use guard::{InFlight, RequestGuard};

pub const API_PREFIX: &str = "/api/v1/infracoes";
pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_SEARCH_LIMIT: usize = 100;
pub const DEFAULT_EXPLORER_LIMIT: usize = 500;

/// Whether `code` can name a single record. Dot segments would be resolved
/// away by the URL and hit the listing instead.
pub fn is_lookup_code(code: &str) -> bool {
    let code = code.trim();
    !code.is_empty() && code != "." && code != ".."
}

/// Name of the search term query parameter. Older backends read `query`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchParam {
    #[default]
    Q,
    Query,
}

impl SearchParam {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "q" => Some(Self::Q),
            "query" => Some(Self::Query),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Q => "q",
            Self::Query => "query",
        }
    }
}

impl fmt::Display for SearchParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub search_param: SearchParam,
    pub proxy: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            search_param: SearchParam::Q,
            proxy: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {source}")]
    Build {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    Proxy {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid API URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("request timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("could not reach the server: {source}")]
    Network {
        #[source]
        source: reqwest::Error,
    },

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("unexpected response from the server: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    #[error("a request is already in progress")]
    Busy,
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }
}

/// Client for the infraction lookup API. Each endpoint has its own
/// in-progress guard, so at most one search, one listing and one detail
/// lookup are outstanding at a time.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
    search_param: SearchParam,
    search_guard: RequestGuard,
    list_guard: RequestGuard,
    detail_guard: RequestGuard,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base = config.base_url.trim().trim_end_matches('/');
        let endpoint = Url::parse(&format!("{base}{API_PREFIX}")).map_err(|e| {
            ClientError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: e.to_string(),
            }
        })?;
        if endpoint.cannot_be_a_base() || !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "expected an http or https URL".to_string(),
            });
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("multasgo/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout);
        if let Some(proxy) = config.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| ClientError::Proxy {
                proxy: proxy.to_string(),
                source: e,
            })?;
            builder = builder.proxy(proxy);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Build { source: e })?;

        Ok(Self {
            http,
            endpoint,
            timeout: config.timeout,
            search_param: config.search_param,
            search_guard: RequestGuard::new(),
            list_guard: RequestGuard::new(),
            detail_guard: RequestGuard::new(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn url_with_segment(&self, segment: &str) -> Result<Url, ClientError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl {
                url: self.endpoint.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .push(segment);
        Ok(url)
    }

    /// `GET /pesquisa?q=<term>&skip=<n>&limit=<n>`
    pub async fn search(
        &self,
        query: &str,
        skip: usize,
        limit: usize,
    ) -> Result<SearchResponse, ClientError> {
        let _in_flight = self.search_guard.try_begin().ok_or(ClientError::Busy)?;
        let mut url = self.url_with_segment("pesquisa")?;
        url.query_pairs_mut()
            .append_pair(self.search_param.as_str(), query)
            .append_pair("skip", &skip.to_string())
            .append_pair("limit", &limit.to_string());

        let response: SearchResponse = self.fetch_json(url).await?;
        info!(
            query = %query,
            total = response.total(),
            returned = response.results.len(),
            "search complete"
        );
        Ok(response)
    }

    /// `GET /?limit=<n>`, the bulk listing that seeds the explorer.
    pub async fn list(&self, limit: usize) -> Result<Vec<InfractionRecord>, ClientError> {
        let _in_flight = self.list_guard.try_begin().ok_or(ClientError::Busy)?;
        let mut url = self.url_with_segment("")?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        let records: Vec<InfractionRecord> = self.fetch_json(url).await?;
        info!(count = records.len(), "listing loaded");
        Ok(records)
    }

    /// `GET /<code>`, with the code percent-encoded as a single segment.
    pub async fn get(&self, code: &str) -> Result<InfractionRecord, ClientError> {
        let _in_flight = self.detail_guard.try_begin().ok_or(ClientError::Busy)?;
        let url = self.url_with_segment(code.trim())?;
        let record: InfractionRecord = self.fetch_json(url).await?;
        info!(code = %record.code, "record loaded");
        Ok(record)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        info!(url = %url, "GET");
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        debug!(status = status.as_u16(), bytes = body.len(), "response received");

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.message())
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            warn!(url = %url, status = status.as_u16(), message = %message, "request failed");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Decode { source: e })
    }

    fn transport_error(&self, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::Timeout {
                after: self.timeout,
            }
        } else {
            ClientError::Network { source: e }
        }
    }
}
