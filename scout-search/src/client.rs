//! Tavily search client and the transport seam the planner is written against.
use crate::types::{SearchError, SearchResults, TavilySearchRequest, TavilySearchResponse};
use async_trait::async_trait;
use scout_http::HttpClient;
use std::time::{Duration, Instant};

pub const TAVILY_BASE_URL: &str = "https://api.tavily.com";
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Issues exactly one query against a web search backend.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResults, SearchError>;
}

#[derive(Debug, Clone)]
pub struct TavilySettings {
    pub endpoint: String,
    pub api_key: String,
    pub max_results: u32,
    /// Per-request bound. Unset means the caller bounds overall latency.
    pub timeout: Option<Duration>,
}

impl TavilySettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: TAVILY_BASE_URL.to_string(),
            api_key: api_key.into(),
            max_results: DEFAULT_MAX_RESULTS,
            timeout: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Clone)]
pub struct TavilyClient {
    http: HttpClient,
    api_key: String,
    max_results: u32,
}

impl TavilyClient {
    pub fn new(settings: TavilySettings) -> Result<Self, SearchError> {
        if settings.api_key.trim().is_empty() {
            return Err(SearchError::Config("search API key is empty".into()));
        }
        let mut http = HttpClient::new(&settings.endpoint)?;
        if let Some(timeout) = settings.timeout {
            http = http.with_timeout(timeout);
        }
        Ok(Self {
            http,
            api_key: settings.api_key,
            max_results: settings.max_results,
        })
    }
}

#[async_trait]
impl SearchTransport for TavilyClient {
    async fn search(&self, query: &str) -> Result<SearchResults, SearchError> {
        let started = Instant::now();
        tracing::info!(target: "search.tavily", %query, "search.query.start");

        let body = TavilySearchRequest::basic(&self.api_key, query, self.max_results);
        let resp: TavilySearchResponse = match self.http.post_json("search", &body).await {
            Ok(resp) => resp,
            Err(e) => {
                let err = SearchError::from(e);
                tracing::warn!(
                    target: "search.tavily",
                    %query,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %err,
                    "search.query.error"
                );
                return Err(err);
            }
        };

        let results = SearchResults::from(resp);
        tracing::info!(
            target: "search.tavily",
            %query,
            hit_count = results.results.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search.query.success"
        );
        Ok(results)
    }
}
