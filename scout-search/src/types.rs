use scout_http::HttpError;
use serde::{Deserialize, Serialize};

/// Request body for `POST /search`.
///
/// The flags are fixed for course discovery: basic depth, no synthesized
/// answer, no images, no raw page content.
#[derive(Debug, Clone, Serialize)]
pub struct TavilySearchRequest<'a> {
    pub api_key: &'a str,
    pub query: &'a str,
    pub search_depth: &'static str,
    pub include_answer: bool,
    pub include_images: bool,
    pub include_raw_content: bool,
    pub max_results: u32,
}

impl<'a> TavilySearchRequest<'a> {
    pub fn basic(api_key: &'a str, query: &'a str, max_results: u32) -> Self {
        Self {
            api_key,
            query,
            search_depth: "basic",
            include_answer: false,
            include_images: false,
            include_raw_content: false,
            max_results,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TavilySearchResponse {
    #[serde(default)]
    pub results: Vec<TavilyResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TavilyResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

/// One raw result, normalized away from the backend's wire names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub snippet: String,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, url: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}

impl From<TavilyResult> for SearchHit {
    fn from(r: TavilyResult) -> Self {
        Self {
            title: r.title,
            url: r.url,
            snippet: r.content.unwrap_or_default(),
        }
    }
}

/// Hits returned for a single query, in backend order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub results: Vec<SearchHit>,
}

impl From<TavilySearchResponse> for SearchResults {
    fn from(resp: TavilySearchResponse) -> Self {
        Self {
            results: resp.results.into_iter().map(SearchHit::from).collect(),
        }
    }
}

/// Failure of one search call. Always scoped to a single query.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The backend answered with a non-2xx status.
    #[error("Search API error: {status} {status_text}")]
    Backend { status: u16, status_text: String },

    #[error("search transport failed: {0}")]
    Transport(String),

    #[error("search response could not be decoded: {0}")]
    Decode(String),

    #[error("search client misconfigured: {0}")]
    Config(String),
}

impl From<HttpError> for SearchError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Api {
                status, message, ..
            } => SearchError::Backend {
                status: status.as_u16(),
                status_text: status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or(message),
            },
            HttpError::Network(msg) => SearchError::Transport(msg),
            HttpError::Decode(msg, _) => SearchError::Decode(msg),
            HttpError::Url(msg) | HttpError::Build(msg) => SearchError::Config(msg),
        }
    }
}
