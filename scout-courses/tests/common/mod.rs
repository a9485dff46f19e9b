#![allow(dead_code)]

use async_trait::async_trait;
use scout_common::observability::{LogConfig, init_logging};
use scout_search::{SearchError, SearchHit, SearchResults, SearchTransport};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "scout-tests",
            emit_stderr: true,
            default_filter: "debug".to_string(),
            ..LogConfig::default()
        };
        init_logging(config).unwrap_or_default()
    });
}

enum Canned {
    Hits(Vec<SearchHit>),
    Status(u16),
}

/// Transport answering from a fixed table keyed by query string.
/// Unknown queries return no hits.
#[derive(Default)]
pub struct CannedTransport {
    responses: HashMap<String, Canned>,
    calls: Mutex<Vec<String>>,
}

impl CannedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hits(mut self, query: &str, hits: Vec<SearchHit>) -> Self {
        self.responses.insert(query.to_string(), Canned::Hits(hits));
        self
    }

    pub fn failing(mut self, query: &str, status: u16) -> Self {
        self.responses.insert(query.to_string(), Canned::Status(status));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchTransport for CannedTransport {
    async fn search(&self, query: &str) -> Result<SearchResults, SearchError> {
        self.calls.lock().unwrap().push(query.to_string());
        match self.responses.get(query) {
            Some(Canned::Hits(hits)) => Ok(SearchResults {
                results: hits.clone(),
            }),
            Some(Canned::Status(status)) => Err(SearchError::Backend {
                status: *status,
                status_text: "Internal Server Error".into(),
            }),
            None => Ok(SearchResults::default()),
        }
    }
}

pub fn hit(title: &str, url: &str, snippet: &str) -> SearchHit {
    SearchHit::new(title, url, snippet)
}
