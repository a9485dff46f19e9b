//! Web search backend for course discovery.
//!
//! - [`SearchTransport`]: the single-query capability the planner depends on
//! - [`TavilyClient`]: HTTP implementation against the Tavily search API
//! - [`types`]: wire request/response models and the normalized [`SearchHit`]
//!
//! One call is one query: no retries, no fan-out. Both belong to callers.
pub mod client;
pub mod types;

pub use client::{SearchTransport, TavilyClient, TavilySettings};
pub use types::{SearchError, SearchHit, SearchResults};
