//! Search-to-recommendation pipeline.
//!
//! [`CoursePlanner::run`] plans query variants, executes a prefix of them
//! against the injected [`SearchTransport`], merges and deduplicates the hits,
//! extracts course records and applies the level filter. It never returns an
//! error: a run in which every query failed yields the degraded fallback
//! envelope instead.
use crate::extract::extract_with;
use crate::plan::{MAX_PLANNED_QUERIES, QueryPlan};
use crate::types::{CourseRecord, Level, LevelFilter, Provider, SearchResponseEnvelope};
use futures::future::join_all;
use rand::SeedableRng;
use rand::rngs::StdRng;
use scout_search::{SearchError, SearchHit, SearchResults, SearchTransport};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

pub const DEFAULT_QUERIES_PER_RUN: usize = 3;
/// Size of the unfiltered slice returned when no course matches the requested level.
pub const LEVEL_FALLBACK_COURSES: usize = 4;

pub const FALLBACK_ERROR: &str = "Search service temporarily unavailable";
const FALLBACK_DESCRIPTION: &str =
    "Search service temporarily unavailable. Click to search manually on Google.";
const FALLBACK_SEARCH_URL: &str = "https://www.google.com/search";
const FALLBACK_RATING: f64 = 4.5;
const FALLBACK_STUDENTS: u32 = 10_000;

/// How the executed queries are issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FanOut {
    /// One query at a time, in plan order.
    #[default]
    Sequential,
    /// All executed queries in flight together; results are still merged in plan order.
    Concurrent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerSettings {
    queries_per_run: usize,
    pub fan_out: FanOut,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            queries_per_run: DEFAULT_QUERIES_PER_RUN,
            fan_out: FanOut::Sequential,
        }
    }
}

impl PlannerSettings {
    /// `queries_per_run` is clamped to `1..=5`.
    pub fn new(queries_per_run: usize, fan_out: FanOut) -> Self {
        Self {
            queries_per_run: queries_per_run.clamp(1, MAX_PLANNED_QUERIES),
            fan_out,
        }
    }

    pub fn queries_per_run(&self) -> usize {
        self.queries_per_run
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("all {attempted} search queries failed; last error: {last}")]
    AllQueriesFailed {
        attempted: usize,
        #[source]
        last: SearchError,
    },
}

#[derive(Clone)]
pub struct CoursePlanner {
    transport: Arc<dyn SearchTransport>,
    settings: PlannerSettings,
    seed: Option<u64>,
}

impl CoursePlanner {
    pub fn new(transport: Arc<dyn SearchTransport>) -> Self {
        Self {
            transport,
            settings: PlannerSettings::default(),
            seed: None,
        }
    }

    pub fn with_settings(mut self, settings: PlannerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Fix the seed of the synthetic popularity generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    pub async fn run(&self, topic: &str, level: LevelFilter) -> SearchResponseEnvelope {
        let started = Instant::now();
        tracing::info!(%topic, %level, fan_out = ?self.settings.fan_out, "planner.run.start");

        match self.try_run(topic, level).await {
            Ok(envelope) => {
                tracing::info!(
                    %topic,
                    %level,
                    total_found = envelope.total_found,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "planner.run.success"
                );
                envelope
            }
            Err(err) => {
                tracing::error!(
                    %topic,
                    %level,
                    error = %err,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "planner.run.fallback"
                );
                fallback_envelope(topic, level)
            }
        }
    }

    async fn try_run(
        &self,
        topic: &str,
        level: LevelFilter,
    ) -> Result<SearchResponseEnvelope, PipelineError> {
        let plan = QueryPlan::build(topic, level);
        let queries = plan.executed(self.settings.queries_per_run);
        let outcomes = self.fan_out(queries).await;

        let attempted = outcomes.len();
        let mut merged: Vec<SearchHit> = Vec::new();
        let mut last_error: Option<SearchError> = None;
        let mut succeeded = 0usize;
        for (query, outcome) in queries.iter().zip(outcomes) {
            match outcome {
                Ok(SearchResults { results }) => {
                    succeeded += 1;
                    merged.extend(results);
                }
                Err(err) => {
                    tracing::warn!(%query, error = %err, "planner.query.failed");
                    last_error = Some(err);
                }
            }
        }

        if succeeded == 0 {
            if let Some(last) = last_error {
                return Err(PipelineError::AllQueriesFailed { attempted, last });
            }
        }

        let unique = dedup_by_url(merged);
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let courses = filter_by_level(extract_with(&unique, topic, &mut rng), level);

        Ok(SearchResponseEnvelope {
            topic: topic.to_string(),
            level,
            total_found: courses.len(),
            courses,
            search_performed: true,
            error: None,
        })
    }

    async fn fan_out(&self, queries: &[String]) -> Vec<Result<SearchResults, SearchError>> {
        match self.settings.fan_out {
            FanOut::Sequential => {
                let mut outcomes = Vec::with_capacity(queries.len());
                for query in queries {
                    outcomes.push(self.transport.search(query).await);
                }
                outcomes
            }
            FanOut::Concurrent => {
                join_all(queries.iter().map(|q| self.transport.search(q))).await
            }
        }
    }
}

/// Keep the first hit for every distinct URL, preserving order.
pub fn dedup_by_url(mut hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut seen: HashSet<String> = HashSet::with_capacity(hits.len());
    hits.retain(|hit| seen.insert(hit.url.clone()));
    hits
}

/// Keep courses at the requested level. When none match, the first
/// [`LEVEL_FALLBACK_COURSES`] unfiltered courses are returned instead.
pub fn filter_by_level(courses: Vec<CourseRecord>, level: LevelFilter) -> Vec<CourseRecord> {
    let Some(wanted) = level.level() else {
        return courses;
    };
    if courses.iter().any(|c| c.level == wanted) {
        courses.into_iter().filter(|c| c.level == wanted).collect()
    } else {
        if !courses.is_empty() {
            tracing::debug!(%level, "planner.level_filter.empty_using_unfiltered");
        }
        courses.into_iter().take(LEVEL_FALLBACK_COURSES).collect()
    }
}

/// Single-record envelope pointing the user at a manual web search.
pub fn fallback_envelope(topic: &str, level: LevelFilter) -> SearchResponseEnvelope {
    let query = format!("{topic} online course");
    let link = Url::parse_with_params(FALLBACK_SEARCH_URL, &[("q", query.as_str())])
        .map(String::from)
        .unwrap_or_else(|_| FALLBACK_SEARCH_URL.to_string());

    let course = CourseRecord {
        title: format!("{topic} Course - Search Unavailable"),
        provider: Provider::MultiplePlatforms,
        level: level.level().unwrap_or(Level::Beginner),
        rating: FALLBACK_RATING,
        students: FALLBACK_STUDENTS,
        link,
        description: FALLBACK_DESCRIPTION.to_string(),
    };

    SearchResponseEnvelope {
        topic: topic.to_string(),
        level,
        courses: vec![course],
        total_found: 1,
        search_performed: false,
        error: Some(FALLBACK_ERROR.to_string()),
    }
}
