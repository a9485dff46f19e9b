//! Course recommendations from web search results.
//!
//! - [`plan`]: deterministic query variants for a topic and level
//! - [`extract`]: provider/level classification and record shaping
//! - [`planner`]: the fault-tolerant search pipeline producing an envelope
//! - [`tool`]: the `search-courses` callable exposed to an orchestrator
//!
//! # Examples
//! ```no_run
//! use scout_courses::{CoursePlanner, LevelFilter};
//! use scout_search::{TavilyClient, TavilySettings};
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), scout_search::SearchError> {
//! let client = TavilyClient::new(TavilySettings::new("tvly-..."))?;
//! let planner = CoursePlanner::new(Arc::new(client));
//! let envelope = planner.run("rust", LevelFilter::Beginner).await;
//! assert!(envelope.courses.len() <= 6);
//! # Ok(()) }
//! ```
pub mod extract;
pub mod plan;
pub mod planner;
pub mod tool;
pub mod types;

pub use planner::{CoursePlanner, FanOut, PipelineError, PlannerSettings};
pub use tool::{SearchCoursesArgs, SearchCoursesTool, ToolError};
pub use types::{CourseRecord, Level, LevelFilter, Provider, SearchResponseEnvelope};
