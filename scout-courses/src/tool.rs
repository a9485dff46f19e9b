//! The `search-courses` tool as seen by a model-driven orchestrator.
//!
//! The declaration follows the JSON-schema function format accepted by
//! function-calling chat APIs; [`SearchCoursesTool::invoke`] takes the raw
//! argument object the model produced and returns the envelope as JSON.
use crate::planner::CoursePlanner;
use crate::types::{LevelFilter, SearchResponseEnvelope};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const TOOL_NAME: &str = "search-courses";
pub const TOOL_DESCRIPTION: &str =
    "Search for real educational courses on a specific topic using web search";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCoursesArgs {
    pub topic: String,
    pub level: LevelFilter,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolDeclaration {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

pub fn declaration() -> ToolDeclaration {
    ToolDeclaration {
        name: TOOL_NAME,
        description: TOOL_DESCRIPTION,
        parameters: json!({
            "type": "object",
            "properties": {
                "topic": {
                    "type": "string",
                    "description": "The topic or subject to search courses for"
                },
                "level": {
                    "type": "string",
                    "enum": ["beginner", "intermediate", "advanced", "all"],
                    "description": "The difficulty level"
                }
            },
            "required": ["topic", "level"]
        }),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("invalid search-courses arguments: {0}")]
    InvalidArguments(String),
    #[error("failed to encode search-courses result: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct SearchCoursesTool {
    planner: CoursePlanner,
}

impl SearchCoursesTool {
    pub fn new(planner: CoursePlanner) -> Self {
        Self { planner }
    }

    pub fn declaration(&self) -> ToolDeclaration {
        declaration()
    }

    pub async fn call(&self, args: SearchCoursesArgs) -> SearchResponseEnvelope {
        self.planner.run(&args.topic, args.level).await
    }

    /// Decode model-produced arguments, run the pipeline, encode the envelope.
    /// Only arguments that do not match the declared schema are rejected.
    pub async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let args: SearchCoursesArgs = serde_json::from_value(args)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
        tracing::debug!(tool = TOOL_NAME, topic = %args.topic, level = %args.level, "tool.invoke");

        let envelope = self.call(args).await;
        Ok(serde_json::to_value(envelope)?)
    }
}
