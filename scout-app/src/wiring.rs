use anyhow::{Context, Result};
use scout_common::LogConfig;
use scout_config::{
    FanOutMode, LlmConfig, LoggingConfig, PlannerConfig, ScoutConfig, SearchConfig,
};
use scout_courses::tool::{ToolDeclaration, declaration};
use scout_courses::{CoursePlanner, FanOut, PlannerSettings, SearchCoursesTool};
use scout_search::{TavilyClient, TavilySettings};
use serde::Serialize;
use std::sync::Arc;

/// What a Gemini-driven orchestrator needs to host `search-courses`:
/// the model, its system instruction and the tool declaration.
#[derive(Debug, Serialize)]
pub struct OrchestratorSetup {
    pub model: String,
    pub system_instruction: SystemInstruction,
    pub tools: Vec<ToolGroup>,
}

#[derive(Debug, Serialize)]
pub struct SystemInstruction {
    pub parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
pub struct TextPart {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ToolGroup {
    pub function_declarations: Vec<ToolDeclaration>,
}

/// Secrets are not part of the output.
pub fn orchestrator_setup(cfg: &LlmConfig) -> OrchestratorSetup {
    let LlmConfig::Gemini {
        model,
        instructions,
        ..
    } = cfg;
    OrchestratorSetup {
        model: model.clone(),
        system_instruction: SystemInstruction {
            parts: vec![TextPart {
                text: instructions.clone(),
            }],
        },
        tools: vec![ToolGroup {
            function_declarations: vec![declaration()],
        }],
    }
}

pub fn log_config(cfg: &LoggingConfig) -> LogConfig {
    LogConfig {
        log_dir: cfg.dir.clone(),
        emit_stderr: cfg.emit_stderr,
        format: cfg.format,
        default_filter: cfg.filter.clone(),
        ..LogConfig::default()
    }
}

pub fn tavily_settings(cfg: &SearchConfig) -> TavilySettings {
    TavilySettings {
        max_results: cfg.max_results,
        timeout: cfg.timeout(),
        ..TavilySettings::new(cfg.api_key.clone()).with_endpoint(cfg.endpoint.clone())
    }
}

pub fn planner_settings(cfg: &PlannerConfig) -> PlannerSettings {
    let fan_out = match cfg.fan_out {
        FanOutMode::Sequential => FanOut::Sequential,
        FanOutMode::Concurrent => FanOut::Concurrent,
    };
    PlannerSettings::new(cfg.queries_per_run, fan_out)
}

/// Search client, planner and tool, in dependency order.
pub fn build_tool(cfg: &ScoutConfig) -> Result<SearchCoursesTool> {
    let client = TavilyClient::new(tavily_settings(&cfg.search))
        .context("building the Tavily search client")?;

    let mut planner =
        CoursePlanner::new(Arc::new(client)).with_settings(planner_settings(&cfg.planner));
    if let Some(seed) = cfg.planner.seed {
        planner = planner.with_seed(seed);
    }

    tracing::info!(
        endpoint = %cfg.search.endpoint,
        queries_per_run = planner.settings().queries_per_run(),
        fan_out = ?planner.settings().fan_out,
        "app.tool.ready"
    );
    Ok(SearchCoursesTool::new(planner))
}
