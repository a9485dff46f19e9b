use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scout_common::init_logging;
use scout_config::{LlmConfig, ScoutConfig, ScoutConfigLoader};
use scout_courses::{LevelFilter, SearchCoursesArgs, SearchCoursesTool};
use std::path::{Path, PathBuf};

mod wiring;

#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(about = "Course recommendations from web search", long_about = None)]
struct Cli {
    /// YAML config file. Skipped when absent; defaults and `SCOUT__*` variables still apply.
    #[arg(long, env = "SCOUT_CONFIG", default_value = "scout.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the search pipeline for a topic and print the response envelope.
    Search {
        topic: String,
        #[arg(long, default_value = "all")]
        level: LevelFilter,
    },
    /// Print the model, system instruction and `search-courses` declaration for an orchestrator.
    Tool,
    /// Invoke `search-courses` with a JSON argument object, e.g. '{"topic":"rust","level":"beginner"}'.
    Call { args: String },
}

fn load_config(path: &Path) -> Result<ScoutConfig> {
    ScoutConfigLoader::new()
        .with_optional_file(path)
        .load()
        .with_context(|| format!("loading configuration ({})", path.display()))
}

/// Load and validate configuration, start logging and wire the tool.
fn start(config_path: &Path) -> Result<SearchCoursesTool> {
    let cfg = load_config(config_path)?;
    cfg.validate()?;

    let log_path = init_logging(wiring::log_config(&cfg.logging))?;
    let LlmConfig::Gemini { model, .. } = &cfg.llm;
    tracing::info!(log = %log_path.display(), llm_model = %model, "app.start");

    wiring::build_tool(&cfg)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Tool => {
            let cfg = load_config(&cli.config)?;
            serde_json::to_value(wiring::orchestrator_setup(&cfg.llm))?
        }
        Commands::Search { topic, level } => {
            let tool = start(&cli.config)?;
            serde_json::to_value(tool.call(SearchCoursesArgs { topic, level }).await)?
        }
        Commands::Call { args } => {
            let args: serde_json::Value =
                serde_json::from_str(&args).context("tool arguments must be a JSON object")?;
            let tool = start(&cli.config)?;
            tool.invoke(args).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
