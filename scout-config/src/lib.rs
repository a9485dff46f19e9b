//! Loader for Scout configuration: built-in defaults, YAML files and
//! `SCOUT__`-prefixed environment overrides, merged in that order.
//!
//! After merging, `${VAR}` placeholders anywhere in the tree are expanded
//! from the process environment. The defaults reference the two secrets the
//! service needs, so a bare environment with `TAVILY_API_KEY` and
//! `GOOGLE_GENERATIVE_AI_API_KEY` set is a complete configuration:
//!
//! ```yaml
//! version: "1"
//! search:
//!   provider: tavily
//!   endpoint: "https://api.tavily.com"
//!   api_key: "${TAVILY_API_KEY}"
//!   max_results: 10
//!   # timeout_secs: 15     optional per-request bound, none by default
//! planner:
//!   queries_per_run: 3
//!   fan_out: sequential      # or: concurrent
//! llm:
//!   provider: gemini
//!   model: "gemini-1.5-flash"
//!   api_key: "${GOOGLE_GENERATIVE_AI_API_KEY}"
//! logging:
//!   format: text             # or: json
//!   emit_stderr: false
//!   filter: info
//! ```
//!
//! Nested keys map to environment variables with `__`, e.g.
//! `SCOUT__PLANNER__FAN_OUT=concurrent`.
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use scout_common::LogFormat;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "SCOUT";

const DEFAULTS_YAML: &str = r#"
version: "1"
search:
  provider: tavily
  endpoint: "https://api.tavily.com"
  api_key: "${TAVILY_API_KEY}"
  max_results: 10
planner:
  queries_per_run: 3
  fan_out: sequential
llm:
  provider: gemini
  model: "gemini-1.5-flash"
  api_key: "${GOOGLE_GENERATIVE_AI_API_KEY}"
logging:
  format: text
  emit_stderr: false
  filter: info
"#;

pub const DEFAULT_ASSISTANT_INSTRUCTIONS: &str = "You are an educational assistant that helps users find relevant courses and learning resources.
When users ask about learning topics, use the search tool to find real courses from popular platforms.
Always be encouraging and provide detailed explanations about why certain courses might be beneficial.
Focus on finding courses from reputable platforms like Udemy, Coursera, edX, Pluralsight, etc.";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),
    #[error("missing secret `{key}`: set {env} or provide it in the config file")]
    MissingSecret { key: &'static str, env: &'static str },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoutConfig {
    pub version: Option<String>,
    pub search: SearchConfig,
    pub planner: PlannerConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProvider {
    Tavily,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub provider: SearchProvider,
    pub endpoint: String,
    pub api_key: String,
    pub max_results: u32,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl SearchConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanOutMode {
    Sequential,
    Concurrent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlannerConfig {
    pub queries_per_run: usize,
    pub fan_out: FanOutMode,
    /// Fixed seed for the synthetic popularity figures; random per run when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Settings for the conversational model that drives the `search-courses` tool.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum LlmConfig {
    Gemini {
        model: String,
        api_key: String,
        #[serde(default = "default_instructions")]
        instructions: String,
    },
}

fn default_instructions() -> String {
    DEFAULT_ASSISTANT_INSTRUCTIONS.into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub emit_stderr: bool,
    pub filter: String,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl ScoutConfig {
    /// Reject configurations the service cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_secret(&self.search.api_key, "search.api_key", "TAVILY_API_KEY")?;
        match &self.llm {
            LlmConfig::Gemini { api_key, model, .. } => {
                require_secret(api_key, "llm.api_key", "GOOGLE_GENERATIVE_AI_API_KEY")?;
                if model.trim().is_empty() {
                    return Err(ConfigError::Invalid("llm.model must not be empty".into()));
                }
            }
        }
        if !(1..=5).contains(&self.planner.queries_per_run) {
            return Err(ConfigError::Invalid(format!(
                "planner.queries_per_run must be within 1..=5, got {}",
                self.planner.queries_per_run
            )));
        }
        if self.search.max_results == 0 {
            return Err(ConfigError::Invalid(
                "search.max_results must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn require_secret(value: &str, key: &'static str, env: &'static str) -> Result<(), ConfigError> {
    let v = value.trim();
    if v.is_empty() || v.contains("${") || v.starts_with('$') {
        return Err(ConfigError::MissingSecret { key, env });
    }
    Ok(())
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring.
pub struct ScoutConfigLoader {
    builder: ConfigBuilder<DefaultState>,
}

impl Default for ScoutConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoutConfigLoader {
    /// Start from the built-in defaults.
    ///
    /// ```
    /// use scout_config::{FanOutMode, ScoutConfigLoader};
    ///
    /// let config = ScoutConfigLoader::new()
    ///     .with_yaml_str("planner:\n  fan_out: concurrent")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.planner.fan_out, FanOutMode::Concurrent);
    /// assert_eq!(config.planner.queries_per_run, 3);
    /// assert_eq!(config.search.max_results, 10);
    /// ```
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULTS_YAML, FileFormat::Yaml));
        Self { builder }
    }

    /// Attach a YAML/TOML/JSON file; the format is inferred from the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Like [`with_file`](Self::with_file), but a missing file is skipped.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Merge all sources, apply `SCOUT__` environment overrides last, expand
    /// `${VAR}` placeholders and deserialize.
    ///
    /// ```
    /// use scout_config::{LlmConfig, ScoutConfigLoader};
    ///
    /// unsafe { std::env::set_var("DOCTEST_GEMINI_KEY", "from-env"); }
    ///
    /// let config = ScoutConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// llm:
    ///   provider: gemini
    ///   model: "gemini-1.5-pro"
    ///   api_key: "${DOCTEST_GEMINI_KEY}"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// match &config.llm {
    ///     LlmConfig::Gemini { model, api_key, .. } => {
    ///         assert_eq!(model, "gemini-1.5-pro");
    ///         assert_eq!(api_key, "from-env");
    ///     }
    /// }
    ///
    /// unsafe { std::env::remove_var("DOCTEST_GEMINI_KEY"); }
    /// ```
    pub fn load(self) -> Result<ScoutConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Load(config::ConfigError::Message(e.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("FOO", Some("bar"), || {
            let mut v = json!("prefix-${FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars([("CITY", Some("Winston")), ("STATE", Some("NC"))], || {
            let mut v = json!(["hello-$CITY", { "loc": "${CITY}-${STATE}" }, 42, true, null]);
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!(["hello-Winston", { "loc": "Winston-NC" }, 42, true, null])
            );
        });
    }

    #[test]
    fn expands_recursively_across_env_values() {
        temp_env::with_vars(
            [
                ("BAZ", Some("qux")),
                ("BAR", Some("mid-${BAZ}")),
                ("FOO", Some("start-${BAR}-end")),
            ],
            || {
                let mut v = json!("X=${FOO}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("X=start-mid-qux-end"));
            },
        );
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${DOES_NOT_EXIST_SCOUT}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${DOES_NOT_EXIST_SCOUT}"));
    }

    #[test]
    fn unresolved_placeholders_count_as_missing_secrets() {
        assert!(require_secret("${TAVILY_API_KEY}", "k", "E").is_err());
        assert!(require_secret("   ", "k", "E").is_err());
        assert!(require_secret("tvly-abc", "k", "E").is_ok());
    }
}
