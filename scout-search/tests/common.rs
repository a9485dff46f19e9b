use std::sync::OnceLock;

use scout_common::observability::{LogConfig, LogFormat, init_logging};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "scout-tests",
            emit_stderr: true,
            format: std::env::var("SCOUT_LOG_FORMAT")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(LogFormat::Text),
            default_filter: "debug".to_string(),
            ..LogConfig::default()
        };

        init_logging(config).unwrap_or_default()
    });
}
