use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_DIRECTIVE: &str = "panel_provisioner=info";
pub const VERBOSE_DIRECTIVE: &str = "panel_provisioner=debug,info";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    /// Lambda / CloudWatch 使用
    Json,
}

/// 設定檔中的 `[logging]` 區段
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub format: LogFormat,
}

/// 決定 filter：`--verbose` > 設定檔 `logging.filter` > 預設值。`RUST_LOG` 仍然優先於這三者。
pub fn directive_for(config: &LoggingConfig, verbose: bool) -> String {
    if verbose {
        return VERBOSE_DIRECTIVE.to_string();
    }
    config
        .filter
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_DIRECTIVE)
        .to_string()
}

pub fn init_logger(config: &LoggingConfig, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive_for(config, verbose)));

    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match config.format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(layer.without_time().json())
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_defaults() {
        assert_eq!(directive_for(&LoggingConfig::default(), false), DEFAULT_DIRECTIVE);
        assert_eq!(directive_for(&LoggingConfig::default(), true), VERBOSE_DIRECTIVE);
    }

    #[test]
    fn test_directive_from_config() {
        let config = LoggingConfig {
            filter: Some("panel_provisioner=warn,reqwest=debug".to_string()),
            format: LogFormat::Json,
        };
        assert_eq!(directive_for(&config, false), "panel_provisioner=warn,reqwest=debug");
        assert_eq!(directive_for(&config, true), VERBOSE_DIRECTIVE);

        let blank = LoggingConfig {
            filter: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(directive_for(&blank, false), DEFAULT_DIRECTIVE);
    }
}
