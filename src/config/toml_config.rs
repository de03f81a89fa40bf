use crate::core::client::DEFAULT_REQUEST_TIMEOUT;
use crate::domain::model::ServerTemplate;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ProvisionError, Result};
use crate::utils::logger::{LogFormat, LoggingConfig};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_ROUTE: &str = "/api/create";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub pterodactyl: PterodactylConfig,
    pub server: ServerTemplate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_route")]
    pub path: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            path: default_route(),
        }
    }
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_route() -> String {
    DEFAULT_ROUTE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PterodactylConfig {
    pub domain: String,
    pub api_key: String,
    pub request_timeout_seconds: Option<u64>,
}

impl PanelConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ProvisionError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PTERODACTYL_API_KEY})，找不到的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ProvisionError::ConfigError {
            message: format!("placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 從 PTERODACTYL_* 環境變數建立配置 (lambda 使用)
    pub fn from_env() -> Result<Self> {
        let environment = match env::var("PTERODACTYL_ENVIRONMENT") {
            Ok(raw) if !raw.trim().is_empty() => {
                serde_json::from_str::<BTreeMap<String, serde_json::Value>>(&raw).map_err(|e| {
                    ProvisionError::InvalidConfigValueError {
                        field: "PTERODACTYL_ENVIRONMENT".to_string(),
                        value: raw.clone(),
                        reason: format!("Expected a JSON object: {}", e),
                    }
                })?
            }
            _ => BTreeMap::new(),
        };

        Ok(Self {
            http: HttpConfig::default(),
            logging: LoggingConfig {
                filter: env::var("PANEL_LOG_FILTER").ok(),
                format: LogFormat::Json,
            },
            pterodactyl: PterodactylConfig {
                domain: required_env("PTERODACTYL_DOMAIN")?,
                api_key: required_env("PTERODACTYL_API_KEY")?,
                request_timeout_seconds: optional_env_number("PTERODACTYL_TIMEOUT_SECONDS")?,
            },
            server: ServerTemplate {
                egg_id: required_env_number("PTERODACTYL_EGG_ID")?,
                docker_image: required_env("PTERODACTYL_DOCKER_IMAGE")?,
                startup: required_env("PTERODACTYL_STARTUP")?,
                location_id: required_env_number("PTERODACTYL_LOCATION_ID")?,
                disk: optional_env_number("PTERODACTYL_DISK")?.unwrap_or(0),
                cpu: optional_env_number("PTERODACTYL_CPU")?.unwrap_or(0),
                environment,
            },
        })
    }

    pub fn bind_address(&self) -> &str {
        &self.http.bind
    }

    pub fn route_path(&self) -> &str {
        &self.http.path
    }

    pub fn request_timeout_seconds(&self) -> u64 {
        self.pterodactyl
            .request_timeout_seconds
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT.as_secs())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_url("pterodactyl.domain", &self.pterodactyl.domain)?;
        validate_non_empty_string("pterodactyl.api_key", &self.pterodactyl.api_key)?;
        validate_no_placeholder("pterodactyl.api_key", &self.pterodactyl.api_key)?;
        validate_range(
            "pterodactyl.request_timeout_seconds",
            self.request_timeout_seconds(),
            1,
            300,
        )?;

        validate_positive_number("server.egg_id", self.server.egg_id, 1)?;
        validate_positive_number("server.location_id", self.server.location_id, 1)?;
        validate_non_empty_string("server.docker_image", &self.server.docker_image)?;
        validate_non_empty_string("server.startup", &self.server.startup)?;

        validate_non_empty_string("http.bind", &self.http.bind)?;
        validate_route_path("http.path", &self.http.path)?;

        Ok(())
    }
}

fn required_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| ProvisionError::MissingConfigError {
        field: name.to_string(),
    })
}

fn required_env_number(name: &str) -> Result<u64> {
    parse_number(name, &required_env(name)?)
}

fn optional_env_number(name: &str) -> Result<Option<u64>> {
    match env::var(name) {
        Ok(raw) => parse_number(name, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_number(name: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .map_err(|_| ProvisionError::InvalidConfigValueError {
            field: name.to_string(),
            value: raw.to_string(),
            reason: "Expected a non-negative integer".to_string(),
        })
}

impl ConfigProvider for PanelConfig {
    fn api_base(&self) -> &str {
        &self.pterodactyl.domain
    }

    fn api_key(&self) -> &str {
        &self.pterodactyl.api_key
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds())
    }

    fn server_template(&self) -> ServerTemplate {
        self.server.clone()
    }
}

impl Validate for PanelConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[pterodactyl]
domain = "https://panel.example.com/"
api_key = "ptla_test"

[server]
egg_id = 15
docker_image = "ghcr.io/parkervcp/yolks:nodejs_18"
startup = "{{CMD_RUN}}"
location_id = 1
disk = 5120
cpu = 100

[server.environment]
CMD_RUN = "npm start"
AUTO_UPDATE = 0
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = PanelConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.api_base(), "https://panel.example.com/");
        assert_eq!(config.api_key(), "ptla_test");
        assert_eq!(config.bind_address(), DEFAULT_BIND);
        assert_eq!(config.route_path(), DEFAULT_ROUTE);
        assert_eq!(config.request_timeout(), DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.logging, LoggingConfig::default());

        let template = config.server_template();
        assert_eq!(template.egg_id, 15);
        assert_eq!(template.disk, 5120);
        assert_eq!(template.environment["CMD_RUN"], serde_json::json!("npm start"));
        assert_eq!(template.environment["AUTO_UPDATE"], serde_json::json!(0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PANEL_TEST_API_KEY", "ptla_from_env");

        let content = BASIC.replace("ptla_test", "${PANEL_TEST_API_KEY}");
        let config = PanelConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.pterodactyl.api_key, "ptla_from_env");

        std::env::remove_var("PANEL_TEST_API_KEY");
    }

    #[test]
    fn test_unresolved_placeholder_fails_validation() {
        let content = BASIC.replace("ptla_test", "${PANEL_TEST_UNSET_KEY}");
        let config = PanelConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.pterodactyl.api_key, "${PANEL_TEST_UNSET_KEY}");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation() {
        let config =
            PanelConfig::from_toml_str(&BASIC.replace("https://panel.example.com/", "panel")).unwrap();
        assert!(config.validate().is_err());

        let mut config = PanelConfig::from_toml_str(BASIC).unwrap();
        config.pterodactyl.request_timeout_seconds = Some(0);
        assert!(config.validate().is_err());

        let mut config = PanelConfig::from_toml_str(BASIC).unwrap();
        config.http.path = "create".to_string();
        assert!(config.validate().is_err());

        // 與內建的 /healthz 或 axum 的路徑參數衝突
        for path in ["/healthz", "/api/:kind", "/api/*rest"] {
            let mut config = PanelConfig::from_toml_str(BASIC).unwrap();
            config.http.path = path.to_string();
            assert!(config.validate().is_err(), "{path} should be rejected");
        }
    }

    #[test]
    fn test_missing_section_is_a_config_error() {
        let err = PanelConfig::from_toml_str("[pterodactyl]\ndomain = \"https://x\"\n").unwrap_err();
        assert!(matches!(err, ProvisionError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let content = format!(
            "[http]\nbind = \"127.0.0.1:8088\"\npath = \"/create\"\n\n[logging]\nfilter = \"panel_provisioner=debug\"\nformat = \"json\"\n{}",
            BASIC
        );
        temp_file.write_all(content.as_bytes()).unwrap();

        let config = PanelConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:8088");
        assert_eq!(config.route_path(), "/create");
        assert_eq!(config.logging.filter.as_deref(), Some("panel_provisioner=debug"));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_config_from_env() {
        std::env::set_var("PTERODACTYL_DOMAIN", "https://panel.example.com");
        std::env::set_var("PTERODACTYL_API_KEY", "ptla_env");
        std::env::set_var("PTERODACTYL_EGG_ID", "15");
        std::env::set_var("PTERODACTYL_DOCKER_IMAGE", "ghcr.io/parkervcp/yolks:nodejs_18");
        std::env::set_var("PTERODACTYL_STARTUP", "node index.js");
        std::env::set_var("PTERODACTYL_LOCATION_ID", "2");
        std::env::set_var("PTERODACTYL_DISK", "1024");
        std::env::set_var("PTERODACTYL_ENVIRONMENT", r#"{"CMD_RUN": "node index.js"}"#);

        let config = PanelConfig::from_env().unwrap();
        assert_eq!(config.pterodactyl.api_key, "ptla_env");
        assert_eq!(config.server.location_id, 2);
        assert_eq!(config.server.disk, 1024);
        assert_eq!(config.server.cpu, 0);
        assert_eq!(config.server.environment.len(), 1);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate().is_ok());

        std::env::set_var("PTERODACTYL_EGG_ID", "fifteen");
        assert!(PanelConfig::from_env().is_err());

        for name in [
            "PTERODACTYL_DOMAIN",
            "PTERODACTYL_API_KEY",
            "PTERODACTYL_EGG_ID",
            "PTERODACTYL_DOCKER_IMAGE",
            "PTERODACTYL_STARTUP",
            "PTERODACTYL_LOCATION_ID",
            "PTERODACTYL_DISK",
            "PTERODACTYL_ENVIRONMENT",
        ] {
            std::env::remove_var(name);
        }
    }
}
