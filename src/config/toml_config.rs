use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, VoucherError};
use crate::utils::validation::{
    validate_database_url, validate_positive_number, validate_socket_addr, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/vouchers.db";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            request_timeout_seconds: None,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: None,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"))
}

impl ServiceConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| VoucherError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATABASE_URL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl ConfigProvider for ServiceConfig {
    fn database_url(&self) -> &str {
        &self.database.url
    }

    fn listen_addr(&self) -> &str {
        &self.server.listen_addr
    }

    fn max_connections(&self) -> u32 {
        self.database.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }

    fn request_timeout_secs(&self) -> u64 {
        self.server
            .request_timeout_seconds
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    fn allowed_origins(&self) -> &[String] {
        &self.cors.allowed_origins
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        validate_socket_addr("server.listen_addr", self.listen_addr())?;
        validate_database_url("database.url", self.database_url())?;
        validate_positive_number("database.max_connections", self.max_connections() as usize, 1)?;
        validate_positive_number(
            "server.request_timeout_seconds",
            self.request_timeout_secs() as usize,
            1,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[server]
listen_addr = "127.0.0.1:9000"
request_timeout_seconds = 30

[database]
url = "sqlite://./tmp/vouchers.db"
max_connections = 8

[cors]
allowed_origins = ["http://localhost:3000"]
"#;

        let config = ServiceConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.listen_addr(), "127.0.0.1:9000");
        assert_eq!(config.request_timeout_secs(), 30);
        assert_eq!(config.database_url(), "sqlite://./tmp/vouchers.db");
        assert_eq!(config.max_connections(), 8);
        assert_eq!(config.allowed_origins(), ["http://localhost:3000".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = ServiceConfig::from_toml_str("").unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.listen_addr(), DEFAULT_LISTEN_ADDR);
        assert_eq!(config.max_connections(), DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.request_timeout_secs(), DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CREW_VOUCHERS_TEST_DB", "sqlite://./from-env.db");

        let toml_content = r#"
[database]
url = "${CREW_VOUCHERS_TEST_DB}"
"#;

        let config = ServiceConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.database.url, "sqlite://./from-env.db");

        std::env::remove_var("CREW_VOUCHERS_TEST_DB");
    }

    #[test]
    fn test_unset_env_var_is_left_in_place() {
        let toml_content = r#"
[database]
url = "${CREW_VOUCHERS_SURELY_UNSET}"
"#;
        let config = ServiceConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.database.url, "${CREW_VOUCHERS_SURELY_UNSET}");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[server]
listen_addr = "not-an-address"
"#;
        let config = ServiceConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[database]
url = "sqlite::memory:"
max_connections = 0
"#;
        let config = ServiceConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = ServiceConfig::from_toml_str("[server\nlisten_addr = 1").unwrap_err();
        assert!(matches!(err, VoucherError::Config { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[server]
listen_addr = "0.0.0.0:8080"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = ServiceConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
    }
}
