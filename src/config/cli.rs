use crate::config::toml_config::{
    CorsConfig, DatabaseConfig, ServerConfig, ServiceConfig, DEFAULT_DATABASE_URL,
    DEFAULT_LISTEN_ADDR, DEFAULT_MAX_CONNECTIONS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "crew-vouchers")]
#[command(about = "Crew meal-voucher seat assignment service")]
pub struct CliConfig {
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    #[arg(long, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: String,

    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    #[arg(long, value_delimiter = ',', default_value = "*")]
    pub allowed_origins: Vec<String>,

    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// The effective service settings: the TOML file when `--config` is
    /// given, the flags otherwise.
    pub fn resolve(&self) -> Result<ServiceConfig> {
        if let Some(path) = &self.config {
            return ServiceConfig::from_file(path);
        }

        Ok(ServiceConfig {
            server: ServerConfig {
                listen_addr: self.listen_addr.clone(),
                request_timeout_seconds: Some(self.request_timeout_secs),
            },
            database: DatabaseConfig {
                url: self.database_url.clone(),
                max_connections: Some(self.max_connections),
            },
            cors: CorsConfig {
                allowed_origins: self.allowed_origins.clone(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ConfigProvider;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_flags_resolve_to_service_config() {
        let cli = CliConfig::parse_from([
            "crew-vouchers",
            "--database-url",
            "sqlite::memory:",
            "--listen-addr",
            "127.0.0.1:9999",
            "--allowed-origins",
            "http://a.test,http://b.test",
        ]);
        let config = cli.resolve().unwrap();
        assert_eq!(config.database_url(), "sqlite::memory:");
        assert_eq!(config.listen_addr(), "127.0.0.1:9999");
        assert_eq!(config.max_connections(), DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.request_timeout_secs(), 15);
        assert_eq!(config.allowed_origins().len(), 2);
    }

    #[test]
    fn test_config_file_takes_precedence() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nlisten_addr = \"127.0.0.1:7000\"\n")
            .unwrap();

        let cli = CliConfig::parse_from([
            "crew-vouchers",
            "--listen-addr",
            "127.0.0.1:9999",
            "--config",
            temp_file.path().to_str().unwrap(),
        ]);
        let config = cli.resolve().unwrap();
        assert_eq!(config.listen_addr(), "127.0.0.1:7000");
    }
}
