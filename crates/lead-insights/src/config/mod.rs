//! Environment-driven settings. A `.env` file in the working directory is
//! read first; real environment variables win over it.

use std::env;
use std::fmt;
use std::net::{AddrParseError, IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::workflows::outreach::DEFAULT_SOURCE_FILE;

const ENV_APP_ENV: &str = "APP_ENV";
const ENV_HOST: &str = "APP_HOST";
const ENV_PORT: &str = "APP_PORT";
const ENV_LOG_LEVEL: &str = "APP_LOG_LEVEL";
const ENV_SOURCE_PATH: &str = "LEADS_SOURCE_PATH";
const ENV_SHEET: &str = "LEADS_SHEET";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    /// Unknown labels fall back to `Development`.
    fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub leads: LeadSourceConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = non_empty_var(ENV_APP_ENV)
            .map(|label| AppEnvironment::parse(&label))
            .unwrap_or(AppEnvironment::Development);

        Ok(Self {
            environment,
            server: ServerConfig::from_env()?,
            telemetry: TelemetryConfig::from_env(),
            leads: LeadSourceConfig::from_env(),
        })
    }
}

/// Where the HTTP service binds.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let host = non_empty_var(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match non_empty_var(ENV_PORT) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value: raw })?,
            None => DEFAULT_PORT,
        };
        Ok(Self { host, port })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse::<IpAddr>()
                .map_err(|source| ConfigError::InvalidHost {
                    value: self.host.clone(),
                    source,
                })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl TelemetryConfig {
    fn from_env() -> Self {
        Self {
            log_level: non_empty_var(ENV_LOG_LEVEL)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

/// Where the outreach spreadsheet lives and which worksheet to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadSourceConfig {
    pub source_path: PathBuf,
    pub sheet: Option<String>,
}

impl LeadSourceConfig {
    fn from_env() -> Self {
        Self {
            source_path: non_empty_var(ENV_SOURCE_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_FILE)),
            sheet: non_empty_var(ENV_SHEET),
        }
    }
}

impl Default for LeadSourceConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE_FILE),
            sheet: None,
        }
    }
}

/// Trimmed value of `key`; unset and blank are treated alike.
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort { value: String },
    InvalidHost { value: String, source: AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { value } => {
                write!(f, "{ENV_PORT} must be a port number, got '{value}'")
            }
            ConfigError::InvalidHost { value, .. } => write!(
                f,
                "{ENV_HOST} must be 'localhost' or an IP address, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort { .. } => None,
            ConfigError::InvalidHost { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard, OnceLock};

    const ALL_VARS: [&str; 6] = [
        ENV_APP_ENV,
        ENV_HOST,
        ENV_PORT,
        ENV_LOG_LEVEL,
        ENV_SOURCE_PATH,
        ENV_SHEET,
    ];

    /// Serializes env mutation across tests and starts from a clean slate.
    fn isolated_env() -> MutexGuard<'static, ()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        let guard = GUARD
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for key in ALL_VARS {
            env::remove_var(key);
        }
        guard
    }

    #[test]
    fn defaults_apply_without_environment() {
        let _env = isolated_env();
        let config = AppConfig::load().expect("defaults load");

        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.telemetry.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.leads, LeadSourceConfig::default());
        assert_eq!(config.leads.source_path, PathBuf::from("dashboard_rank.xlsx"));
    }

    #[test]
    fn localhost_binds_loopback() {
        let _env = isolated_env();
        env::set_var(ENV_HOST, "LocalHost");
        env::set_var(ENV_APP_ENV, "prod");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(
            config.server.socket_addr().expect("localhost resolves"),
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT)
        );
    }

    #[test]
    fn malformed_port_and_host_are_rejected() {
        let _env = isolated_env();
        env::set_var(ENV_PORT, "not-a-port");
        let error = AppConfig::load().expect_err("port must be numeric");
        assert!(matches!(error, ConfigError::InvalidPort { ref value } if value == "not-a-port"));

        env::remove_var(ENV_PORT);
        env::set_var(ENV_HOST, "leads.internal");
        let config = AppConfig::load().expect("host is validated lazily");
        let error = config.server.socket_addr().expect_err("hostname is not an IP");
        assert!(error.to_string().contains("leads.internal"));
        env::remove_var(ENV_HOST);
    }

    #[test]
    fn lead_source_reads_path_and_trimmed_sheet() {
        let _env = isolated_env();
        env::set_var(ENV_SOURCE_PATH, "data/leads.csv");
        env::set_var(ENV_SHEET, "  Outreach ");

        let leads = AppConfig::load().expect("config loads").leads;
        assert_eq!(leads.source_path, PathBuf::from("data/leads.csv"));
        assert_eq!(leads.sheet.as_deref(), Some("Outreach"));

        env::set_var(ENV_SHEET, "   ");
        assert!(AppConfig::load().expect("config loads").leads.sheet.is_none());
        for key in [ENV_SOURCE_PATH, ENV_SHEET] {
            env::remove_var(key);
        }
    }
}
