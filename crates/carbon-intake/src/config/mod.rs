use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use chrono::Duration;

/// Scoring endpoint used when `API_URL` is not provided.
pub const DEFAULT_SCORING_API_URL: &str =
    "https://determined-faraday.187-45-182-250.plesk.page/api/analise-fazenda";

const DEFAULT_SESSION_TTL_MINUTES: i64 = 30;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let api_url = match env::var("API_URL") {
            Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
            _ => DEFAULT_SCORING_API_URL.to_string(),
        };
        reqwest::Url::parse(&api_url).map_err(|err| ConfigError::InvalidApiUrl {
            value: api_url.clone(),
            reason: err.to_string(),
        })?;

        let ttl_minutes = match env::var("APP_SESSION_TTL_MINUTES") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .ok_or(ConfigError::InvalidSessionTtl)?,
            Err(_) => DEFAULT_SESSION_TTL_MINUTES,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringConfig { api_url },
            session: SessionConfig {
                idle_ttl: Duration::minutes(ttl_minutes),
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Location of the external scoring service the proxy relays to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringConfig {
    pub api_url: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_SCORING_API_URL.to_string(),
        }
    }
}

/// Lifetime of a visitor's session-scoped store.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub idle_ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl: Duration::minutes(DEFAULT_SESSION_TTL_MINUTES),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidApiUrl { value: String, reason: String },
    InvalidSessionTtl,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidApiUrl { value, reason } => {
                write!(f, "API_URL '{value}' is not a valid URL ({reason})")
            }
            ConfigError::InvalidSessionTtl => {
                write!(f, "APP_SESSION_TTL_MINUTES must be a positive number of minutes")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidApiUrl { .. }
            | ConfigError::InvalidSessionTtl => None,
        }
    }
}
