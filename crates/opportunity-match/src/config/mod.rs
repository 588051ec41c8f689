use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::applications::ReapplyPolicy;
use crate::matching::weights::{DEFAULT_SKILL_WEIGHT, DEFAULT_TAG_WEIGHT};
use crate::matching::{InvalidWeightConfiguration, MatchWeights};

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
    pub matching: MatchingConfig,
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

        let skill = weight_var("MATCH_SKILL_WEIGHT", DEFAULT_SKILL_WEIGHT)?;
        let tag = weight_var("MATCH_TAG_WEIGHT", DEFAULT_TAG_WEIGHT)?;
        let weights = MatchWeights::new(skill, tag)
            .map_err(|source| ConfigError::InvalidWeights { source })?;

        let reapply = match env::var("REAPPLY_POLICY") {
            Ok(value) => value
                .parse::<ReapplyPolicy>()
                .map_err(|value| ConfigError::InvalidReapplyPolicy { value })?,
            Err(_) => ReapplyPolicy::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            matching: MatchingConfig { weights, reapply },
        })
    }
}

fn weight_var(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::InvalidWeightValue { name, raw }),
        Err(_) => Ok(default),
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Initial scoring weights and the re-apply rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchingConfig {
    pub weights: MatchWeights,
    pub reapply: ReapplyPolicy,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidWeightValue {
        name: &'static str,
        raw: String,
    },
    InvalidWeights {
        source: InvalidWeightConfiguration,
    },
    InvalidReapplyPolicy {
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWeightValue { name, raw } => {
                write!(f, "{name} must be a decimal number, got '{raw}'")
            }
            ConfigError::InvalidWeights { source } => {
                write!(f, "MATCH_SKILL_WEIGHT/MATCH_TAG_WEIGHT rejected: {source}")
            }
            ConfigError::InvalidReapplyPolicy { value } => {
                write!(f, "REAPPLY_POLICY must be 'reset' or 'keep', got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidWeights { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidWeightValue { .. }
            | ConfigError::InvalidReapplyPolicy { .. } => None,
        }
    }
}
