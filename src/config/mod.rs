use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

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
    pub ratings: RatingsConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            ratings: RatingsConfig::load()?,
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where and how to reach the professor ratings service.
#[derive(Debug, Clone)]
pub struct RatingsConfig {
    pub graphql_url: reqwest::Url,
    pub auth_token: String,
    /// Raw numeric school id; encoded at the remote boundary.
    pub school_id: String,
}

impl RatingsConfig {
    const DEFAULT_GRAPHQL_URL: &'static str = "https://www.ratemyprofessors.com/graphql";
    const DEFAULT_AUTH_TOKEN: &'static str = "Basic dGVzdDp0ZXN0";
    const DEFAULT_SCHOOL_ID: &'static str = "509";

    fn load() -> Result<Self, ConfigError> {
        let raw_url =
            env::var("RMP_GRAPHQL_URL").unwrap_or_else(|_| Self::DEFAULT_GRAPHQL_URL.to_string());
        let graphql_url = reqwest::Url::parse(&raw_url)
            .map_err(|_| ConfigError::InvalidRatingsUrl { value: raw_url })?;

        let auth_token =
            env::var("RMP_AUTH_TOKEN").unwrap_or_else(|_| Self::DEFAULT_AUTH_TOKEN.to_string());

        let school_id =
            env::var("RMP_SCHOOL_ID").unwrap_or_else(|_| Self::DEFAULT_SCHOOL_ID.to_string());
        if school_id.is_empty() || !school_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidSchoolId { value: school_id });
        }

        Ok(Self {
            graphql_url,
            auth_token,
            school_id,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRatingsUrl { value: String },
    InvalidSchoolId { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRatingsUrl { value } => {
                write!(f, "RMP_GRAPHQL_URL '{value}' is not a valid URL")
            }
            ConfigError::InvalidSchoolId { value } => {
                write!(f, "RMP_SCHOOL_ID '{value}' must be a numeric id")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidRatingsUrl { .. }
            | ConfigError::InvalidSchoolId { .. } => None,
        }
    }
}
