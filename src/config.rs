use std::env;

use thiserror::Error;

const DEV_SESSION_SECRET: &str = "dev-session-secret-change-this-in-production-12345";

/// Upper bound for `SESSION_TTL_HOURS` (30 days).
const MAX_SESSION_TTL_HOURS: u32 = 720;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("SESSION_SECRET must be set in production")]
    InsecureSessionSecret,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_access_key: String,
    pub database_max_connections: u32,
    pub session_secret: String,
    pub session_ttl_hours: u32, // absolute session lifetime
    pub bcrypt_cost: u32,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub client_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    /// This is useful for testing where you want to control the environment directly
    pub fn from_env_only() -> Result<Self, ConfigError> {
        let config = Config {
            database_url: required("DATABASE_URL")?,
            database_access_key: required("DATABASE_ACCESS_KEY")?,
            database_max_connections: parsed("DATABASE_MAX_CONNECTIONS", 5)?,
            session_secret: env::var("SESSION_SECRET")
                .unwrap_or_else(|_| DEV_SESSION_SECRET.to_string()),
            session_ttl_hours: session_ttl_hours()?,
            bcrypt_cost: parsed("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080)?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            client_base_url: env::var("CLIENT_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        };

        if config.is_production() && config.session_secret == DEV_SESSION_SECRET {
            return Err(ConfigError::InsecureSessionSecret);
        }

        Ok(config)
    }

    /// Fixed configuration for tests; never touches the environment.
    pub fn test_config() -> Self {
        Config {
            database_url: "postgres://localhost:5432/payroll_test".to_string(),
            database_access_key: "test-access-key".to_string(),
            database_max_connections: 1,
            session_secret: "test-session-secret-key-that-is-long-enough".to_string(),
            session_ttl_hours: 1,
            bcrypt_cost: 4,
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            client_base_url: "http://localhost:3000".to_string(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn session_ttl_hours() -> Result<u32, ConfigError> {
    let hours = parsed("SESSION_TTL_HOURS", 12u32)?;
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        return Err(ConfigError::Invalid {
            name: "SESSION_TTL_HOURS",
            value: hours.to_string(),
        });
    }
    Ok(hours)
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
