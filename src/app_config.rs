// Centralized configuration management for the Wari Rewards backend
// Load ALL env vars ONCE at startup

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Global application configuration loaded once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    // For tests, load .env file first
    #[cfg(test)]
    dotenv::dotenv().ok();

    AppConfig::from_env().expect("Failed to load configuration")
});

/// Accessor used throughout the codebase
pub fn config() -> &'static AppConfig {
    &CONFIG
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    // Server
    pub bind_address: String,
    pub environment: Environment,
    /// Default tracing filter when RUST_LOG is not set in the process env
    pub rust_log: String,

    // Database
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_min_connections: u32,
    pub database_connect_timeout: u64,
    pub database_idle_timeout: u64,
    pub database_max_lifetime: u64,

    // JWT
    pub jwt_access_secret: String,
    pub jwt_access_expiry: u64,
    pub jwt_audience: String,
    pub jwt_issuer: String,

    // Reward amounts (integers, Francs CFA)
    pub rewards: RewardConfig,

    // Payment providers
    pub orange: OrangeConfig,
    pub mchain: MChainConfig,

    // Security
    pub webhook_secret: String,
    pub admin_token: String,

    // Features
    pub disable_embedded_migrations: bool,
}

/// Environment type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Fixed reward amounts, overridable per deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardConfig {
    /// One-time fee charged at registration
    pub registration_fee: i32,
    /// Credited to the referrer when a referred user's payment confirms
    pub referral_bonus: i32,
    /// Credited once per (user, video) claim
    pub video_reward: i32,
}

/// Orange payment provider credentials (no real outbound call is made;
/// kept so a live integration can slot in without config changes)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrangeConfig {
    pub client_id: String,
    pub client_secret: String,
    pub api_base: String,
    pub merchant_id: String,
}

/// M-Chain payment provider credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MChainConfig {
    pub api_key: String,
    pub api_base: String,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Helper function to get required env var
        let get_required = |key: &str| -> Result<String, ConfigError> {
            env::var(key).map_err(|_| ConfigError::MissingVar(key.to_string()))
        };

        // Helper function to get optional env var with default
        let get_or_default = |key: &str, default: &str| -> String {
            env::var(key).unwrap_or_else(|_| default.to_string())
        };

        // Helper function to parse env var with default
        let parse_or_default = |key: &str, default: &str| -> Result<u32, ConfigError> {
            get_or_default(key, default).parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid u32".to_string())
            })
        };

        let parse_u64_or_default = |key: &str, default: &str| -> Result<u64, ConfigError> {
            get_or_default(key, default).parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid u64".to_string())
            })
        };

        let parse_amount = |key: &str, default: &str| -> Result<i32, ConfigError> {
            let value: i32 = get_or_default(key, default).parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid amount".to_string())
            })?;
            if value < 0 {
                return Err(ConfigError::InvalidValue(
                    key.to_string(),
                    "amount must not be negative".to_string(),
                ));
            }
            Ok(value)
        };

        let parse_bool_or_default = |key: &str, default: &str| -> bool {
            get_or_default(key, default).to_lowercase() == "true"
        };

        let bind_address = get_or_default("BIND_ADDRESS", "0.0.0.0:8080");

        let environment_str = get_or_default("ENVIRONMENT", "development");
        let environment = Environment::from(environment_str);

        let database_url = get_required("DATABASE_URL")?;
        let database_max_connections = parse_or_default("DATABASE_MAX_CONNECTIONS", "20")?;
        let database_min_connections = parse_or_default("DATABASE_MIN_CONNECTIONS", "2")?;
        let database_connect_timeout = parse_u64_or_default("DATABASE_CONNECT_TIMEOUT", "30")?;
        let database_idle_timeout = parse_u64_or_default("DATABASE_IDLE_TIMEOUT", "600")?;
        let database_max_lifetime = parse_u64_or_default("DATABASE_MAX_LIFETIME", "1800")?;

        // JWT secret validation
        let jwt_access_secret = get_required("JWT_ACCESS_SECRET")?;
        if jwt_access_secret.len() < 32 {
            return Err(ConfigError::InvalidValue(
                "JWT_ACCESS_SECRET".to_string(),
                "Secret must be at least 32 characters long".to_string(),
            ));
        }
        let jwt_access_expiry = parse_u64_or_default("JWT_ACCESS_EXPIRY", "3600")?;
        let jwt_audience = get_or_default("JWT_AUDIENCE", "wari.app");
        let jwt_issuer = get_or_default("JWT_ISSUER", "wari.app");

        let rewards = RewardConfig {
            registration_fee: parse_amount("REGISTRATION_FEE", "3000")?,
            referral_bonus: parse_amount("REFERRAL_BONUS", "1000")?,
            video_reward: parse_amount("VIDEO_REWARD", "250")?,
        };

        let orange = OrangeConfig {
            client_id: get_or_default("ORANGE_CLIENT_ID", ""),
            client_secret: get_or_default("ORANGE_CLIENT_SECRET", ""),
            api_base: get_or_default("ORANGE_API_BASE", "https://api.orange.com"),
            merchant_id: get_or_default("ORANGE_MERCHANT_ID", ""),
        };

        let mchain = MChainConfig {
            api_key: get_or_default("MCHAIN_API_KEY", ""),
            api_base: get_or_default("MCHAIN_API_BASE", "https://api.maschain.com"),
        };

        // Inbound payment confirmations must present this secret; the
        // simulated webhook is never exposed unauthenticated
        let webhook_secret = get_required("WEBHOOK_SECRET")?;
        if webhook_secret.len() < 16 {
            return Err(ConfigError::InvalidValue(
                "WEBHOOK_SECRET".to_string(),
                "Secret must be at least 16 characters long".to_string(),
            ));
        }

        let admin_token = get_required("ADMIN_TOKEN")?;
        if admin_token.len() < 16 {
            return Err(ConfigError::InvalidValue(
                "ADMIN_TOKEN".to_string(),
                "Token must be at least 16 characters long".to_string(),
            ));
        }

        let disable_embedded_migrations =
            parse_bool_or_default("DISABLE_EMBEDDED_MIGRATIONS", "false");

        let rust_log = get_or_default("RUST_LOG", "wari_backend=debug,tower_http=info");

        Ok(AppConfig {
            bind_address,
            environment,
            rust_log,
            database_url,
            database_max_connections,
            database_min_connections,
            database_connect_timeout,
            database_idle_timeout,
            database_max_lifetime,
            jwt_access_secret,
            jwt_access_expiry,
            jwt_audience,
            jwt_issuer,
            rewards,
            orange,
            mchain,
            webhook_secret,
            admin_token,
            disable_embedded_migrations,
        })
    }
}
