//! Application configuration.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Payment configuration.
    pub payments: PaymentsConfig,
    /// Video metadata provider configuration.
    pub video: VideoConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Payment gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentsConfig {
    /// Gateway API base URL.
    pub gateway_url: String,
    /// Gateway API key.
    pub api_key: String,
    /// Secret used to verify incoming transfer-status webhooks.
    pub webhook_secret: String,
    /// Platform fee rate as a fraction of the gross payment (e.g. 0.05 = 5%).
    #[serde(default = "default_fee_rate")]
    pub fee_rate: Decimal,
    /// Timeout for transfer calls, in seconds.
    #[serde(default = "default_provider_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Video metadata provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoConfig {
    /// Provider API base URL.
    pub provider_url: String,
    /// Provider API key.
    pub api_key: String,
    /// Timeout for metadata calls, in seconds.
    #[serde(default = "default_provider_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

fn default_fee_rate() -> Decimal {
    Decimal::new(5, 2) // 0.05
}

const fn default_provider_timeout_secs() -> u64 {
    15
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `CLIPCOMMERCE_ENV`)
    /// 3. Environment variables with `CLIPCOMMERCE_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load .env if present; real environment variables win
        dotenvy::dotenv().ok();

        let env = std::env::var("CLIPCOMMERCE_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("CLIPCOMMERCE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
