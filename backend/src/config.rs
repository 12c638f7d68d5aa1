//! Configuration management for the Inventory Procurement Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with IPP_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Auto-replenishment scheduler configuration
    pub scheduler: SchedulerConfig,

    /// Procurement alert configuration
    pub notification: NotificationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SchedulerConfig {
    /// Whether the recurring auto-replenishment task runs at all
    pub enabled: bool,

    /// Seconds between ticks; candidate times are minute-granular
    pub tick_seconds: u64,

    /// Cool-down window: an AUTO proposal within this many minutes
    /// suppresses another trigger for the same SKU
    pub proposal_cooldown_minutes: i64,

    /// A tick older than this is considered stuck and its run state is
    /// auto-released
    pub max_tick_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    /// Webhook endpoint procurement alerts are POSTed to; alerts are
    /// skipped when unset
    pub webhook_url: Option<String>,

    /// Recipients included in the alert payload
    pub recipients: Vec<String>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("IPP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("scheduler.enabled", true)?
            .set_default("scheduler.tick_seconds", 60)?
            .set_default("scheduler.proposal_cooldown_minutes", 5)?
            .set_default("scheduler.max_tick_seconds", 300)?
            .set_default("notification.recipients", Vec::<String>::new())?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (IPP_ prefix)
            .add_source(
                Environment::with_prefix("IPP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
