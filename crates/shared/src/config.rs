//! Application configuration management.
//!
//! Sources, lowest precedence first: `config/default.toml`,
//! `config/{RUN_MODE}.toml`, then `SPENDFLOW__SECTION__KEY` environment variables.
//! Every field has a default, so an empty environment yields a runnable config.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Approver resolution policy.
    pub approval: ApprovalConfig,
    /// Foreign-exchange client configuration.
    pub fx: FxConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Demo data seeding.
    pub seed: SeedConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
        }
    }
}

/// Approver resolution policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApprovalConfig {
    /// How many levels of the submitter's manager chain must approve.
    pub manager_chain_depth: usize,
    /// Amount above which company admins join the approver set.
    /// `None` disables escalation.
    pub escalation_threshold: Option<Decimal>,
    /// Whether company admins are designated approvers at all.
    pub include_company_admins: bool,
}

impl Default for ApprovalConfig {
    fn default() -> Self {
        Self {
            manager_chain_depth: 1,
            escalation_threshold: Some(Decimal::new(500, 0)),
            include_company_admins: true,
        }
    }
}

/// Foreign-exchange client configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FxConfig {
    /// Base URL of the exchange-rate API; `/latest/{CODE}` is appended.
    pub base_url: String,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
    /// How long fetched rate tables stay cached.
    pub cache_ttl_secs: u64,
    /// Maximum number of cached base-currency rate tables.
    pub cache_capacity: u64,
    /// Currency used for converted display amounts.
    pub display_currency: Currency,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.exchangerate-api.com/v4".to_string(),
            timeout_secs: 5,
            cache_ttl_secs: 3600,
            cache_capacity: 64,
            display_currency: Currency::Usd,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of the human-readable format.
    pub json: bool,
    /// Filter directive used when `RUST_LOG` is not set.
    pub filter: Option<String>,
}

/// Demo data seeding.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Seed a demo company, users and expenses at startup.
    pub demo_data: bool,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SPENDFLOW").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Returns the `host:port` address the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
