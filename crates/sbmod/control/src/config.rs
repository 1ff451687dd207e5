//! Engine settings

use sbmod_graph::PLACEHOLDER_SUBSCRIPTION_ID;
use serde::{Deserialize, Serialize};

/// Main engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Cloud provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Plan application settings
    #[serde(default)]
    pub apply: ApplyConfig,
}

/// Cloud provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Subscription id used in provider resource ids
    #[serde(default = "default_subscription_id")]
    pub subscription_id: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            subscription_id: default_subscription_id(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,

    /// Include timestamps
    #[serde(default = "default_true")]
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            timestamps: true,
        }
    }
}

/// Plan application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyConfig {
    /// Skip every remaining operation after the first failure
    #[serde(default)]
    pub stop_on_first_failure: bool,
}

fn default_subscription_id() -> String {
    PLACEHOLDER_SUBSCRIPTION_ID.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl EngineConfig {
    /// Load settings: defaults, then an optional file, then `SBMOD_`
    /// environment variables (`SBMOD_PROVIDER__SUBSCRIPTION_ID`)
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&EngineConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Section and key names contain underscores, so nesting uses a double one
        builder = builder.add_source(
            config::Environment::with_prefix("SBMOD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
