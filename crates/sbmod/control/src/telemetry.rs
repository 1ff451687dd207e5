//! Logging initialization

use crate::config::LoggingConfig;
use crate::error::{ProvisionError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Fails if a
/// subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ProvisionError::Telemetry(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match (config.json, config.timestamps) {
        (true, _) => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        (false, true) => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        (false, false) => registry
            .with(tracing_subscriber::fmt::layer().without_time())
            .try_init(),
    };

    result.map_err(|e| ProvisionError::Telemetry(e.to_string()))
}
