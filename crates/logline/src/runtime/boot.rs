//! Boot: logging init, config load, parser creation.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::{ConfigError, ParserConfig};
use crate::parser::{LogParser, Parser};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "logline=info";

/// Initialise the tracing / logging subsystem.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging() {
    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_err() {
        tracing::debug!("Global subscriber already installed, keeping it");
    }
}

/// Load config (file or env) and build a parser from it.
pub fn boot() -> Result<(Parser, ParserConfig), ConfigError> {
    let config = ParserConfig::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;
    info!(
        "Loaded configuration: format={}, max_line_size={}, metrics={}",
        config.format, config.max_line_size, config.metrics
    );

    let parser = Parser::from_config(&config)?;
    info!("Initialized {} parser", parser.format().name());

    Ok((parser, config))
}
