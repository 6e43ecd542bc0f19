//! Process-wide tracing subscriber

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::{LogFormat, LoggingConfig};

/// Used when neither `RUST_LOG` nor the configured level parses
const FALLBACK_LEVEL: &str = "info";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Level filter for account logs. `RUST_LOG` wins over the configured level.
pub fn account_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL))
}

fn output_layer(format: &LogFormat) -> BoxedLayer {
    let base = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE);

    match format {
        LogFormat::Json => base.json().with_current_span(true).boxed(),
        LogFormat::Pretty => base.pretty().boxed(),
    }
}

/// Install the global subscriber; fails if one is already set
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let layer = output_layer(&config.format).with_filter(account_filter(&config.level));

    tracing_subscriber::registry().with(layer).try_init()?;

    tracing::info!(level = %config.level, format = ?config.format, "Logging initialized");
    Ok(())
}
