// Logging/tracing setup for the Lambda binaries

use cfnres_config::{LogFormat, RuntimeConfig};

/// Initialize tracing/logging from RuntimeConfig
pub(crate) fn init_tracing(config: &RuntimeConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log = config.log();

    // Parse log level from config
    let env_filter = EnvFilter::try_new(&log.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // CloudWatch adds its own timestamps and does not render ANSI colours
    match log.format {
        LogFormat::Json => {
            registry
                .with(fmt::layer().json().with_ansi(false).without_time())
                .init();
        }
        LogFormat::Text => {
            registry
                .with(fmt::layer().with_ansi(false).without_time())
                .init();
        }
    }
}
