use anyhow::Context;
use fanflux_net::{LogFormat, ServerConfig};
use tracing_subscriber::EnvFilter;

fn build_filter(directive: &str) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(directive).with_context(|| format!("invalid log level directive `{}`", directive))
}

/// Installs the global subscriber. Call once, before anything logs.
pub fn init_logging(config: &ServerConfig) -> anyhow::Result<()> {
    let filter = build_filter(&config.log_level)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true);

    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
    Ok(())
}
