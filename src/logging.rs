use anyhow::Result;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::APP_NAME;

/// Initializes logging to stderr, keeping stdout free for the report stream.
pub fn initialize() -> Result<()> {
    let env = format!("warn,{APP_NAME}=info");
    let env_filter = tracing_subscriber::filter::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new(env));

    let stderr_subscriber = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(true)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stderr_subscriber).init();

    Ok(())
}
