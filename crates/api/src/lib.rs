pub mod config;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod routes;

pub use config::{AppConfig, LogFormat, LoggingConfig};
pub use error::ApiError;
pub use pipeline::{Pipeline, TextAnalysis};
pub use routes::{AppState, router};

use tracing_subscriber::EnvFilter;

/// RUST_LOG wins over the configured filter. Logs go to stderr so the CLI's
/// stdout stays valid JSON.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
