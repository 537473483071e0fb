use crate::error::AppError;
use tracing::Subscriber;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    Pretty,
    /// Bunyan JSON records
    Json,
}

impl LogFormat {
    /// Reads `AGRIPILOT_LOG_FORMAT` (`json` or anything else for pretty).
    pub fn from_env() -> Self {
        match std::env::var("AGRIPILOT_LOG_FORMAT") {
            Ok(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Builds a subscriber writing to `writer`. `RUST_LOG` drives filtering, `info` otherwise.
pub fn build_subscriber<W>(app_name: &str, format: LogFormat, writer: W) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => Box::new(
            Registry::default()
                .with(filter)
                .with(JsonStorageLayer)
                .with(BunyanFormattingLayer::new(app_name.to_string(), writer)),
        ),
        LogFormat::Pretty => Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(writer)
                .finish(),
        ),
    }
}

/// Installs the global subscriber on stderr; stdout is left to command output.
pub fn init_tracing(app_name: &str, format: LogFormat) -> Result<(), AppError> {
    tracing::subscriber::set_global_default(build_subscriber(app_name, format, std::io::stderr))
        .map_err(|e| AppError::Config(format!("Failed to install tracing subscriber: {}", e)))
}
