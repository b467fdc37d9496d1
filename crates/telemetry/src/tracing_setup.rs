//! Tracing setup for structured logging.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when neither `RUST_LOG` nor a config filter is usable.
const DEFAULT_FILTER: &str = "info,tower_http=info";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable, one line per event.
    Pretty,
    /// One JSON object per event, for log shippers.
    Json,
}

impl LogFormat {
    /// Interpret a `LOG_JSON` style flag ("1" / "true" select JSON).
    pub fn from_flag(flag: &str) -> Self {
        match flag.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Tracing configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Filter directives (e.g. "info", "api=debug,record_store=debug")
    pub filter: String,
    pub format: LogFormat,
    /// Include file and line of the call site (JSON output only)
    pub with_location: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::Pretty,
            with_location: false,
        }
    }
}

impl TracingConfig {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self.with_location = format == LogFormat::Json;
        self
    }
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed (tests install
/// one per process at most once).
pub fn init_tracing(config: &TracingConfig) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(config.with_location)
                    .with_line_number(config.with_location),
            )
            .try_init()
            .is_ok(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true))
            .try_init()
            .is_ok(),
    };

    if installed {
        tracing::info!(filter = %config.filter, format = ?config.format, "Tracing initialized");
    }
    installed
}

/// Initialize tracing from `RUST_LOG` and `LOG_JSON`.
pub fn init_tracing_from_env() -> bool {
    let format = std::env::var("LOG_JSON")
        .map(|v| LogFormat::from_flag(&v))
        .unwrap_or(LogFormat::Pretty);

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string());

    init_tracing(&TracingConfig::default().with_filter(filter).with_format(format))
}
