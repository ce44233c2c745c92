//! Diagnostics for the `clicker` binary.
//!
//! Everything goes to stderr; stdout belongs to the game. The clicker crates
//! log at `warn` and dependencies only surface errors, unless `RUST_LOG` says
//! otherwise.

use tracing_subscriber::{fmt, EnvFilter};

/// Directives used when `RUST_LOG` is unset or unparsable
pub const DEFAULT_FILTER: &str = "error,clicker=warn,clicker_core=warn,clicker_console=warn";

/// Set to `1` (or `true`) for one JSON object per event
pub const JSON_ENV: &str = "CLICKER_LOG_JSON";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("1") => LogFormat::Json,
            Some(v) if v.eq_ignore_ascii_case("true") => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

fn build_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = build_filter(directives.as_deref());
    let format = LogFormat::from_env_value(std::env::var(JSON_ENV).ok().as_deref());

    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().without_time().try_init(),
    };
    if installed.is_ok() {
        tracing::debug!(?format, "logging initialised");
    }
}
