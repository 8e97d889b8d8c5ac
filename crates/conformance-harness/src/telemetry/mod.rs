//! Structured logging for conformance runs.

use std::io::{self, IsTerminal};

use conformance_config::{LogFormat, LogSettings};
use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Handle returned once telemetry is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured filter expression did not parse.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Another global subscriber was already installed.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the global subscriber on first use.
///
/// The filter is parsed on every call. Once a subscriber is installed,
/// later calls with a valid filter return a fresh [`TelemetryHandle`]
/// without touching the global state.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] for an unparseable filter and
/// [`TelemetryError::Subscriber`] when a foreign subscriber is already
/// installed.
pub fn initialise(settings: &LogSettings) -> Result<TelemetryHandle, TelemetryError> {
    let filter = parse_filter(settings)?;
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(filter, settings.format))
        .map(|()| TelemetryHandle)
}

fn parse_filter(settings: &LogSettings) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(&settings.filter).map_err(|error| TelemetryError::Filter(error.to_string()))
}

fn install_subscriber(filter: EnvFilter, format: LogFormat) -> Result<(), TelemetryError> {
    let builder = |filter: EnvFilter| {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .with_timer(fmt::time::UtcTime::rfc_3339())
    };

    let subscriber: Box<dyn Subscriber + Send + Sync> = match format {
        LogFormat::Json => Box::new(builder(filter).json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder(filter).compact().finish()),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use conformance_config::{LogFormat, LogSettings};

    use super::*;

    #[test]
    fn bad_filter_is_rejected_before_installing() {
        let settings = LogSettings {
            filter: String::from("conformance=loudest"),
            format: LogFormat::Compact,
        };
        let err = parse_filter(&settings).expect_err("bad filter");
        assert!(matches!(err, TelemetryError::Filter(_)));
    }

    #[test]
    fn bad_filter_is_rejected_after_installing() {
        initialise(&LogSettings::default()).expect("install");
        let settings = LogSettings {
            filter: String::from("conformance=loudest"),
            format: LogFormat::Json,
        };
        let err = initialise(&settings).expect_err("bad filter");
        assert!(matches!(err, TelemetryError::Filter(_)));
    }

    #[test]
    fn initialise_is_idempotent() {
        let settings = LogSettings {
            filter: String::from("conformance=debug"),
            format: LogFormat::Json,
        };
        initialise(&settings).expect("first install");
        initialise(&LogSettings::default()).expect("second call reuses the subscriber");
    }
}
