//! # Structured Logging
//!
//! The helpers emit `tracing` events: `debug` for every keeper call they
//! make and `warn` for every address they refuse to decode. Hosts that run
//! their own subscriber see these events with no extra setup. Simulators,
//! benches and other tools can install one from the `logging` section of
//! [`TransferConfig`](crate::config::TransferConfig) instead:
//!
//! ```json
//! { "logging": { "level": "nova_transfer=debug", "format": "json" } }
//! ```
//!
//! `level` takes any `EnvFilter` directive. When `RUST_LOG` is set,
//! [`init_logging`] uses it instead.

use std::fmt as std_fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

/// Filter directive used when the config leaves `level` out.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors raised while building or installing a subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// `level` is not a valid filter directive.
    #[error("invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    /// `format` is neither `pretty` nor `json`.
    #[error("unknown log format '{0}'")]
    UnknownFormat(String),

    /// A global subscriber is already installed.
    #[error(transparent)]
    AlreadyInstalled(#[from] TryInitError),
}

/// How events are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(LoggingError::UnknownFormat(s.to_string())),
        }
    }
}

impl std_fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std_fmt::Formatter<'_>) -> std_fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// The `logging` section of the transfer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `warn` or `nova_transfer=debug`.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Parses `level` into a filter.
    pub fn filter(&self) -> Result<EnvFilter, LoggingError> {
        EnvFilter::try_new(&self.level).map_err(|e| LoggingError::InvalidFilter {
            directive: self.level.clone(),
            reason: e.to_string(),
        })
    }
}

/// Builds a subscriber for `config` that writes to `writer`, without
/// installing it. `RUST_LOG` is not consulted.
pub fn build_subscriber<W>(
    config: &LoggingConfig,
    writer: W,
) -> Result<impl Subscriber + Send + Sync + 'static, LoggingError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = config.filter()?;
    Ok(Registry::default()
        .with(format_layer(config.format, writer))
        .with(filter))
}

fn format_layer<W>(format: LogFormat, writer: W) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_target(true)
            .boxed(),
    }
}

/// Installs the global subscriber, writing to stderr.
///
/// A valid `RUST_LOG` takes precedence over `config.level`. Installing twice
/// returns [`LoggingError::AlreadyInstalled`] rather than panicking.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let config = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(level) if EnvFilter::try_new(&level).is_ok() => LoggingConfig {
            level,
            format: config.format,
        },
        _ => config.clone(),
    };

    build_subscriber(&config, std::io::stderr)?.try_init()?;
    tracing::debug!(level = %config.level, format = %config.format, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::address::AccountAddress;
    use crate::config::{TransferConfig, DEFAULT_BECH32_PREFIX, DISTRIBUTION_MODULE};
    use crate::context::Context;
    use crate::keeper::MemoryLedger;
    use crate::transfer::TransferHelper;

    /// Collects everything a subscriber writes.
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn config(level: &str, format: LogFormat) -> LoggingConfig {
        LoggingConfig {
            level: level.to_string(),
            format,
        }
    }

    #[test]
    fn format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!(matches!(
            "xml".parse::<LogFormat>(),
            Err(LoggingError::UnknownFormat(_))
        ));
    }

    #[test]
    fn section_deserializes_with_defaults() {
        let parsed: LoggingConfig = serde_json::from_str(r#"{"format":"json"}"#).unwrap();
        assert_eq!(parsed.format, LogFormat::Json);
        assert_eq!(parsed.level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn bad_directive_rejected() {
        let err = config("nova_transfer=loud", LogFormat::Pretty)
            .filter()
            .unwrap_err();
        assert!(matches!(err, LoggingError::InvalidFilter { .. }));
    }

    #[test]
    fn rejected_address_logged_as_json() {
        let capture = Capture::default();
        let subscriber = build_subscriber(&config("warn", LogFormat::Json), capture.clone()).unwrap();
        let helper = TransferHelper::new(TransferConfig::default()).unwrap();
        let ledger = MemoryLedger::new();
        let ctx = Context::new("nova-test", 3);
        let to = AccountAddress::from_bytes([2; 20])
            .to_bech32(DEFAULT_BECH32_PREFIX)
            .unwrap();

        let result = tracing::subscriber::with_default(subscriber, || {
            helper.transfer_from_address_to_address(&ledger, &ctx, "not-an-address", &to, 5)
        });

        assert!(result.is_err());
        let output = capture.contents();
        assert!(output.contains("rejecting transfer with undecodable address"), "{}", output);
        assert!(output.contains(r#""role":"sender""#), "{}", output);
        assert!(output.contains(r#""level":"WARN""#), "{}", output);
    }

    #[test]
    fn level_filters_route_debug_events() {
        let ledger = MemoryLedger::new();
        let helper = TransferHelper::new(TransferConfig::default()).unwrap();
        let ctx = Context::new("nova-test", 3);
        ledger
            .mint_to_module(DISTRIBUTION_MODULE, helper.denom(), 10)
            .unwrap();

        let quiet = Capture::default();
        let subscriber = build_subscriber(&config("warn", LogFormat::Pretty), quiet.clone()).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            helper.transfer_from_module_to_module(&ledger, &ctx, DISTRIBUTION_MODULE, DISTRIBUTION_MODULE, 1)
        })
        .unwrap();
        assert!(quiet.contents().is_empty(), "{}", quiet.contents());

        let verbose = Capture::default();
        let subscriber =
            build_subscriber(&config("nova_transfer=debug", LogFormat::Pretty), verbose.clone())
                .unwrap();
        tracing::subscriber::with_default(subscriber, || {
            helper.transfer_from_module_to_module(&ledger, &ctx, DISTRIBUTION_MODULE, DISTRIBUTION_MODULE, 1)
        })
        .unwrap();
        assert!(verbose.contents().contains("module -> module"), "{}", verbose.contents());
    }

    #[test]
    fn second_install_reports_error() {
        // The first call may lose to another test in this binary; the second
        // can never win.
        let config = LoggingConfig::default();
        let _ = init_logging(&config);
        assert!(matches!(
            init_logging(&config),
            Err(LoggingError::AlreadyInstalled(_))
        ));
    }
}
