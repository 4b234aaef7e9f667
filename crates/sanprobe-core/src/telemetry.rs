//! Tracing setup for the harness binary.
//!
//! Log lines go to stderr so they never interleave with the plain-text report
//! on stdout.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::location::Location;

/// Initialise the global tracing subscriber.
///
/// * `json`: when `true`, emit newline-delimited JSON log lines.
/// * `level`: default verbosity when `RUST_LOG` is not set.
///
/// Only the first call takes effect.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let (plain_layer, json_layer) = if json {
        let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
        (None, Some(layer.json()))
    } else {
        let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
        (Some(layer), None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(plain_layer)
        .with(json_layer)
        .try_init()
        .ok();
}

/// Span wrapping one trial; every log line inside carries the location.
pub fn trial_span(location: Location) -> tracing::Span {
    tracing::info_span!("sanprobe.trial", location = %location)
}
