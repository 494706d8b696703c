//! Log output for processes driving the strategy.
//!
//! Every line starts with a local `YYYY-MM-DD HH:MM:SS` timestamp and carries
//! no ANSI escape codes, which is the line shape the performance report tool
//! matches on.

use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter,
    filter::LevelFilter,
    fmt::{MakeWriter, time::ChronoLocal},
    util::{SubscriberInitExt, TryInitError},
};

/// `chrono` format of the timestamp prefixing every log line.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `INFO` by default, overridden by `RUST_LOG`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy()
}

/// Plain text subscriber writing timestamp-prefixed lines to `make_writer`.
pub fn subscriber<W>(filter: EnvFilter, make_writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::new(LOG_TIMESTAMP_FORMAT.to_string()))
        .with_ansi(false)
        .with_writer(make_writer)
        .finish()
}

/// Install the stdout subscriber as the global default.
pub fn init_logging() -> Result<(), TryInitError> {
    subscriber(env_filter(), std::io::stdout).try_init()
}
