//! Logging setup using tracing.
//!
//! The library reports progress through `tracing` events. Binaries call
//! [`init_logging`] once to print them on stderr; `log` crate records are
//! forwarded as well.
//!
//! # Example
//!
//! ```ignore
//! use rosserial_stm32::logger::init_logging;
//!
//! init_logging("info");
//! tracing::info!("Exporting");
//! ```

use std::sync::OnceLock;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize logging to stderr.
///
/// `RUST_LOG` takes precedence over `default_level`. Subsequent calls are ignored.
pub fn init_logging(default_level: &str) {
    LOGGER_INITIALIZED.get_or_init(|| {
        // Set up log -> tracing bridge
        tracing_log::LogTracer::init().ok();

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

        let fmt_layer = fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .ok();
    });
}
