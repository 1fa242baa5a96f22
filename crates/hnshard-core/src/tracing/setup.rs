//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "HNSHARD_LOG";

/// Initialize the hnshard tracing/logging system.
///
/// Reads `HNSHARD_LOG` for per-crate log levels.
/// Format: `HNSHARD_LOG=hnshard_storage=debug,hnshard_search=info`
///
/// Falls back to `hnshard=info` if `HNSHARD_LOG` is not set or is invalid.
/// Idempotent; a subscriber installed elsewhere first is left in place.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("hnshard=info"));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}

