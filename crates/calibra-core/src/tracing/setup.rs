//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::LOG_ENV_VAR;

static INIT: Once = Once::new();

/// Initialize the Calibra tracing/logging system.
///
/// Reads `CALIBRA_LOG` for per-subsystem log levels, e.g.
/// `CALIBRA_LOG=calibra_engine::pyramid=debug,calibra_core=warn`.
///
/// Falls back to `calibra=info` if `CALIBRA_LOG` is not set or is invalid.
/// Idempotent; also tolerates a global subscriber installed by the host.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("calibra=info"));

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
