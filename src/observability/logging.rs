//! Structured logging.
//!
//! `RUST_LOG` takes precedence over the configured level.

use std::backtrace::Backtrace;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::lifecycle::panic_message;

/// Install the global tracing subscriber.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("udm_sbi={level},tower_http={level}").into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Log every panic, with a forced backtrace, before unwinding starts.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        tracing::error!(
            panic = %panic_message(info.payload()),
            location = %location,
            backtrace = %Backtrace::force_capture(),
            "panic"
        );
    }));
}
