//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr through `tracing`; reports go to stdout or files.
//! The filter comes from `RUST_LOG` and defaults to `info`.

use std::{io, sync::Once};

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt as _,
    util::SubscriberInitExt as _,
};

static INIT: Once = Once::new();

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Installs the global subscriber. Subsequent calls are ignored.
pub(crate) fn init(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(env_filter);

        match format {
            LogFormat::Text => registry
                .with(
                    fmt::layer()
                        .with_writer(io::stderr)
                        .with_span_events(FmtSpan::CLOSE)
                        .with_target(false),
                )
                .init(),
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(io::stderr)
                        .with_span_events(FmtSpan::CLOSE)
                        .with_current_span(true),
                )
                .init(),
        }
    });
}
