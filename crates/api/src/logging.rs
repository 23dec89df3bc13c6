//! Tracing subscriber setup
//!
//! `LOG_FORMAT=json` switches to JSON lines for log aggregation; anything
//! else prints human-readable text. `RUST_LOG` filters, defaulting to `info`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true)
                    .flatten_event(true),
            )
            .init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}
