//! Logging initialization.

use std::env;

use tracing_subscriber::{filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing output to stderr, honoring `RUST_LOG` when set.
///
/// Recovered sampling failures are reported here for operator visibility;
/// the result log itself stays free of diagnostics.
pub fn init() {
    let default_filter = if cfg!(debug_assertions) {
        "perfprobe=debug"
    } else {
        "perfprobe=info"
    }
    .parse::<Targets>()
    .expect("valid filter");
    let filter = match env::var("RUST_LOG") {
        Ok(filter) => filter.parse::<Targets>().unwrap_or(default_filter),
        Err(_) => default_filter,
    };

    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init()
    {
        eprintln!("initializing tracing failed: {err:?}");
    }
}
