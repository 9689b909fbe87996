use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

static INIT: OnceLock<()> = OnceLock::new();

/// Install the global `tracing` subscriber. `RUST_LOG` wins over the
/// `--verbose` count; safe to call more than once.
pub fn init(verbose: u8) {
    INIT.get_or_init(|| {
        let default = match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        let subscriber = Registry::default()
            .with(filter)
            .with(fmt::layer().with_target(false));
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            // Ignore error if a subscriber is already set (e.g., tests).
        }
    });
}
