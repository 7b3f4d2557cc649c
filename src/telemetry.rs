//! Log output for `render-chart` and other hosts of `chart-pages`.
//!
//! The library only emits `tracing` events. Installing a subscriber is left to
//! the host; `init_default_tracing` is the one the CLI uses.

/// Environment variable read first for filter directives.
pub const LOG_ENV: &str = "CHART_PAGES_LOG";

/// Directive used when neither `CHART_PAGES_LOG` nor `RUST_LOG` parses.
pub const DEFAULT_DIRECTIVE: &str = "chart_pages=info";

/// Installs a compact stderr subscriber, leaving stdout to rendered documents.
///
/// Directives come from `CHART_PAGES_LOG`, then `RUST_LOG`, then
/// [`DEFAULT_DIRECTIVE`]. Returns `false` without the `telemetry` feature or
/// when a global subscriber is already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
