//! Opt-in tracing bootstrap for hosts embedding `chart-bind`.
//!
//! The crate itself only emits `tracing` events; installing a subscriber is
//! the host application's decision. `init_default_tracing` wires a compact
//! stderr subscriber honoring `RUST_LOG`, for hosts that do not carry their
//! own telemetry stack.

/// Installs a default `tracing` subscriber (requires the `telemetry`
/// feature).
///
/// Returns `false` when the feature is disabled or another global subscriber
/// already won the race; binding coordination works the same either way.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("chart_bind=debug,warn"));
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
