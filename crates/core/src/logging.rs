//! Tracing setup for binaries that embed the pipeline.

/// Install a stderr subscriber filtered by `RUST_LOG` (silent when unset).
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
