pub mod entities;

// Re-export tracing for use in this crate
pub use tracing;

// Convenience subscriber setup for consumers that do not bring their own.
// The log level can be controlled via the RUST_LOG environment variable.
#[cfg(not(test))]
pub fn init_tracing() {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_span_events(FmtSpan::CLOSE)
        .init();
}
