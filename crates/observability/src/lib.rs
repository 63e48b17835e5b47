//! Process-wide tracing setup for binaries and tests embedding the engine.
//!
//! The engine crates only emit `tracing` events; installing a subscriber is
//! left to whoever owns the process.

pub mod tracing;

pub use self::tracing::{LogFormat, ObservabilityConfig};

/// Initialize tracing with JSON output and `RUST_LOG` filtering (default `info`).
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init_with(&ObservabilityConfig::default());
}

/// Initialize tracing from an explicit configuration.
pub fn init_with(config: &ObservabilityConfig) {
    tracing::init_with(config);
}
