//! Process-wide tracing setup shared by binaries and integration tests.

pub mod subscriber;

/// Initialize tracing from `RUST_LOG` (default `info`).
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    subscriber::init();
}

/// Initialize tracing with an explicit filter directive.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_with_filter(directives: &str) -> bool {
    subscriber::init_with_filter(directives)
}
