//! JSON `fmt` subscriber with an `EnvFilter`.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "info";

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    install(filter);
}

pub fn init_with_filter(directives: &str) -> bool {
    install(filter_for(directives))
}

/// Parse `directives`, falling back to the default level when they are invalid.
fn filter_for(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

fn install(filter: EnvFilter) -> bool {
    // JSON logs + timestamps; span fields such as `operation` land in the output.
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_current_span(true)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("tracing subscriber installed");
    }
    installed
}
