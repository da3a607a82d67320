use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

pub const LOG_ENV_VAR: &str = "NESTEGG_LOG";

/// Installs the global subscriber. Filter directives come from `NESTEGG_LOG`
/// (e.g. `NESTEGG_LOG=nestegg=debug`), falling back to `nestegg=info`.
/// Safe to call more than once.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new("nestegg=info"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    });
}
