//! Logging bootstrap

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::Config;

/// Target under which browser console messages are re-emitted
pub const BROWSER_TARGET: &str = "tether::browser";

/// Install a console subscriber. `RUST_LOG` overrides `config.log_level`.
///
/// Returns false if a global subscriber was already set.
pub fn init(config: &Config) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_refused() {
        let config = Config::default();
        init(&config);
        assert!(!init(&config));
    }
}
