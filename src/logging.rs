//! Tracing setup
//!
//! Logs go to stderr so stdout carries only tool answers. `RUST_LOG`
//! overrides the level chosen from `-q` / `-v` / `-vv`.

use crate::cli::Verbosity;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber; a second call is a no-op
pub fn init(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init(Verbosity::Normal);
        init(Verbosity::VeryVerbose);
        tracing::debug!("after init");
    }
}
