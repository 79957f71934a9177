//! Diagnostic logging on stderr.
//!
//! User-facing progress goes through [`crate::ui::Console`]; this is for
//! tracing what the tool does. `RUST_LOG` wins over the `-v` level.

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::error::{ReleaseError, Result};

/// Default filter directive for a `-v` count
pub fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(verbosity: u8, ansi: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level(verbosity)))
        .map_err(|e| ReleaseError::config(format!("invalid log filter: {}", e)))?;

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(ansi)
        .without_time();

    tracing_subscriber::registry()
        .with(console_layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| ReleaseError::config(format!("logging already initialized: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_scales_with_verbosity() {
        assert_eq!(default_level(0), "warn");
        assert_eq!(default_level(1), "info");
        assert_eq!(default_level(2), "debug");
        assert_eq!(default_level(9), "trace");
    }
}
