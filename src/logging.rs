//! Logging setup using tracing.
//!
//! Log lines go to stderr so that `inv export` output on stdout stays
//! valid JSON. `RUST_LOG` takes precedence over the configured filter.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `verbose` forces `debug`; otherwise `RUST_LOG` is used if set, falling
/// back to `default_filter` (normally `[log].filter` from the config).
///
/// # Errors
/// Returns an error if a subscriber is already installed or the filter
/// string does not parse.
pub fn init(default_filter: &str, verbose: bool) -> anyhow::Result<()> {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(default_filter)?,
        }
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails_instead_of_panicking() {
        let _ = init("warn", false);
        assert!(init("warn", false).is_err());
    }
}
