//! Logging setup.
//!
//! The engine logs through `tracing`: validation outcomes at `debug`, guard
//! rejections and registry replacements at `warn`. Applications that have no
//! subscriber of their own can install one here.

use tracing_subscriber::EnvFilter;

/// Environment variable consulted when no explicit filter is given.
pub const LOG_ENV: &str = "PERIMETER_LOG";

/// Output format for [`init_logging`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Builds the filter: explicit directive, then `PERIMETER_LOG`, then `warn`.
pub fn env_filter(
    directive: Option<&str>,
) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
    match directive {
        Some(directive) => EnvFilter::try_new(directive),
        None => Ok(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))),
    }
}

/// Installs a global `tracing` subscriber.
///
/// Fails if the directive does not parse or a global subscriber is already set.
pub fn init_logging(directive: Option<&str>, format: LogFormat) -> anyhow::Result<()> {
    let filter = env_filter(directive)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to install subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_explicit() {
        assert!(env_filter(Some("perimeter=debug")).is_ok());
    }

    #[test]
    fn test_env_filter_default() {
        assert!(env_filter(None).is_ok());
    }

    #[test]
    fn test_init_twice_fails() {
        let _ = init_logging(Some("perimeter=debug"), LogFormat::Pretty);
        let second = init_logging(Some("perimeter=debug"), LogFormat::Json);
        assert!(second.is_err());
    }
}
