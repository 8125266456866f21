// src/infra/logger.rs — Structured logging with tracing

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging. `RUST_LOG` wins, then `PARSESMITH_LOG`, then
/// the configured default level.
///
/// Logs go to stderr; stdout is reserved for run results.
pub fn init_logging(level: &str) {
    fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("PARSESMITH_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(default_level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_log_var_is_honored_without_rust_log() {
        std::env::remove_var("RUST_LOG");
        std::env::set_var("PARSESMITH_LOG", "parsesmith=debug");
        let filter = env_filter("warn").to_string();
        std::env::remove_var("PARSESMITH_LOG");

        assert!(filter.contains("parsesmith"));
        assert!(filter.contains("debug"));
    }
}
