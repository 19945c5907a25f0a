//! Observability: tracing init.
//!
//! Uses config::ObservabilityConfig for JULIAENV_QUIET, JULIAENV_LOG_LEVEL, JULIAENV_LOG_JSON.

use juliaenv_core::config::ObservabilityConfig;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Initialize tracing. Call at process startup.
/// When quiet (flag or JULIAENV_QUIET=1), only WARN and above are logged.
pub fn init_tracing(quiet: bool) {
    let cfg = ObservabilityConfig::from_env();
    let level = filter_directive(cfg, quiet);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    // Logs go to stderr so command output on stdout stays pipeable.
    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(false),
            )
            .try_init()
    };
}

fn filter_directive(cfg: &ObservabilityConfig, quiet: bool) -> String {
    if quiet || cfg.quiet {
        "juliaenv=warn,juliaenv_core=warn,juliaenv_runtime=warn".to_string()
    } else if cfg.log_level.contains('=') || cfg.log_level.contains(',') {
        cfg.log_level.clone()
    } else {
        // bare level, e.g. "debug": apply to all juliaenv crates
        let l = &cfg.log_level;
        format!("juliaenv={l},juliaenv_core={l},juliaenv_runtime={l}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(level: &str, quiet: bool) -> ObservabilityConfig {
        ObservabilityConfig {
            quiet,
            log_level: level.to_string(),
            log_json: false,
        }
    }

    #[test]
    fn test_filter_directive() {
        assert_eq!(
            filter_directive(&cfg("debug", false), false),
            "juliaenv=debug,juliaenv_core=debug,juliaenv_runtime=debug"
        );
        assert_eq!(
            filter_directive(&cfg("juliaenv=info", false), false),
            "juliaenv=info"
        );
        assert!(filter_directive(&cfg("debug", true), false).starts_with("juliaenv=warn"));
        assert!(filter_directive(&cfg("debug", false), true).starts_with("juliaenv=warn"));
    }
}
