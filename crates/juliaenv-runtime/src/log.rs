//! `info_log!`: progress messages that `JULIAENV_QUIET` turns off.
//!
//! Warnings and errors go through `tracing` directly and are never silenced.

use juliaenv_core::config::ObservabilityConfig;

#[macro_export]
macro_rules! info_log {
    (target: $target:expr, $($arg:tt)+) => {
        if !$crate::log::is_quiet() {
            tracing::info!(target: $target, $($arg)+);
        }
    };
    ($($arg:tt)+) => {
        $crate::info_log!(target: module_path!(), $($arg)+)
    };
}

/// Read once per process from the environment.
pub fn is_quiet() -> bool {
    ObservabilityConfig::from_env().quiet
}
