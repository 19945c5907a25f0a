//! Environment variable keys and aliases.
//!
//! `JULIA_*` keys follow Julia's own conventions; everything juliaenv owns is
//! prefixed `JULIAENV_*`.

/// Variables read by the Julia runtime itself.
pub mod julia {
    /// Path-list of depots, first entry is where new environments are created.
    pub const JULIA_DEPOT_PATH: &str = "JULIA_DEPOT_PATH";
    /// Active project for a fresh Julia process (`@name` for shared envs).
    pub const JULIA_PROJECT: &str = "JULIA_PROJECT";
    pub const JULIA_NUM_THREADS: &str = "JULIA_NUM_THREADS";
}

/// Runtime invocation settings
pub mod runtime {
    /// Explicit path to the `julia` executable (default: lookup on PATH)
    pub const JULIAENV_JULIA_BIN: &str = "JULIAENV_JULIA_BIN";
    pub const JULIA_BIN_ALIASES: &[&str] = &["JULIA_BINARY"];

    pub const JULIAENV_THREADS: &str = "JULIAENV_THREADS";
    pub const THREADS_ALIASES: &[&str] = &[super::julia::JULIA_NUM_THREADS];

    /// Optimization level passed as `-O`, 0..=3
    pub const JULIAENV_OPTIMIZE: &str = "JULIAENV_OPTIMIZE";

    pub const JULIAENV_PRECOMPILE: &str = "JULIAENV_PRECOMPILE";
}

/// Logging
pub mod observability {
    pub const JULIAENV_QUIET: &str = "JULIAENV_QUIET";
    pub const JULIAENV_LOG_LEVEL: &str = "JULIAENV_LOG_LEVEL";
    pub const JULIAENV_LOG_JSON: &str = "JULIAENV_LOG_JSON";
}
