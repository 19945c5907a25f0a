//! Config structs grouped by concern, loaded from the environment.

use super::env_keys::{observability as obv_keys, runtime as rt_keys};
use super::loader::{env_bool, env_optional, env_or};
use serde::Serialize;
use std::path::PathBuf;

/// How the Julia executable is found and launched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JuliaConfig {
    /// Explicit executable; `None` means look up `julia` on PATH.
    pub julia_bin: Option<PathBuf>,
    /// `--threads` value, e.g. "4" or "auto".
    pub threads: Option<String>,
    /// `-O` level, 0..=3.
    pub optimize: Option<u8>,
    /// Run `Pkg.precompile` after installing a project.
    pub precompile: bool,
    /// Send Pkg output to `devnull`.
    pub quiet: bool,
}

impl Default for JuliaConfig {
    fn default() -> Self {
        Self {
            julia_bin: None,
            threads: None,
            optimize: None,
            precompile: true,
            quiet: false,
        }
    }
}

impl JuliaConfig {
    pub fn from_env() -> Self {
        super::loader::load_dotenv();
        let julia_bin =
            env_optional(rt_keys::JULIAENV_JULIA_BIN, rt_keys::JULIA_BIN_ALIASES).map(PathBuf::from);
        let threads = env_optional(rt_keys::JULIAENV_THREADS, rt_keys::THREADS_ALIASES)
            .filter(|t| t == "auto" || t.parse::<u32>().map_or(false, |n| n > 0));
        let optimize = env_optional(rt_keys::JULIAENV_OPTIMIZE, &[])
            .and_then(|s| s.parse::<u8>().ok())
            .filter(|o| *o <= 3);
        Self {
            julia_bin,
            threads,
            optimize,
            precompile: env_bool(rt_keys::JULIAENV_PRECOMPILE, &[], true),
            quiet: env_bool(obv_keys::JULIAENV_QUIET, &[], false),
        }
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = self.quiet || quiet;
        self
    }
}

/// Logging configuration: quiet, log_level, log_json
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| {
            super::loader::load_dotenv();
            Self {
                quiet: env_bool(obv_keys::JULIAENV_QUIET, &[], false),
                log_level: env_or(obv_keys::JULIAENV_LOG_LEVEL, &[], || {
                    "info".to_string()
                }),
                log_json: env_bool(obv_keys::JULIAENV_LOG_JSON, &[], false),
            }
        })
    }
}
