//! Environment variable loading
//!
//! Keeps the fallback chains in one place so callers don't repeat `or_else`.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Load `.env` from the current directory (never overrides existing variables).
pub fn load_dotenv() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let dir = env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
        load_dotenv_from_dir(&dir);
    });
}

/// Load `<dir>/.env`. Returns how many variables were set.
pub fn load_dotenv_from_dir(dir: &Path) -> usize {
    let Ok(content) = std::fs::read_to_string(dir.join(".env")) else {
        return 0;
    };
    let mut applied = 0;
    for (key, value) in parse_dotenv(&content) {
        if env::var_os(key).is_none() {
            set_env_var(key, value);
            applied += 1;
        }
    }
    if applied > 0 {
        tracing::debug!(count = applied, dir = %dir.display(), "loaded .env");
    }
    applied
}

fn parse_dotenv(content: &str) -> Vec<(&str, &str)> {
    let mut out = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some(eq_pos) = line.find('=') else {
            continue;
        };
        let key = line[..eq_pos].trim();
        let mut value = line[eq_pos + 1..].trim();
        // Strip inline comment (# not inside quotes)
        if let Some(hash_pos) = value.find('#') {
            let before_hash = value[..hash_pos].trim_end();
            if !before_hash.contains('"') && !before_hash.contains('\'') {
                value = before_hash;
            }
        }
        if value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')))
        {
            value = &value[1..value.len() - 1];
        }
        if !key.is_empty() {
            out.push((key, value));
        }
    }
    out
}

/// Read the primary key or the first set alias, falling back to `default`.
pub fn env_or<F>(primary: &str, aliases: &[&str], default: F) -> String
where
    F: FnOnce() -> String,
{
    env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default)
}

/// Read the primary key or an alias; empty values count as unset.
pub fn env_optional(primary: &str, aliases: &[&str]) -> Option<String> {
    env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()))
        .and_then(|s| {
            let s = s.trim().to_string();
            if s.is_empty() {
                None
            } else {
                Some(s)
            }
        })
}

/// Boolean variable: 0/false/no/off is false, anything else set is true.
pub fn env_bool(primary: &str, aliases: &[&str], default: bool) -> bool {
    let v = env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()));
    match v.as_deref() {
        Some(s) => !matches!(
            s.trim().to_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ),
        None => default,
    }
}

/// Raw OS value, unset and empty are distinct (path lists may be non-UTF-8).
pub fn env_raw(key: &str) -> Option<OsString> {
    env::var_os(key)
}

// ─── Centralized env::set_var / remove_var ──────────────────────────────────
//
// All environment mutation goes through these two functions.
//
// SAFETY contract: callers run before any threads that read the environment
// are started, or hold the test serialization lock.

#[allow(unsafe_code)]
pub fn set_env_var<K: AsRef<OsStr>, V: AsRef<OsStr>>(key: K, value: V) {
    unsafe { env::set_var(key, value) };
}

#[allow(unsafe_code)]
pub fn remove_env_var<K: AsRef<OsStr>>(key: K) {
    unsafe { env::remove_var(key) };
}

/// RAII guard: remembers the prior value of a variable and puts it back
/// (or removes the variable if it was unset) on drop.
#[derive(Debug)]
pub struct ScopedEnvVar {
    key: &'static str,
    previous: Option<OsString>,
}

impl ScopedEnvVar {
    /// Capture the current value without changing it.
    pub fn capture(key: &'static str) -> Self {
        Self {
            key,
            previous: env::var_os(key),
        }
    }

    /// Capture, then set `value`.
    pub fn set<V: AsRef<OsStr>>(key: &'static str, value: V) -> Self {
        let guard = Self::capture(key);
        set_env_var(key, value);
        guard
    }

    /// Value the variable had before the guard was taken.
    pub fn previous(&self) -> Option<&OsStr> {
        self.previous.as_deref()
    }
}

impl Drop for ScopedEnvVar {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(v) => set_env_var(self.key, v),
            None => remove_env_var(self.key),
        }
        tracing::debug!(key = self.key, "environment variable restored");
    }
}
