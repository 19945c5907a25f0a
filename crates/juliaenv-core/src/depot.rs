//! `JULIA_DEPOT_PATH` as an explicit value.
//!
//! [`DepotPath`] is the ordered list of depots a session is started with. It is
//! passed around by value; the process environment is only touched through
//! [`DepotOverride`], which restores the previous state when dropped.

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::env_keys::julia::JULIA_DEPOT_PATH;
use crate::config::{self, ScopedEnvVar};
use crate::error::{Error, Result};

/// Directory under a depot that holds shared (`@name`) environments.
pub const ENVIRONMENTS_DIR: &str = "environments";

/// Ordered list of depot directories, first entry wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepotPath {
    entries: Vec<PathBuf>,
    /// Value ended with a delimiter: Julia appends its default depots.
    append_defaults: bool,
}

impl DepotPath {
    pub fn new(entries: Vec<PathBuf>) -> Self {
        Self {
            entries,
            append_defaults: false,
        }
    }

    /// Parse a path-list value using the platform delimiter.
    ///
    /// Empty segments are dropped, except that a trailing one is remembered
    /// and written back by [`to_os_string`](Self::to_os_string).
    pub fn parse(value: &OsStr) -> Self {
        let segments: Vec<PathBuf> = env::split_paths(value).collect();
        let append_defaults = !value.is_empty()
            && segments
                .last()
                .map_or(false, |p| p.as_os_str().is_empty());
        Self {
            entries: segments
                .into_iter()
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
            append_defaults,
        }
    }

    /// Current value of `JULIA_DEPOT_PATH`; unset means empty.
    pub fn from_env() -> Self {
        config::env_raw(JULIA_DEPOT_PATH)
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    /// Copy with `dir` placed before every existing entry.
    pub fn prepend(&self, dir: impl Into<PathBuf>) -> Self {
        let mut entries = Vec::with_capacity(self.entries.len() + 1);
        entries.push(dir.into());
        entries.extend(self.entries.iter().cloned());
        Self {
            entries,
            append_defaults: self.append_defaults,
        }
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn appends_defaults(&self) -> bool {
        self.append_defaults
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Depot where new environments and packages are written.
    pub fn primary(&self) -> Option<&Path> {
        self.entries.first().map(PathBuf::as_path)
    }

    /// Like [`primary`](Self::primary), falling back to Julia's default `~/.julia`.
    pub fn effective_primary(&self) -> Option<PathBuf> {
        self.primary().map(Path::to_path_buf).or_else(default_depot)
    }

    /// Remove and return the last entry (mirror of Julia's `pop!(DEPOT_PATH)`).
    pub fn pop(&mut self) -> Option<PathBuf> {
        self.entries.pop()
    }

    /// Serialize with the platform delimiter.
    pub fn to_os_string(&self) -> Result<OsString> {
        let mut value =
            env::join_paths(&self.entries).map_err(|e| Error::DepotPath(e.to_string()))?;
        if self.append_defaults {
            value.push(delimiter());
        }
        Ok(value)
    }
}

impl fmt::Display for DepotPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_os_string() {
            Ok(s) => write!(f, "{}", s.to_string_lossy()),
            Err(_) => {
                let parts: Vec<String> = self
                    .entries
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect();
                write!(f, "{}", parts.join(", "))
            }
        }
    }
}

/// Julia's default user depot.
pub fn default_depot() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".julia"))
}

/// `Pkg.envdir(depot)`: where shared environments of `depot` live.
pub fn environments_dir(depot: &Path) -> PathBuf {
    depot.join(ENVIRONMENTS_DIR)
}

/// Scoped override of `JULIA_DEPOT_PATH`.
///
/// Holds the value the variable had before; dropping the guard restores it, or
/// removes the variable when it was previously unset.
#[derive(Debug)]
pub struct DepotOverride {
    depot: DepotPath,
    guard: ScopedEnvVar,
}

impl DepotOverride {
    /// Prepend `dir` to the process `JULIA_DEPOT_PATH`.
    ///
    /// `dir` must be an existing directory. An unset variable becomes exactly
    /// `dir`; otherwise the old entries follow it unchanged.
    pub fn prepend(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::DepotPath(format!(
                "{} is not an existing directory",
                dir.display()
            )));
        }
        let previous = config::env_raw(JULIA_DEPOT_PATH);
        let value = compose_value(dir, previous.as_deref())?;
        let guard = ScopedEnvVar::set(JULIA_DEPOT_PATH, &value);
        tracing::debug!(depot = %value.to_string_lossy(), "JULIA_DEPOT_PATH overridden");
        Ok(Self {
            depot: DepotPath::parse(&value),
            guard,
        })
    }

    /// Depot list as it stands while the override is active.
    pub fn depot(&self) -> &DepotPath {
        &self.depot
    }

    /// Value before the override (`None` when the variable was unset).
    pub fn previous(&self) -> Option<&OsStr> {
        self.guard.previous()
    }

    /// Drop the override now, restoring the previous state.
    pub fn restore(self) {
        drop(self.guard);
    }
}

/// Textual value of the path list with `new_dir` first.
///
/// `previous` is kept byte-for-byte after the delimiter (empty segments
/// included, Julia gives a trailing delimiter a meaning of its own).
pub fn compose_value(new_dir: &Path, previous: Option<&OsStr>) -> Result<OsString> {
    let mut value = DepotPath::new(vec![new_dir.to_path_buf()]).to_os_string()?;
    if let Some(old) = previous {
        value.push(delimiter());
        value.push(old);
    }
    Ok(value)
}

/// Prepend `new_dir` to `JULIA_DEPOT_PATH` for the lifetime of the returned guard.
pub fn compose_path_variable(new_dir: &Path) -> Result<DepotOverride> {
    DepotOverride::prepend(new_dir)
}

fn delimiter() -> &'static str {
    if cfg!(windows) {
        ";"
    } else {
        ":"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{remove_env_var, set_env_var};
    use serial_test::serial;

    #[test]
    fn test_parse_drops_empty_segments() {
        let joined = env::join_paths(["/a", "", "/b"]).unwrap();
        let depot = DepotPath::parse(&joined);
        assert_eq!(depot.entries(), &[PathBuf::from("/a"), PathBuf::from("/b")]);
        assert!(DepotPath::parse(OsStr::new("")).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_keeps_trailing_delimiter() {
        let depot = DepotPath::parse(OsStr::new("/srv/a:"));
        assert_eq!(depot.entries(), &[PathBuf::from("/srv/a")]);
        assert!(depot.appends_defaults());
        let composed = depot.prepend("/new");
        assert_eq!(composed.to_os_string().unwrap(), OsString::from("/new:/srv/a:"));
        assert!(!DepotPath::parse(OsStr::new("/srv/a")).appends_defaults());
        assert!(!DepotPath::parse(OsStr::new("")).appends_defaults());
    }

    #[test]
    fn test_prepend_preserves_order() {
        let depot = DepotPath::new(vec!["/one".into(), "/two".into()]);
        let composed = depot.prepend("/new");
        assert_eq!(
            composed.entries(),
            &[
                PathBuf::from("/new"),
                PathBuf::from("/one"),
                PathBuf::from("/two")
            ]
        );
        assert_eq!(depot.len(), 2);
        assert_eq!(composed.primary(), Some(Path::new("/new")));
    }

    #[test]
    fn test_pop_removes_last_entry() {
        let mut depot = DepotPath::new(vec!["/one".into(), "/two".into()]);
        assert_eq!(depot.pop(), Some(PathBuf::from("/two")));
        assert_eq!(depot.pop(), Some(PathBuf::from("/one")));
        assert_eq!(depot.pop(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_to_os_string_rejects_delimiter_in_entry() {
        let depot = DepotPath::new(vec!["/bad:entry".into()]);
        assert!(matches!(depot.to_os_string(), Err(Error::DepotPath(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_compose_value_keeps_previous_verbatim() {
        let composed = compose_value(Path::new("/tmp/abcxyz"), Some(OsStr::new("/a::/b:"))).unwrap();
        assert_eq!(composed, OsString::from("/tmp/abcxyz:/a::/b:"));
        let fresh = compose_value(Path::new("/tmp/abcxyz"), None).unwrap();
        assert_eq!(fresh, OsString::from("/tmp/abcxyz"));
    }

    #[test]
    fn test_environments_dir() {
        assert_eq!(
            environments_dir(Path::new("/depot")),
            PathBuf::from("/depot").join("environments")
        );
    }

    #[test]
    #[serial(process_env)]
    fn test_override_sets_exactly_dir_when_unset() {
        remove_env_var(JULIA_DEPOT_PATH);
        let tmp = tempfile::tempdir().unwrap();
        {
            let guard = compose_path_variable(tmp.path()).unwrap();
            assert!(guard.previous().is_none());
            assert_eq!(env::var_os(JULIA_DEPOT_PATH).unwrap(), tmp.path().as_os_str());
            assert_eq!(guard.depot().entries(), &[tmp.path().to_path_buf()]);
        }
        assert!(env::var_os(JULIA_DEPOT_PATH).is_none());
    }

    #[test]
    #[serial(process_env)]
    fn test_override_prepends_and_restores_existing_value() {
        let old = env::join_paths(["/srv/depot-a", "/srv/depot-b"]).unwrap();
        set_env_var(JULIA_DEPOT_PATH, &old);
        let tmp = tempfile::tempdir().unwrap();
        {
            let guard = compose_path_variable(tmp.path()).unwrap();
            let now = DepotPath::from_env();
            assert_eq!(
                now.entries(),
                &[
                    tmp.path().to_path_buf(),
                    PathBuf::from("/srv/depot-a"),
                    PathBuf::from("/srv/depot-b")
                ]
            );
            assert_eq!(guard.previous(), Some(old.as_os_str()));
        }
        assert_eq!(env::var_os(JULIA_DEPOT_PATH).unwrap(), old);
        remove_env_var(JULIA_DEPOT_PATH);
    }

    #[cfg(unix)]
    #[test]
    #[serial(process_env)]
    fn test_override_depot_matches_process_value() {
        set_env_var(JULIA_DEPOT_PATH, "/srv/a:");
        let tmp = tempfile::tempdir().unwrap();
        {
            let guard = compose_path_variable(tmp.path()).unwrap();
            let process_value = env::var_os(JULIA_DEPOT_PATH).unwrap();
            assert_eq!(
                process_value,
                OsString::from(format!("{}:/srv/a:", tmp.path().display()))
            );
            assert_eq!(guard.depot().to_os_string().unwrap(), process_value);
        }
        remove_env_var(JULIA_DEPOT_PATH);
    }

    #[test]
    #[serial(process_env)]
    fn test_restore_takes_effect_immediately() {
        remove_env_var(JULIA_DEPOT_PATH);
        let tmp = tempfile::tempdir().unwrap();
        let guard = compose_path_variable(tmp.path()).unwrap();
        assert!(env::var_os(JULIA_DEPOT_PATH).is_some());
        guard.restore();
        assert!(env::var_os(JULIA_DEPOT_PATH).is_none());
    }

    #[test]
    #[serial(process_env)]
    fn test_override_restores_on_panic() {
        remove_env_var(JULIA_DEPOT_PATH);
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().to_path_buf();
        let result = std::panic::catch_unwind(move || {
            let _guard = compose_path_variable(&path).unwrap();
            panic!("assertion failed mid-scenario");
        });
        assert!(result.is_err());
        assert!(env::var_os(JULIA_DEPOT_PATH).is_none());
    }

    #[test]
    #[serial(process_env)]
    fn test_override_rejects_missing_directory() {
        remove_env_var(JULIA_DEPOT_PATH);
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");
        assert!(matches!(
            compose_path_variable(&missing),
            Err(Error::DepotPath(_))
        ));
        assert!(env::var_os(JULIA_DEPOT_PATH).is_none());
    }
}
