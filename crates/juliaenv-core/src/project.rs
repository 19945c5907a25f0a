//! Julia project identifiers: default, shared (`@name`) or an explicit directory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use crate::depot::{environments_dir, DepotPath};
use crate::error::{Error, Result};
use crate::version::JuliaVersion;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum JuliaProject {
    /// Julia's default environment (`@v1.x`).
    Default,
    /// Depot-level environment, written `@name`.
    Shared(String),
    /// A project directory on disk.
    Path(PathBuf),
}

impl JuliaProject {
    /// `@name` is a shared environment, anything else is a path.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidProject(s.to_string()));
        }
        match s.strip_prefix('@') {
            Some(name) => Self::shared(name),
            None => Ok(Self::Path(PathBuf::from(s))),
        }
    }

    pub fn shared(name: &str) -> Result<Self> {
        if !is_valid_shared_name(name) {
            return Err(Error::InvalidProject(format!("@{name}")));
        }
        Ok(Self::Shared(name.to_string()))
    }

    /// Where this project lives for a given depot list.
    ///
    /// Shared projects resolve under the first depot (or `~/.julia` when the
    /// list is empty); the default project is versioned (`environments/v1.10`).
    pub fn directory(&self, depot: &DepotPath, version: &JuliaVersion) -> Option<PathBuf> {
        match self {
            Self::Path(p) => Some(p.clone()),
            Self::Shared(name) => depot
                .effective_primary()
                .map(|d| environments_dir(&d).join(name)),
            Self::Default => depot
                .effective_primary()
                .map(|d| environments_dir(&d).join(version.default_env_name())),
        }
    }

    /// Value for `JULIA_PROJECT`. Julia 1.6 does not understand `@name` there,
    /// so shared projects are spelled as their full path on it.
    pub fn julia_project_env(&self, depot: &DepotPath, version: &JuliaVersion) -> Option<String> {
        match self {
            Self::Default => None,
            Self::Path(p) => Some(p.display().to_string()),
            Self::Shared(name) if version.supports_shared_project_env() => {
                Some(format!("@{name}"))
            }
            Self::Shared(_) => self
                .directory(depot, version)
                .map(|p| p.display().to_string()),
        }
    }
}

impl fmt::Display for JuliaProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "(default)"),
            Self::Shared(name) => write!(f, "@{name}"),
            Self::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

impl FromStr for JuliaProject {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn is_valid_shared_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name
            .chars()
            .any(|c| c == '@' || c == '/' || c == '\\' || c.is_whitespace() || c.is_control())
        && !Path::new(name).is_absolute()
}
