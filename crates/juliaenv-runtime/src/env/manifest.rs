//! `Project.toml` / `Manifest.toml` inspection.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use juliaenv_core::{Error, Result};
use serde::{Deserialize, Serialize};

pub const PROJECT_FILE: &str = "Project.toml";
pub const MANIFEST_FILE: &str = "Manifest.toml";

/// The parts of `Project.toml` we care about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Package name → UUID
    #[serde(default)]
    pub deps: BTreeMap<String, String>,
}

impl ProjectFile {
    /// Read `<dir>/Project.toml`; `Ok(None)` when it does not exist.
    pub fn read(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(PROJECT_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content)
            .map(Some)
            .map_err(|e| Error::Manifest {
                path,
                reason: e.to_string(),
            })
    }

    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(PROJECT_FILE);
        let content = toml::to_string(self).map_err(|e| Error::Manifest {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        std::fs::create_dir_all(dir)?;
        std::fs::write(&path, content)?;
        Ok(path)
    }

    pub fn has_all<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> bool {
        names.into_iter().all(|n| self.deps.contains_key(n))
    }
}

/// A project counts as installed when it has been resolved (both files
/// present) and lists every requested package as a direct dependency.
pub fn is_installed<'a>(dir: &Path, names: impl IntoIterator<Item = &'a str>) -> Result<bool> {
    if !dir.join(MANIFEST_FILE).exists() {
        return Ok(false);
    }
    Ok(ProjectFile::read(dir)?.map_or(false, |p| p.has_all(names)))
}
