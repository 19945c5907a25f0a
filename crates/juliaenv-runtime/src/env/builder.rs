//! Install Julia projects (shared `@name` envs or project directories) and
//! report where they landed.

use std::path::PathBuf;

use juliaenv_core::config::JuliaConfig;
use juliaenv_core::{Error, JuliaProject, Result};
use serde::Serialize;

use super::manifest::{self, ProjectFile};
use crate::call::{default_packages, PackageSpec, Statement};
use crate::info_log;
use crate::session::InterpreterSession;

#[derive(Debug, Clone)]
pub struct InstallOptions {
    pub packages: Vec<PackageSpec>,
    /// Run `Pkg.precompile` after instantiating.
    pub precompile: bool,
    /// Silence Pkg output.
    pub quiet: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            packages: default_packages(),
            precompile: true,
            quiet: false,
        }
    }
}

impl InstallOptions {
    pub fn from_config(config: &JuliaConfig) -> Self {
        Self {
            packages: default_packages(),
            precompile: config.precompile,
            quiet: config.quiet,
        }
    }

    pub fn with_packages(mut self, packages: Vec<PackageSpec>) -> Self {
        if !packages.is_empty() {
            self.packages = packages;
        }
        self
    }

    fn package_names(&self) -> impl Iterator<Item = &str> {
        self.packages.iter().map(|p| p.name.as_str())
    }
}

/// Result of [`install_project`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledProject {
    pub project: JuliaProject,
    pub dir: PathBuf,
    /// Direct dependencies listed in the project's `Project.toml`.
    pub packages: Vec<String>,
    /// `false` when the project was already complete and nothing ran.
    pub freshly_installed: bool,
}

/// Ensure `project` exists under the session's first depot and has the
/// requested packages. Safe to call repeatedly.
///
/// Pkg failures (resolution, network, missing registry) come back as
/// [`Error::Installation`]; they are not retried.
pub fn install_project(
    session: &InterpreterSession,
    project: &JuliaProject,
    options: &InstallOptions,
) -> Result<InstalledProject> {
    let dir = project
        .directory(session.depot_path(), session.version())
        .ok_or_else(|| Error::installation(project, "no depot available to install into"))?;

    if manifest::is_installed(&dir, options.package_names())? {
        info_log!("[INFO] {} already installed at {}", project, dir.display());
        return finish(project, dir, false);
    }

    // Pkg resolves `@name` against every depot; pin it to the first one.
    let target = match project {
        JuliaProject::Shared(_) => JuliaProject::Path(dir.clone()),
        other => other.clone(),
    };
    let mut statements = vec![
        Statement::Activate {
            project: target,
            quiet: options.quiet,
        },
        Statement::AddPackages {
            packages: options.packages.clone(),
            quiet: options.quiet,
        },
        Statement::Instantiate {
            quiet: options.quiet,
        },
    ];
    if options.precompile {
        statements.push(Statement::Precompile {
            quiet: options.quiet,
        });
    }

    info_log!(
        "[INFO] Installing {} into {} ({})",
        project,
        dir.display(),
        options
            .packages
            .iter()
            .map(PackageSpec::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    session
        .run_statements(statements)
        .map_err(|e| Error::installation(project, e.to_string()))?;

    if !dir.join(manifest::PROJECT_FILE).exists() {
        return Err(Error::installation(
            project,
            format!("Pkg finished but {} has no Project.toml", dir.display()),
        ));
    }
    finish(project, dir, true)
}

fn finish(project: &JuliaProject, dir: PathBuf, fresh: bool) -> Result<InstalledProject> {
    let packages = ProjectFile::read(&dir)?
        .map(|p| p.deps.into_keys().collect())
        .unwrap_or_default();
    Ok(InstalledProject {
        project: project.clone(),
        dir,
        packages,
        freshly_installed: fresh,
    })
}
